//! Error types for the CAM tools crate.

use std::io;
use thiserror::Error;

/// Errors that can occur while producing or writing CAM artifacts.
#[derive(Error, Debug)]
pub enum CamToolError {
    /// Label data is missing a required field.
    #[error("Invalid label: {0}")]
    InvalidLabel(String),

    /// Machine parameters are unusable.
    #[error("Invalid machine parameters: {0}")]
    InvalidParameters(String),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, CamToolError>;
