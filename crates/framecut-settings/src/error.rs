//! Error types for the settings crate.

use framecut_camtools::CamToolError;
use framecut_core::FrameError;
use framecut_designer::ScaleError;
use std::io;
use thiserror::Error;

/// Errors that can occur during settings operations.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// The file extension is neither `.json` nor `.toml`.
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    /// A configuration value is invalid.
    #[error("Invalid setting '{key}': {reason}")]
    InvalidSetting { key: String, reason: String },

    /// The configuration directory could not be found or created.
    #[error("Config directory error: {0}")]
    ConfigDirectory(String),

    /// Default frame parameters are invalid.
    #[error("Invalid frame defaults: {0}")]
    Frame(#[from] FrameError),

    /// Reference model dimensions are invalid.
    #[error("Invalid reference model: {0}")]
    Reference(#[from] ScaleError),

    /// Machine parameters are invalid.
    #[error("Invalid machine settings: {0}")]
    Machine(#[from] CamToolError),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// TOML deserialization error.
    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML error: {0}")]
    TomlSerError(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, SettingsError>;
