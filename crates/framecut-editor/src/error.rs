//! Error types for the editor session.

use framecut_camtools::CamToolError;
use framecut_core::{FrameError, PartId};
use framecut_designer::{GeometryError, GlbError, ScaleError};
use std::path::PathBuf;
use thiserror::Error;

/// Reference asset fetch and decode errors
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("Unsupported asset URL scheme '{0}'")]
    UnsupportedScheme(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Fetch rejected: {0}")]
    Rejected(String),

    #[error(transparent)]
    Decode(#[from] GlbError),

    #[error(transparent)]
    Scale(#[from] ScaleError),
}

/// Construction store errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Construction {0} not found")]
    NotFound(u64),

    #[error("Update rejected: {0}")]
    Rejected(String),
}

#[derive(Error, Debug)]
pub enum EditorError {
    #[error(transparent)]
    InvalidParameters(#[from] FrameError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Scale(#[from] ScaleError),

    #[error("Failed to save construction: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error("Superseded by a newer confirmation")]
    Superseded,

    #[error("No part selected")]
    NoSelection,

    #[error("Part {0} is not a frame beam")]
    NotABeam(PartId),

    #[error(transparent)]
    Export(#[from] CamToolError),
}

pub type Result<T> = std::result::Result<T, EditorError>;
