//! Error types for the designer crate.

use framecut_core::FrameError;
use thiserror::Error;

/// Errors raised while building beam geometry
#[derive(Error, Debug)]
pub enum GeometryError {
    /// Frame dimensions rejected before any geometry was built
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// The cap tessellator rejected a profile
    #[error("Failed to tessellate {beam} profile: {reason}")]
    Tessellation { beam: String, reason: String },
}

/// Errors raised while reading or writing binary glTF containers
#[derive(Error, Debug)]
pub enum GlbError {
    #[error("GLB container is truncated ({0} bytes)")]
    Truncated(usize),

    #[error("Not a GLB container (magic {0:#010x})")]
    BadMagic(u32),

    #[error("Unsupported GLB version {0}")]
    UnsupportedVersion(u32),

    #[error("GLB container has no {0} chunk")]
    MissingChunk(&'static str),

    #[error("Invalid glTF document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{what} index {index} is out of range")]
    DanglingIndex { what: &'static str, index: usize },

    #[error("{0} reaches past the end of the binary chunk")]
    OutOfBounds(&'static str),

    #[error("Unsupported glTF feature: {0}")]
    Unsupported(String),

    #[error("Reference model contains no triangle meshes")]
    NoMeshes,
}

/// Errors raised by the reference model scaler
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScaleError {
    #[error("Reference {axis} must be positive and finite, got {value}")]
    InvalidReferenceDimension { axis: &'static str, value: f64 },

    #[error("Target {axis} must be positive and finite, got {value}")]
    InvalidTarget { axis: &'static str, value: f64 },

    #[error("Part {part} has no extent along {axis}")]
    DegeneratePart { part: String, axis: &'static str },
}

pub type GeometryResult<T> = std::result::Result<T, GeometryError>;
pub type GlbResult<T> = std::result::Result<T, GlbError>;
pub type ScaleResult<T> = std::result::Result<T, ScaleError>;
