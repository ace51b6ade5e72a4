//! Error handling for FrameCut core types
//!
//! Frame parameter validation happens before any geometry is constructed,
//! so every rejection is reported here as a form-level failure rather than
//! surfacing later from the renderer or the G-code generator.

use thiserror::Error;

/// Frame parameter error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FrameError {
    /// A parameter is NaN, infinite, zero or negative
    #[error("Invalid {name}: {value} ({reason})")]
    InvalidParameter {
        /// The parameter name as shown on the form.
        name: &'static str,
        /// The rejected value.
        value: f64,
        /// Why the value was rejected.
        reason: &'static str,
    },

    /// A span is too short to carry two mitered ends and both hole pairs
    #[error("{name} {span} mm is too short for a {thickness} mm beam (minimum {minimum} mm)")]
    SpanTooShort {
        /// The span name (`width` or `height`).
        name: &'static str,
        /// The requested span.
        span: f64,
        /// The beam thickness the span was checked against.
        thickness: f64,
        /// The smallest accepted span for that thickness.
        minimum: f64,
    },

    /// A part name does not map to one of the four beams
    #[error("Unknown part: {0}")]
    UnknownPart(String),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, FrameError>;
