//! Frame parameters
//!
//! A frame is described by its outer width and height, the square beam
//! section (`beam_thickness`) and the saw kerf. All values are millimeters.

use crate::error::{FrameError, Result};
use serde::{Deserialize, Serialize};

/// Distance from a beam end to the centre of its hole pair, as a multiple of the thickness.
pub const HOLE_EDGE_OFFSET_FACTOR: f64 = 1.5;

/// Fastener hole radius, as a multiple of the thickness.
pub const HOLE_RADIUS_FACTOR: f64 = 0.15;

/// Centre-to-centre distance of the two holes in a pair, as a multiple of the thickness.
pub const HOLE_SPACING_FACTOR: f64 = 0.8;

/// Smallest span (as a multiple of the thickness) that fits both miters and both hole pairs.
pub const MIN_SPAN_FACTOR: f64 =
    2.0 * (HOLE_EDGE_OFFSET_FACTOR + HOLE_SPACING_FACTOR / 2.0 + HOLE_RADIUS_FACTOR);

/// Rectangular frame description
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameParameters {
    /// Outer width (mm)
    pub width: f64,
    /// Outer height (mm)
    pub height: f64,
    /// Beam section edge (mm); beams are square in section
    pub beam_thickness: f64,
    /// Saw kerf (mm)
    pub saw_thickness: f64,
}

impl Default for FrameParameters {
    fn default() -> Self {
        Self {
            width: 523.0,
            height: 400.0,
            beam_thickness: 22.0,
            saw_thickness: 1.344,
        }
    }
}

impl FrameParameters {
    pub fn new(width: f64, height: f64, beam_thickness: f64, saw_thickness: f64) -> Self {
        Self {
            width,
            height,
            beam_thickness,
            saw_thickness,
        }
    }

    /// Validate every field and the span/thickness relation.
    pub fn validate(&self) -> Result<()> {
        validate_section(self.width, self.height, self.beam_thickness)?;
        check_positive("saw thickness", self.saw_thickness)
    }

    /// Smallest accepted span for the current thickness
    pub fn minimum_span(&self) -> f64 {
        MIN_SPAN_FACTOR * self.beam_thickness
    }

    /// Returns a copy with a different width
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    /// Returns a copy with a different height
    pub fn with_height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }
}

/// Validate the geometric part of a frame description (everything but the kerf).
pub fn validate_section(width: f64, height: f64, beam_thickness: f64) -> Result<()> {
    check_positive("width", width)?;
    check_positive("height", height)?;
    check_positive("beam thickness", beam_thickness)?;

    let minimum = MIN_SPAN_FACTOR * beam_thickness;
    for (name, span) in [("width", width), ("height", height)] {
        if span <= minimum {
            return Err(FrameError::SpanTooShort {
                name,
                span,
                thickness: beam_thickness,
                minimum,
            });
        }
    }
    Ok(())
}

fn check_positive(name: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(FrameError::InvalidParameter {
            name,
            value,
            reason: "must be a finite number",
        });
    }
    if value <= 0.0 {
        return Err(FrameError::InvalidParameter {
            name,
            value,
            reason: "must be positive",
        });
    }
    Ok(())
}
