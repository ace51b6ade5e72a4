//! # FrameCut CAM Tools
//!
//! Manufacturing outputs for frame beams.
//!
//! - **Miter Saw**: deterministic 4-axis G-code for the two 45 degree end
//!   cuts of a beam
//! - **Artifacts**: generated programs with their export file names
//! - **Labels**: part labels rendered as SVG, handed to a [`LabelSink`]

pub mod artifact;
pub mod error;
pub mod label;
pub mod miter_saw;

pub use artifact::GcodeArtifact;
pub use error::{CamToolError, Result};
pub use label::{
    render_label, DirectorySink, LabelArtifact, LabelData, LabelRef, LabelSink, LABEL_HEIGHT_MM,
    LABEL_WIDTH_MM,
};
pub use miter_saw::{cut_plan, generate, EndCut, MiterCutGenerator, MiterCutParameters};
