//! G-code export artifacts
//!
//! A [`GcodeArtifact`] is produced once from confirmed frame parameters and
//! carries everything needed to save it; it holds no reference to scene
//! state.

use crate::error::Result;
use crate::miter_saw::MiterCutGenerator;
use framecut_core::{BeamName, FrameParameters, Orientation};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// A generated program for one beam
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GcodeArtifact {
    pub program_text: String,
    pub part_name: String,
    pub beam_length: f64,
    pub beam_thickness: f64,
    pub saw_thickness: f64,
}

impl GcodeArtifact {
    /// Generate the program for `beam` from confirmed parameters
    pub fn generate(
        generator: &MiterCutGenerator,
        beam: BeamName,
        params: &FrameParameters,
    ) -> Self {
        let beam_length = match beam.orientation() {
            Orientation::Horizontal => params.width,
            Orientation::Vertical => params.height,
        };
        Self {
            program_text: generator.generate(
                beam.as_str(),
                params.width,
                params.height,
                params.beam_thickness,
                params.saw_thickness,
            ),
            part_name: beam.to_string(),
            beam_length,
            beam_thickness: params.beam_thickness,
            saw_thickness: params.saw_thickness,
        }
    }

    /// `{part}_{length}x{thickness}.cnc`
    pub fn file_name(&self) -> String {
        format!(
            "{}_{}x{}.cnc",
            self.part_name, self.beam_length, self.beam_thickness
        )
    }

    /// Write the program into `dir` and return the full path
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name());
        fs::write(&path, &self.program_text)?;
        info!("Wrote {}", path.display());
        Ok(path)
    }
}
