//! Configuration for FrameCut
//!
//! Supports JSON and TOML files. Configuration is organized into sections:
//! - Frame defaults used when a session starts
//! - The reference model: where to fetch it, the size it was authored at
//!   and how its sub-meshes map to beams
//! - Export destinations
//! - View preferences
//! - Miter saw machine settings

use crate::error::{Result, SettingsError};
use framecut_camtools::MiterCutParameters;
use framecut_core::{FrameParameters, GizmoMode, ViewMode};
use framecut_designer::{PartNameMap, ReferenceDimensions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Reference model settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceModelSettings {
    /// Location of the GLB reference model; procedural geometry when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Frame size the model was authored at
    pub dimensions: ReferenceDimensions,
    /// Sub-mesh name to beam mapping
    pub part_names: PartNameMap,
}

/// Export settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Directory for G-code programs and labels
    pub output_dir: PathBuf,
    /// Copy generated programs to the clipboard as well
    pub copy_to_clipboard: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            output_dir: dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("framecut"),
            copy_to_clipboard: false,
        }
    }
}

/// View preferences
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    pub view_mode: ViewMode,
    pub gizmo_mode: GizmoMode,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            view_mode: ViewMode::Solid,
            gizmo_mode: GizmoMode::None,
            fov_degrees: 45.0,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Frame shown at startup
    pub frame: FrameParameters,
    pub reference_model: ReferenceModelSettings,
    pub export: ExportSettings,
    pub view: ViewSettings,
    /// Miter saw settings
    pub machine: MiterCutParameters,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

impl Format {
    fn of(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Self::Toml),
            _ => Err(SettingsError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let format = Format::of(path)?;
        let content = std::fs::read_to_string(path)?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        self.validate()?;

        let content = match Format::of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.frame.validate()?;
        self.reference_model.dimensions.validate()?;
        self.machine.validate()?;

        if let Some(url) = &self.reference_model.url {
            if url.trim().is_empty() {
                return Err(SettingsError::InvalidSetting {
                    key: "reference_model.url".to_string(),
                    reason: "must not be empty when set".to_string(),
                });
            }
        }

        let fov = self.view.fov_degrees;
        if !fov.is_finite() || fov <= 1.0 || fov >= 179.0 {
            return Err(SettingsError::InvalidSetting {
                key: "view.fov_degrees".to_string(),
                reason: "must be between 1 and 179".to_string(),
            });
        }

        Ok(())
    }
}
