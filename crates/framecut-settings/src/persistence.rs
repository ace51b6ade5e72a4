//! Settings persistence
//!
//! Locates the configuration file in the platform config directory and
//! loads it, falling back to defaults when it does not exist yet.

use crate::config::Config;
use crate::error::{Result, SettingsError};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const APP_DIR: &str = "framecut";
const CONFIG_FILE: &str = "config.toml";

/// Config file path under the platform configuration directory
pub fn default_config_path() -> Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| {
        SettingsError::ConfigDirectory("no platform configuration directory".to_string())
    })?;
    Ok(base.join(APP_DIR).join(CONFIG_FILE))
}

/// Configuration bound to the file it was loaded from
#[derive(Debug, Clone)]
pub struct SettingsPersistence {
    path: PathBuf,
    config: Config,
}

impl SettingsPersistence {
    /// Load `path`, or use defaults if the file does not exist
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let config = if path.exists() {
            info!("Loading settings from {}", path.display());
            Config::load_from_file(&path)?
        } else {
            debug!("No settings at {}, using defaults", path.display());
            Config::default()
        };
        Ok(Self { path, config })
    }

    /// Load from [`default_config_path`]
    pub fn load_default() -> Result<Self> {
        Self::load_or_default(default_config_path()?)
    }

    pub fn save(&self) -> Result<()> {
        self.config.save_to_file(&self.path)?;
        info!("Saved settings to {}", self.path.display());
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }
}
