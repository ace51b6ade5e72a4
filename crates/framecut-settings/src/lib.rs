//! FrameCut Settings Crate
//!
//! Application configuration and its persistence.

pub mod config;
pub mod error;
pub mod persistence;

pub use config::{Config, ExportSettings, ReferenceModelSettings, ViewSettings};
pub use error::{Result, SettingsError};
pub use persistence::{default_config_path, SettingsPersistence};
