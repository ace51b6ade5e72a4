//! Reference asset sources
//!
//! Fetching is the one suspension point of the editor. A fetch is started
//! with an [`AssetTicket`]; when it resolves, the session compares the
//! ticket with the latest one it issued and drops stale results. A fresh
//! result is fitted to whatever parameters are confirmed at that moment.

use crate::error::AssetError;
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

#[async_trait]
pub trait AssetSource: Send + Sync {
    /// Raw bytes of the asset at `url`
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, AssetError>;
}

/// Reads assets from the local filesystem
///
/// Accepts plain paths and `file://` URLs. Relative paths resolve against
/// `root` when one is set.
#[derive(Debug, Clone, Default)]
pub struct FileAssetSource {
    root: Option<PathBuf>,
}

impl FileAssetSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    /// Filesystem path for `url`
    pub fn resolve(&self, url: &str) -> Result<PathBuf, AssetError> {
        let path = match url.split_once("://") {
            Some((scheme, rest)) if scheme.eq_ignore_ascii_case("file") => PathBuf::from(rest),
            Some((scheme, _)) => return Err(AssetError::UnsupportedScheme(scheme.to_string())),
            None => PathBuf::from(url),
        };
        Ok(match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path,
        })
    }
}

#[async_trait]
impl AssetSource for FileAssetSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, AssetError> {
        let path = self.resolve(url)?;
        debug!("Reading asset {}", path.display());
        tokio::fs::read(&path)
            .await
            .map_err(|source| AssetError::Io { path, source })
    }
}

/// Handle of one asset fetch
#[derive(Debug, Clone, PartialEq)]
pub struct AssetTicket {
    pub id: u64,
    pub url: String,
}

/// What happened to a resolved fetch
#[derive(Debug)]
pub enum AssetOutcome {
    /// The model replaced the procedural parts
    Loaded { parts: usize },
    /// Fetch, decode or scaling failed; procedural parts stay in place
    Failed(AssetError),
    /// A newer fetch superseded this one
    Discarded,
}

impl AssetOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }
}
