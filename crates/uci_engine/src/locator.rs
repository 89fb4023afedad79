//! Engine locator
//!
//! Answers "where is the engine and is it there?" without ever starting it.

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use std::path::PathBuf;

/// Availability report for the configured engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineStatus {
    /// Whether the resolved path exists on disk
    pub available: bool,
    /// The resolved path, present or not
    pub path: PathBuf,
    /// Acquisition hint for users without an engine
    pub download_url: String,
}

/// Resolves the engine binary from an override or the default location
#[derive(Debug, Clone, Default)]
pub struct EngineLocator {
    config: EngineConfig,
}

impl EngineLocator {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The path a session would launch, override first
    pub fn resolve(&self) -> PathBuf {
        self.config
            .path_override
            .clone()
            .unwrap_or_else(|| self.config.default_path.clone())
    }

    /// Filesystem existence check only
    pub fn status(&self) -> EngineStatus {
        let path = self.resolve();
        EngineStatus {
            available: path.exists(),
            path,
            download_url: self.config.download_url.clone(),
        }
    }

    /// Resolved path, or [`EngineError::NotInstalled`] when it is missing
    pub fn require(&self) -> EngineResult<PathBuf> {
        let status = self.status();
        if status.available {
            Ok(status.path)
        } else {
            Err(EngineError::NotInstalled { path: status.path })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing_path() -> PathBuf {
        std::env::temp_dir().join(format!("no-engine-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_resolve_prefers_override() {
        let locator = EngineLocator::new(EngineConfig::with_path("/opt/sf"));
        assert_eq!(locator.resolve(), PathBuf::from("/opt/sf"));
    }

    #[test]
    fn test_resolve_falls_back_to_default() {
        let locator = EngineLocator::default();
        assert_eq!(locator.resolve(), crate::config::default_engine_path());
    }

    #[test]
    fn test_status_reports_missing_binary() {
        let path = missing_path();
        let locator = EngineLocator::new(EngineConfig::with_path(&path));
        let status = locator.status();

        assert!(!status.available);
        assert_eq!(status.path, path);
        assert_eq!(status.download_url, crate::config::DOWNLOAD_URL);
    }

    #[test]
    fn test_status_reports_existing_binary() {
        // Any existing file will do; the locator never executes it
        let path = std::env::current_exe().expect("test binary path");
        let locator = EngineLocator::new(EngineConfig::with_path(&path));
        assert!(locator.status().available);
        assert_eq!(locator.require().expect("available"), path);
    }

    #[test]
    fn test_require_missing_is_not_installed() {
        let locator = EngineLocator::new(EngineConfig::with_path(missing_path()));
        assert!(matches!(
            locator.require(),
            Err(EngineError::NotInstalled { .. })
        ));
    }
}
