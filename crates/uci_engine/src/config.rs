//! Engine configuration
//!
//! Resolves where the engine binary lives and how long a search may take.
//! The binary path can be overridden with the `STOCKFISH_PATH` environment
//! variable; otherwise `engines/stockfish` under the working directory is used.

use std::path::PathBuf;
use std::time::Duration;

/// Environment variable holding the engine binary override
pub const ENGINE_PATH_ENV: &str = "STOCKFISH_PATH";

/// Where to send users whose engine is missing
pub const DOWNLOAD_URL: &str = "https://stockfishchess.org/download/";

/// Search time used when a request does not set one
pub const DEFAULT_MOVETIME_MS: u64 = 600;

/// Lower bound on a session timeout
pub const MIN_TIMEOUT_MS: u64 = 250;

/// Slack added on top of the requested search time before timing out
pub const TIMEOUT_SLACK_MS: u64 = 1500;

#[cfg(windows)]
const DEFAULT_ENGINE_FILE: &str = "stockfish.exe";
#[cfg(not(windows))]
const DEFAULT_ENGINE_FILE: &str = "stockfish";

/// Engine location and acquisition hint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Path supplied through the environment, if any
    pub path_override: Option<PathBuf>,
    /// Fallback location when no override is set
    pub default_path: PathBuf,
    /// Shown to users when the engine is missing
    pub download_url: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            path_override: None,
            default_path: default_engine_path(),
            download_url: DOWNLOAD_URL.to_string(),
        }
    }
}

impl EngineConfig {
    /// Build the config from a variable source such as the process environment
    ///
    /// Reads `STOCKFISH_PATH`; an empty or whitespace-only value counts as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let path_override = lookup(ENGINE_PATH_ENV)
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Self {
            path_override,
            ..Self::default()
        }
    }

    /// Config pinned to a specific binary
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path_override: Some(path.into()),
            ..Self::default()
        }
    }
}

/// `engines/stockfish` relative to the working directory
pub fn default_engine_path() -> PathBuf {
    PathBuf::from("engines").join(DEFAULT_ENGINE_FILE)
}

/// Session timeout for a given search time
///
/// `max(250ms, movetime + 1500ms)`, computed from the time budget even when
/// the search itself is bounded by depth.
pub fn session_timeout(movetime_ms: u64) -> Duration {
    let millis = movetime_ms
        .saturating_add(TIMEOUT_SLACK_MS)
        .max(MIN_TIMEOUT_MS);
    Duration::from_millis(millis)
}
