//! Error types for the engine adapter
//!
//! Every failure a session can end in is one variant of [`EngineError`].
//! None of them are retried here; retry policy belongs to the caller.

use std::path::PathBuf;
use std::time::Duration;

/// Errors that can end an engine session
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Engine binary is missing; reported before any process is started
    #[error("Engine not found at {}", path.display())]
    NotInstalled { path: PathBuf },

    /// The request cannot be turned into UCI commands; nothing was started
    #[error("Invalid analysis request: {message}")]
    InvalidRequest { message: String },

    /// The OS refused to start the engine process
    #[error("Failed to launch engine: {0}")]
    Launch(#[source] std::io::Error),

    /// The engine wrote to its error stream before finishing
    #[error("Engine error: {message}")]
    Stream { message: String },

    /// No `bestmove` line arrived within the session timeout
    #[error("Engine timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// The engine closed its output before reporting a best move
    #[error("Engine exited before reporting a best move")]
    Exited,

    /// Reading from or writing to the engine pipes failed
    #[error("Engine I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
