//! Error types for the terminal client
//!
//! Covers everything the presentation side can reject: moves the rules
//! library refuses (from the user or from the engine), unreadable starting
//! positions, and failed calls to the analysis API.

/// Errors that can occur while playing against the engine
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The engine suggested a move the rules library rejects
    #[error("Engine returned an illegal move: {uci}")]
    IllegalEngineMove { uci: String },

    /// The user typed an unparsable or illegal move
    #[error("Illegal move: {uci}")]
    IllegalMove { uci: String },

    /// Starting FEN could not be turned into a legal position
    #[error("Invalid position: {message}")]
    InvalidPosition { message: String },

    /// Transport-level failure talking to the API
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with an error body
    #[error("Server error: {0}")]
    Api(String),
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;
