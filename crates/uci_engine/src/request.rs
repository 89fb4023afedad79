//! Analysis requests and the UCI commands they turn into

use crate::config::{session_timeout, DEFAULT_MOVETIME_MS};
use crate::error::{EngineError, EngineResult};
use std::fmt;
use std::time::Duration;

/// Marker for the initial layout, as accepted in requests and sent to engines
pub const STARTPOS: &str = "startpos";

/// Position to analyze, before any moves are applied
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Position {
    #[default]
    StartPos,
    Fen(String),
}

impl Position {
    /// Blank input and the literal `startpos` both mean the initial layout
    ///
    /// Runs of whitespace, line breaks included, collapse to single spaces so
    /// a FEN always stays on one command line.
    pub fn parse(input: &str) -> Self {
        let collapsed = input.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() || collapsed == STARTPOS {
            Position::StartPos
        } else {
            Position::Fen(collapsed)
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::StartPos => f.write_str(STARTPOS),
            Position::Fen(fen) => f.write_str(fen),
        }
    }
}

/// One analysis job for a fresh engine process
///
/// When `depth` is set the search is depth-bounded and `movetime_ms` only
/// feeds the session timeout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub position: Position,
    pub moves: Vec<String>,
    pub depth: Option<u32>,
    pub movetime_ms: u64,
}

impl Default for AnalysisRequest {
    fn default() -> Self {
        Self {
            position: Position::StartPos,
            moves: Vec::new(),
            depth: None,
            movetime_ms: DEFAULT_MOVETIME_MS,
        }
    }
}

impl AnalysisRequest {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn with_moves<I, S>(mut self, moves: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.moves = moves.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = Some(depth);
        self
    }

    pub fn with_movetime(mut self, movetime_ms: u64) -> Self {
        self.movetime_ms = movetime_ms;
        self
    }

    /// Check that every field fits on a single UCI command line
    ///
    /// Move tokens must be non-empty and free of whitespace; neither the FEN
    /// nor any move may contain control characters.
    pub fn validate(&self) -> EngineResult<()> {
        if let Position::Fen(fen) = &self.position {
            if fen.trim().is_empty() {
                return Err(invalid("FEN is empty"));
            }
            if fen.chars().any(char::is_control) {
                return Err(invalid("FEN contains control characters"));
            }
        }

        for token in &self.moves {
            if token.is_empty() {
                return Err(invalid("move token is empty"));
            }
            if token.chars().any(|c| c.is_whitespace() || c.is_control()) {
                return Err(invalid(format!("move token {token:?} is malformed")));
            }
        }
        Ok(())
    }

    /// `position startpos|fen <fen> [moves m1 m2 ...]`
    pub fn position_command(&self) -> String {
        let mut command = match &self.position {
            Position::StartPos => format!("position {STARTPOS}"),
            Position::Fen(fen) => format!("position fen {fen}"),
        };
        if !self.moves.is_empty() {
            command.push_str(" moves ");
            command.push_str(&self.moves.join(" "));
        }
        command
    }

    /// `go depth <N>` when a depth is set, `go movetime <T>` otherwise
    pub fn go_command(&self) -> String {
        match self.depth {
            Some(depth) => format!("go depth {depth}"),
            None => format!("go movetime {}", self.movetime_ms),
        }
    }

    pub fn timeout(&self) -> Duration {
        session_timeout(self.movetime_ms)
    }
}

fn invalid(message: impl Into<String>) -> EngineError {
    EngineError::InvalidRequest {
        message: message.into(),
    }
}
