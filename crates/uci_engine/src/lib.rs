//! UCI engine adapter
//!
//! Drives an external UCI chess engine (Stockfish or compatible) as a
//! subprocess and turns its line-oriented output into a single
//! [`AnalysisResult`].
//!
//! # Architecture
//!
//! - [`locator`]: finds the engine binary and reports whether it exists
//! - [`framing`]: splits the engine's byte stream into lines
//! - [`protocol`]: parses `info` / `bestmove` lines and formats evaluations
//! - [`request`]: analysis parameters and the `position` / `go` commands
//! - [`session`]: the per-request state machine and its async driver
//! - [`runner`]: spawns, drives and terminates one process per request
//!
//! Sessions never share state; each request gets its own process and its own
//! accumulator.
//!
//! ```rust,ignore
//! let config = EngineConfig::from_lookup(|key| std::env::var(key).ok());
//! let runner = EngineRunner::new(EngineLocator::new(config));
//! let request = AnalysisRequest::default().with_moves(["e2e4"]).with_depth(12);
//! let result = runner.analyze(request).await?;
//! println!("{} ({})", result.bestmove, result.evaluation.unwrap().display);
//! ```

pub mod config;
pub mod error;
pub mod framing;
pub mod locator;
pub mod protocol;
pub mod request;
pub mod runner;
pub mod session;

pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
pub use locator::{EngineLocator, EngineStatus};
pub use protocol::{AnalysisResult, Evaluation, ScoreKind};
pub use request::{AnalysisRequest, Position};
pub use runner::EngineRunner;
pub use session::{Session, SessionState};
