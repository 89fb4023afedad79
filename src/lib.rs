//! Terminal client for playing against a UCI engine
//!
//! The engine runs behind the HTTP API served by the `backend` crate; this
//! crate keeps the game itself. Board state, legality and game termination
//! come from `shakmaty`, so an engine move is only applied once the rules
//! library accepts it.

pub mod board_utils;
pub mod client;
pub mod error;
pub mod game;

pub use client::{AnalyzeBody, ApiClient};
pub use error::{ClientError, ClientResult};
pub use game::Game;
