//! HTTP API in front of the UCI engine adapter
//!
//! Exposes health, a sample-moves fixture, engine status and engine analysis
//! over axum. Every analysis runs on its own engine process.

pub mod api;
pub mod config;
pub mod engine;
