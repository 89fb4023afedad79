use crate::engine;
use axum::{
    extract::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Semaphore;
use uci_engine::EngineRunner;

#[derive(Clone)]
pub struct AppState {
    pub runner: EngineRunner,
    // Admission control: one permit per running engine process
    pub sessions: Option<Arc<Semaphore>>,
}

impl AppState {
    pub fn new(runner: EngineRunner, max_sessions: Option<usize>) -> Self {
        Self {
            runner,
            sessions: max_sessions.map(|n| Arc::new(Semaphore::new(n))),
        }
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Serialize)]
pub struct SampleMovesResponse {
    pub moves: Vec<&'static str>,
}

/// Opening line served to the front end as a fixture
const SAMPLE_MOVES: [&str; 6] = ["e4", "e5", "Nf3", "Nc6", "Bb5", "a6"];

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/moves", get(sample_moves))
        .route("/api/engine/status", get(engine::status))
        .route("/api/engine/analyze", post(engine::analyze))
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn sample_moves() -> Json<SampleMovesResponse> {
    Json(SampleMovesResponse {
        moves: SAMPLE_MOVES.to_vec(),
    })
}
