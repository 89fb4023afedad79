//! Engine endpoints
//!
//! `GET /api/engine/status` reports whether the engine binary is present
//! without starting it. `POST /api/engine/analyze` runs one analysis on a
//! fresh engine process and maps every failure to `503 {"error": ...}`.

use crate::api::AppState;
use axum::{
    body::Bytes,
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info, warn};
use uci_engine::config::DEFAULT_MOVETIME_MS;
use uci_engine::{AnalysisRequest, AnalysisResult, EngineError, Position};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub available: bool,
    /// File name only; full paths stay on the server
    pub engine_path: Option<String>,
    pub download_url: String,
}

/// Body of `POST /api/engine/analyze`
///
/// Every field is optional. [`AnalyzeRequest::from_body`] keeps only fields of
/// the right JSON type and [`AnalyzeRequest::normalize`] drops the ones that
/// cannot be used.
#[derive(Debug, Default, PartialEq)]
pub struct AnalyzeRequest {
    pub fen: Option<String>,
    pub moves: Option<Vec<String>>,
    pub depth: Option<f64>,
    pub movetime: Option<f64>,
}

impl AnalyzeRequest {
    /// Read a request body without rejecting it
    ///
    /// An empty body, a body that is not a JSON object, and fields of the
    /// wrong type all fall back to defaults.
    pub fn from_body(body: &[u8]) -> Self {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Self::default();
        }

        let value: Value = match serde_json::from_slice(body) {
            Ok(value) => value,
            Err(e) => {
                debug!(error = %e, "Unreadable analyze body, using defaults");
                return Self::default();
            }
        };

        Self {
            fen: value.get("fen").and_then(Value::as_str).map(str::to_string),
            moves: value.get("moves").and_then(Value::as_array).map(|moves| {
                moves
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            }),
            depth: value.get("depth").and_then(Value::as_f64),
            movetime: value.get("movetime").and_then(Value::as_f64),
        }
    }

    /// Apply defaults and split move tokens on whitespace
    pub fn normalize(self) -> AnalysisRequest {
        let position = self
            .fen
            .as_deref()
            .map(Position::parse)
            .unwrap_or_default();

        let depth = self
            .depth
            .filter(|d| d.is_finite() && *d >= 1.0)
            .map(|d| d.min(f64::from(u32::MAX)) as u32);

        let movetime_ms = self
            .movetime
            .filter(|t| t.is_finite() && *t >= 0.0)
            .map(|t| t as u64)
            .unwrap_or(DEFAULT_MOVETIME_MS);

        AnalysisRequest {
            position,
            moves: self
                .moves
                .unwrap_or_default()
                .iter()
                .flat_map(|token| token.split_whitespace())
                .map(str::to_string)
                .collect(),
            depth,
            movetime_ms,
        }
    }
}

/// `503 {"error": message}`
#[derive(Debug)]
pub struct ApiError(pub String);

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorBody { error: self.0 }),
        )
            .into_response()
    }
}

impl From<EngineError> for ApiError {
    fn from(e: EngineError) -> Self {
        ApiError(e.to_string())
    }
}

pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let status = state.runner.locator().status();
    Json(StatusResponse {
        available: status.available,
        engine_path: status
            .available
            .then(|| basename(&status.path))
            .flatten(),
        download_url: status.download_url,
    })
}

pub async fn analyze(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AnalysisResult>, ApiError> {
    let request = AnalyzeRequest::from_body(&body).normalize();
    request.validate()?;

    // Checked here as well as in the runner so a missing engine never
    // consumes an admission permit
    state.runner.locator().require()?;

    let _permit = match &state.sessions {
        Some(sessions) => Some(sessions.clone().try_acquire_owned().map_err(|_| {
            warn!("Rejecting analysis: engine session limit reached");
            ApiError("Engine busy: too many concurrent analyses".to_string())
        })?),
        None => None,
    };

    info!(
        position = %request.position,
        moves = request.moves.len(),
        depth = ?request.depth,
        movetime_ms = request.movetime_ms,
        "Analysis requested"
    );

    let result = state.runner.analyze(request).await?;
    Ok(Json(result))
}

fn basename(path: &Path) -> Option<String> {
    path.file_name().map(|name| name.to_string_lossy().into_owned())
}
