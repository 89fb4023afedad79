//! HTTP client for the analysis API

use crate::error::{ClientError, ClientResult};
use reqwest::Response;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;
use uci_engine::AnalysisResult;

/// Body of `POST /api/engine/analyze`
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalyzeBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fen: Option<String>,
    pub moves: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movetime: Option<u64>,
}

/// Response of `GET /api/engine/status`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineStatusBody {
    pub available: bool,
    pub engine_path: Option<String>,
    pub download_url: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Thin wrapper over the analysis endpoints
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn status(&self) -> ClientResult<EngineStatusBody> {
        let response = self.http.get(self.url("/api/engine/status")).send().await?;
        read_json(response).await
    }

    pub async fn analyze(&self, body: &AnalyzeBody) -> ClientResult<AnalysisResult> {
        debug!(moves = body.moves.len(), depth = ?body.depth, "Requesting analysis");
        let response = self
            .http
            .post(self.url("/api/engine/analyze"))
            .json(body)
            .send()
            .await?;
        read_json(response).await
    }
}

/// Decode a success body, or turn `{"error": ...}` into [`ClientError::Api`]
async fn read_json<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let text = response.text().await?;
    Err(ClientError::Api(error_message(status.as_u16(), &text)))
}

fn error_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(body) => body.error,
        Err(_) if body.trim().is_empty() => format!("HTTP {status}"),
        Err(_) => format!("HTTP {status}: {}", body.trim()),
    }
}
