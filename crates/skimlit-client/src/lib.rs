//! HTTP client for a running SkimLit server.

use serde::de::DeserializeOwned;
use skimlit_core::ServiceError;
use skimlit_core::api::{
    DemoResponse, ErrorBody, HealthResponse, InputMode, MetricsResponse, PredictRequest,
    PredictResponse,
};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {message}")]
    Server {
        status: u16,
        kind: Option<String>,
        message: String,
    },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    /// The server-side error this response encodes, if it is one of ours.
    pub fn service_error(&self) -> Option<ServiceError> {
        match self {
            Self::Server {
                kind: Some(kind),
                message,
                ..
            } => ServiceError::from_kind(kind, message.clone()),
            _ => None,
        }
    }
}

/// Client for the `/api` endpoints.
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// `base_url` should be like `http://localhost:8501` (trailing slash optional).
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Classify an abstract on the server.
    pub async fn predict(&self, text: &str, mode: InputMode) -> Result<PredictResponse, ClientError> {
        let url = format!("{}/api/predict", self.base_url);
        let body = PredictRequest {
            text: text.to_string(),
            mode,
        };

        info!(url = %url, chars = text.chars().count(), ?mode, "requesting predictions");
        let resp = self.client.post(&url).json(&body).send().await?;
        let result: PredictResponse = decode(resp).await?;
        info!(lines = result.predictions.len(), "received predictions");
        Ok(result)
    }

    pub async fn demo_text(&self) -> Result<String, ClientError> {
        let url = format!("{}/api/demo", self.base_url);
        let resp = self.client.get(&url).send().await?;
        let demo: DemoResponse = decode(resp).await?;
        Ok(demo.text)
    }

    pub async fn metrics(&self) -> Result<MetricsResponse, ClientError> {
        let url = format!("{}/api/metrics", self.base_url);
        debug!(url = %url, "requesting metrics");
        let resp = self.client.get(&url).send().await?;
        decode(resp).await
    }

    /// Evaluation plot bytes and their MIME type.
    pub async fn metrics_image(&self) -> Result<(String, Vec<u8>), ClientError> {
        let url = format!("{}/api/metrics/image", self.base_url);
        let resp = check(self.client.get(&url).send().await?).await?;
        let mime = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = resp.bytes().await?;
        Ok((mime, bytes.to_vec()))
    }

    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let url = format!("{}/healthz", self.base_url);
        let resp = self.client.get(&url).send().await?;
        decode(resp).await
    }
}

/// Turn non-2xx responses into [`ClientError::Server`].
async fn check(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    let (kind, message) = match serde_json::from_str::<ErrorBody>(&body) {
        Ok(err) => (Some(err.kind), err.message),
        Err(_) => (None, body),
    };
    Err(ClientError::Server {
        status: status.as_u16(),
        kind,
        message,
    })
}

async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClientError> {
    let body = check(resp).await?.text().await?;
    Ok(serde_json::from_str(&body)?)
}
