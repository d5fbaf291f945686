use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Everything a proxy endpoint can answer with besides success.
///
/// Upstream details stay in the server log.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProxyError {
    #[error("TMDB API key / Base URL not configured")]
    Configuration,
    #[error("{0}")]
    Validation(&'static str),
    #[error("{0}")]
    NotFound(&'static str),
    #[error("{0}")]
    Upstream(&'static str),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::Configuration | ProxyError::Upstream(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ProxyError::Validation(_) => StatusCode::BAD_REQUEST,
            ProxyError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Failure talking to the upstream movie API.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("TMDB API error: {status}")]
    Status { status: u16, body: String },
    #[error("TMDB request failed: {0:#}")]
    Transport(anyhow::Error),
    #[error("TMDB returned invalid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

impl UpstreamError {
    pub fn status(&self) -> Option<u16> {
        match self {
            UpstreamError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
