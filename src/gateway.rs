//! Client for the proxy's own `/api` surface.
//!
//! One request primitive backs the three catalog calls. There is no retry and
//! no caching here; callers keep whatever state they need.
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::env;
use thiserror::Error;
use url::Url;
use tracing::debug;

use crate::models::{MovieDetail, MovieListing};
use crate::sorts::SortOption;

pub const DEFAULT_BASE_PATH: &str = "/api";

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("API Error: {status} {detail}")]
    Api { status: u16, detail: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    origin: String,
    base_path: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

impl ApiClient {
    /// `origin` is scheme + host (+ port) of the proxy, e.g. `http://localhost:3377`.
    pub fn new(origin: impl Into<String>) -> Self {
        Self::with_base_path(origin, DEFAULT_BASE_PATH)
    }

    pub fn with_base_path(origin: impl Into<String>, base_path: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            origin: origin.into().trim_end_matches('/').to_string(),
            base_path: base_path.into(),
        }
    }

    /// Base from `CINESCROLL_API_BASE_URL` (a path or an absolute URL), falling back to `/api`.
    pub fn from_env(origin: impl Into<String>) -> Self {
        let base_path =
            env::var("CINESCROLL_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_PATH.to_string());
        Self::with_base_path(origin, base_path)
    }

    /// The base path is resolved against the origin, so an absolute base URL wins.
    pub fn url_for(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Url, GatewayError> {
        let base = Url::parse(&self.origin)?.join(&self.base_path)?;
        let mut url = Url::parse(&format!(
            "{}{}",
            base.as_str().trim_end_matches('/'),
            endpoint
        ))?;
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T, GatewayError> {
        let url = self.url_for(endpoint, params)?;
        debug!("GET {}", url);
        let res = self.client.get(url).send().await?;
        let status = res.status();
        if !status.is_success() {
            let body = res.bytes().await.unwrap_or_default();
            let detail = serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("").to_string());
            return Err(GatewayError::Api {
                status: status.as_u16(),
                detail,
            });
        }
        Ok(res.json::<T>().await?)
    }

    /// Discover listing; page numbers start at 1.
    pub async fn get_movies(
        &self,
        sort_by: SortOption,
        page: Option<u32>,
    ) -> Result<MovieListing, GatewayError> {
        self.request(
            "/movies/discover",
            &[
                ("sort_by", sort_by.as_str().to_string()),
                ("page", page.unwrap_or(1).to_string()),
            ],
        )
        .await
    }

    pub async fn get_movie_detail(&self, movie_id: u64) -> Result<MovieDetail, GatewayError> {
        self.request(&format!("/movies/{movie_id}"), &[]).await
    }

    pub async fn search_movies(
        &self,
        query: &str,
        page: Option<u32>,
    ) -> Result<MovieListing, GatewayError> {
        self.request(
            "/movies/search",
            &[
                ("query", query.to_string()),
                ("page", page.unwrap_or(1).to_string()),
            ],
        )
        .await
    }
}
