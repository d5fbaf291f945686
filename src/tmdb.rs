use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::config::Credentials;
use crate::error::UpstreamError;
use crate::sorts::SortOption;

pub const DISCOVER_FRESHNESS: Duration = Duration::from_secs(10 * 60);
pub const SEARCH_FRESHNESS: Duration = Duration::from_secs(5 * 60);
pub const DETAIL_FRESHNESS: Duration = Duration::from_secs(30 * 60);

const MAX_CACHE_ENTRIES: usize = 1_000;

/// A fully resolved upstream GET, including its freshness window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRequest {
    base_url: String,
    pub path: String,
    pub params: Vec<(&'static str, String)>,
    pub freshness: Duration,
}

impl UpstreamRequest {
    pub fn discover(creds: Credentials<'_>, page: &str, sort_by: SortOption) -> Self {
        Self {
            base_url: creds.base_url.to_string(),
            path: "/discover/movie".to_string(),
            params: vec![
                ("api_key", creds.api_key.to_string()),
                ("page", page.to_string()),
                ("sort_by", sort_by.as_str().to_string()),
            ],
            freshness: DISCOVER_FRESHNESS,
        }
    }

    /// Adult titles are always excluded from search.
    pub fn search(creds: Credentials<'_>, query: &str, page: u32) -> Self {
        Self {
            base_url: creds.base_url.to_string(),
            path: "/search/movie".to_string(),
            params: vec![
                ("api_key", creds.api_key.to_string()),
                ("query", query.to_string()),
                ("page", page.to_string()),
                ("include_adult", "false".to_string()),
            ],
            freshness: SEARCH_FRESHNESS,
        }
    }

    pub fn movie_detail(creds: Credentials<'_>, movie_id: u64) -> Self {
        Self {
            base_url: creds.base_url.to_string(),
            path: format!("/movie/{movie_id}"),
            params: vec![("api_key", creds.api_key.to_string())],
            freshness: DETAIL_FRESHNESS,
        }
    }

    pub fn url(&self) -> String {
        let query = self
            .params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}{}?{}", self.base_url, self.path, query)
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[async_trait]
pub trait TmdbApi: Send + Sync {
    /// Issue the request and return the upstream JSON body untouched.
    async fn fetch(&self, request: &UpstreamRequest) -> Result<Value, UpstreamError>;
}

#[derive(Debug, Clone)]
struct CachedBody {
    stored_at: i64,
    ttl_secs: i64,
    body: Value,
}

/// reqwest-backed upstream client with an in-memory freshness cache.
#[derive(Debug)]
pub struct TmdbClient {
    client: Client,
    cache: Mutex<HashMap<String, CachedBody>>,
}

impl TmdbClient {
    pub fn new() -> Result<Self> {
        let user_agent = format!("cinescroll/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(30))
            .user_agent(user_agent)
            .build()
            .context("Failed to build TMDB HTTP client")?;
        Ok(Self {
            client,
            cache: Mutex::new(HashMap::new()),
        })
    }

    async fn cached(&self, url: &str) -> Option<Value> {
        let now = Utc::now().timestamp();
        let guard = self.cache.lock().await;
        guard
            .get(url)
            .filter(|entry| now - entry.stored_at < entry.ttl_secs)
            .map(|entry| entry.body.clone())
    }

    async fn remember(&self, url: String, freshness: Duration, body: &Value) {
        let now = Utc::now().timestamp();
        let mut guard = self.cache.lock().await;
        if guard.len() >= MAX_CACHE_ENTRIES {
            guard.retain(|_, entry| now - entry.stored_at < entry.ttl_secs);
            if guard.len() >= MAX_CACHE_ENTRIES {
                guard.clear();
            }
        }
        guard.insert(
            url,
            CachedBody {
                stored_at: now,
                ttl_secs: freshness.as_secs() as i64,
                body: body.clone(),
            },
        );
    }

    async fn get_json(&self, url: &str, path: &str) -> Result<Value, UpstreamError> {
        let res = self
            .client
            .get(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| UpstreamError::Transport(anyhow::Error::new(e).context("request failed")))?;
        let status = res.status();
        let text = res.text().await.map_err(|e| {
            UpstreamError::Transport(anyhow::Error::new(e).context("reading body failed"))
        })?;
        if !status.is_success() {
            warn!("TMDB {} -> {}", path, status);
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl TmdbApi for TmdbClient {
    async fn fetch(&self, request: &UpstreamRequest) -> Result<Value, UpstreamError> {
        let url = request.url();
        if let Some(body) = self.cached(&url).await {
            debug!("TMDB cache hit for {}", request.path);
            return Ok(body);
        }
        let body = self.get_json(&url, &request.path).await?;
        self.remember(url, request.freshness, &body).await;
        Ok(body)
    }
}
