use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;
use tracing::{info, warn};

use crate::error::ProxyError;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3377";

/// Upstream credentials, read once at startup.
///
/// Either field may be missing; the proxy still starts and every endpoint
/// answers with a configuration error until both are provided.
#[derive(Debug, Clone, Default)]
pub struct TmdbConfig {
    api_key: Option<String>,
    base_url: Option<String>,
}

/// Borrowed view of a complete configuration.
#[derive(Debug, Clone, Copy)]
pub struct Credentials<'a> {
    pub api_key: &'a str,
    pub base_url: &'a str,
}

impl TmdbConfig {
    pub fn new(api_key: Option<String>, base_url: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|s| !s.is_empty()),
            base_url: base_url
                .filter(|s| !s.is_empty())
                .map(|s| s.trim_end_matches('/').to_string()),
        }
    }

    pub fn from_env() -> Self {
        let config = Self::new(env::var("TMDB_API_KEY").ok(), env::var("TMDB_BASE_URL").ok());
        if config.is_complete() {
            info!("TMDB credentials configured");
        } else {
            warn!("TMDB_API_KEY / TMDB_BASE_URL missing - proxy endpoints will return 500");
        }
        config
    }

    pub fn is_complete(&self) -> bool {
        self.api_key.is_some() && self.base_url.is_some()
    }

    /// Shared gate for every proxy endpoint, checked before any network call.
    pub fn credentials(&self) -> Result<Credentials<'_>, ProxyError> {
        match (self.api_key.as_deref(), self.base_url.as_deref()) {
            (Some(api_key), Some(base_url)) => Ok(Credentials { api_key, base_url }),
            _ => Err(ProxyError::Configuration),
        }
    }
}

pub fn bind_addr_from_env() -> Result<SocketAddr> {
    let raw = env::var("CINESCROLL_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    raw.parse()
        .with_context(|| format!("CINESCROLL_BIND_ADDR '{}' is not a socket address", raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_values_count_as_missing() {
        let config = TmdbConfig::new(Some(String::new()), Some("https://api".to_string()));
        assert!(!config.is_complete());
        assert!(matches!(config.credentials(), Err(ProxyError::Configuration)));
    }

    #[test]
    fn strips_trailing_slash_from_base_url() {
        let config = TmdbConfig::new(
            Some("key".to_string()),
            Some("https://api.themoviedb.org/3/".to_string()),
        );
        let creds = config.credentials().unwrap();
        assert_eq!(creds.base_url, "https://api.themoviedb.org/3");
        assert_eq!(creds.api_key, "key");
    }
}
