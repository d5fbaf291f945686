use crate::config::TmdbConfig;
use crate::error::{ProxyError, UpstreamError};
use crate::sorts::DEFAULT_SORT;
use crate::tmdb::{TmdbApi, TmdbClient, UpstreamRequest};
use crate::validation::{parse_positive_int, parse_sort_option};
use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use axum_extra::TypedHeader;
use headers::CacheControl;
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

type Params = Vec<(String, String)>;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<TmdbConfig>,
    pub tmdb: Arc<dyn TmdbApi>,
}

pub async fn run_server(config: TmdbConfig, addr: SocketAddr) -> Result<()> {
    let tmdb: Arc<dyn TmdbApi> = Arc::new(TmdbClient::new()?);
    let state = AppState {
        config: Arc::new(config),
        tmdb,
    };

    let app = build_router(state);

    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/movies/discover", get(discover_movies))
        .route("/api/movies/search", get(search_movies))
        .route("/api/movies/:movie_id", get(movie_details))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

/// First value for `key`, matching how browsers read repeated query keys.
fn first_param<'a>(params: &'a Params, key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

async fn discover_movies(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<Response, ProxyError> {
    let creds = state.config.credentials()?;

    // Page goes upstream as given; only the sort token is checked, and a bad
    // one falls back to the default instead of failing the request.
    let page = first_param(&params, "page")
        .filter(|p| !p.is_empty())
        .unwrap_or("1");
    let sort_by = parse_sort_option(first_param(&params, "sort_by")).unwrap_or(DEFAULT_SORT);
    debug!(page = %page, sort_by = %sort_by, "Discover request");

    let request = UpstreamRequest::discover(creds, page, sort_by);
    forward(&state, &request, "Failed to discover movies", None).await
}

async fn search_movies(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<Response, ProxyError> {
    let creds = state.config.credentials()?;

    let query = first_param(&params, "query")
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or(ProxyError::Validation("Search query is required"))?;
    let raw_page = first_param(&params, "page")
        .filter(|p| !p.is_empty())
        .unwrap_or("1");
    let page: u32 =
        parse_positive_int(raw_page).ok_or(ProxyError::Validation("Invalid page number"))?;
    debug!(query = %query, page, "Search request");

    let request = UpstreamRequest::search(creds, query, page);
    forward(&state, &request, "Failed to search movies", None).await
}

async fn movie_details(
    State(state): State<AppState>,
    Path(movie_id): Path<String>,
) -> Result<Response, ProxyError> {
    let creds = state.config.credentials()?;

    let movie_id: u64 =
        parse_positive_int(&movie_id).ok_or(ProxyError::Validation("Invalid movie ID"))?;
    debug!(movie_id, "Detail request");

    let request = UpstreamRequest::movie_detail(creds, movie_id);
    forward(&state, &request, "Failed to fetch movie details", Some("Movie not found")).await
}

/// Call upstream and map the outcome onto the endpoint's response shape.
async fn forward(
    state: &AppState,
    request: &UpstreamRequest,
    failure: &'static str,
    not_found: Option<&'static str>,
) -> Result<Response, ProxyError> {
    match state.tmdb.fetch(request).await {
        Ok(body) => {
            let cache = CacheControl::new()
                .with_public()
                .with_max_age(request.freshness);
            Ok((TypedHeader(cache), Json(body)).into_response())
        }
        Err(e) => match (e.status(), not_found) {
            (Some(404), Some(message)) => {
                info!("TMDB has no entry for {}", request.path);
                Err(ProxyError::NotFound(message))
            }
            _ => {
                log_upstream_failure(failure, request, &e);
                Err(ProxyError::Upstream(failure))
            }
        },
    }
}

fn log_upstream_failure(failure: &str, request: &UpstreamRequest, err: &UpstreamError) {
    match err {
        UpstreamError::Status { status, body } => {
            error!("{} ({}): upstream status {}: {}", failure, request.path, status, body)
        }
        other => error!("{} ({}): {}", failure, request.path, other),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut term = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        term.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        }
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        }
    }
}
