use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use indicatif::ProgressBar;
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::error::PipelineError;
use crate::model::LegislativeMatter;
use crate::pipeline;
use crate::query::{self, CategoryFilter, SortBy, ViewState};
use crate::settings::Settings;

pub struct AppState {
    pub settings: Settings,
    pub client: reqwest::Client,
}

#[derive(Debug, Default, Deserialize)]
pub struct MattersQuery {
    category: Option<String>,
    q: Option<String>,
    sort: Option<String>,
}

impl MattersQuery {
    fn is_empty(&self) -> bool {
        self.category.is_none() && self.q.is_none() && self.sort.is_none()
    }

    fn to_view_state(&self) -> Result<ViewState, String> {
        Ok(ViewState {
            category: match &self.category {
                Some(c) => c.parse::<CategoryFilter>()?,
                None => CategoryFilter::All,
            },
            search: self.q.clone().unwrap_or_default(),
            sort_by: match &self.sort {
                Some(s) => s.parse::<SortBy>()?,
                None => SortBy::default(),
            },
        })
    }
}

/// Handler-level failures, rendered as `{"error": ..., "message": ...}`.
pub enum ApiError {
    Pipeline(PipelineError),
    BadQuery(String),
}

impl From<PipelineError> for ApiError {
    fn from(e: PipelineError) -> Self {
        ApiError::Pipeline(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::Pipeline(e @ PipelineError::Unavailable) => {
                warn!("{}", e);
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", e.to_string())
            }
            ApiError::Pipeline(e @ PipelineError::Internal(_)) => {
                error!("{}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", e.to_string())
            }
            ApiError::BadQuery(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
        };
        (
            status,
            Json(serde_json::json!({ "error": code, "message": message })),
        )
            .into_response()
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/", get(|| async { "ok" }))
        .route("/api/matters", get(api_matters))
        .route("/api/categories", get(api_categories))
        .with_state(state)
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        )
}

pub async fn serve(settings: Settings, client: reqwest::Client) -> Result<()> {
    let addr = format!("{}:{}", settings.host, settings.port);
    info!(
        sources = settings.sources.len(),
        base = %settings.base_url,
        "legis_scraper API starting on {addr}"
    );

    let app = router(Arc::new(AppState { settings, client }));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Recomputed per request; freshness is delegated to shared caches.
async fn load(state: &AppState) -> Result<Vec<LegislativeMatter>, PipelineError> {
    pipeline::run(&state.client, &state.settings, ProgressBar::hidden()).await
}

fn cached_json<T: serde::Serialize>(state: &AppState, body: T) -> Response {
    let cache = HeaderValue::from_str(&state.settings.cache_control())
        .unwrap_or_else(|_| HeaderValue::from_static("no-store"));
    ([(header::CACHE_CONTROL, cache)], Json(body)).into_response()
}

async fn api_matters(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MattersQuery>,
) -> Result<Response, ApiError> {
    let view_state = params.to_view_state().map_err(ApiError::BadQuery)?;
    let matters = load(&state).await?;

    if params.is_empty() {
        return Ok(cached_json(&state, &matters));
    }
    let view = query::view(&matters, &view_state);
    Ok(cached_json(&state, &view))
}

async fn api_categories(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let matters = load(&state).await?;
    Ok(cached_json(&state, query::category_counts(&matters)))
}

// ── Tests ──
