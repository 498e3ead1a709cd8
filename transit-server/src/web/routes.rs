//! HTTP route handlers.

use std::sync::Arc;

use askama::Template;
use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use chrono::Local;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::cache::{RouteKey, query_minute};
use crate::knowledge::{LoadError, Snapshot};
use crate::planner::{Planner, RouteQuery, SearchError};

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/stations", get(list_stations))
        .route("/route", post(plan_route))
        .route("/admin/reload", post(reload))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Index page with route form.
async fn index_page(State(state): State<AppState>) -> impl IntoResponse {
    let template = match state.store.snapshot().await {
        Some(snapshot) => IndexTemplate {
            loaded: true,
            stations: StationOption::all(&snapshot.base),
        },
        None => IndexTemplate {
            loaded: false,
            stations: Vec::new(),
        },
    };
    Html(
        template
            .render()
            .unwrap_or_else(|e| format!("Template error: {}", e)),
    )
}

async fn current(state: &AppState) -> Result<Snapshot, AppError> {
    state
        .store
        .snapshot()
        .await
        .ok_or(AppError::from(SearchError::NotLoaded))
}

/// List every station, sorted by id.
async fn list_stations(State(state): State<AppState>) -> Result<Json<StationsResponse>, AppError> {
    let snapshot = current(&state).await?;
    let stations = snapshot
        .base
        .stations()
        .into_iter()
        .map(StationDto::from_station)
        .collect();

    Ok(Json(StationsResponse {
        generation: snapshot.generation,
        stations,
    }))
}

/// Check if request accepts HTML.
fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

/// Plan a route between two stations.
async fn plan_route(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    // Parse JSON manually so we can log the body on failure
    let req: RouteRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, body = %String::from_utf8_lossy(&body), "invalid route request");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })?;

    let preferences = req
        .preferences()
        .map_err(|e| AppError::from(SearchError::InvalidInput(e.to_string())))?;

    let snapshot = current(&state).await?;
    let at = query_minute(req.at.unwrap_or_else(|| Local::now().naive_local()));

    let key = RouteKey::new(
        snapshot.generation,
        &req.origin,
        &req.destination,
        at,
        preferences.as_ref().unwrap_or(&Default::default()),
    );

    let result = match state.cache.get(&key).await {
        Some(hit) => hit,
        None => {
            let mut query = RouteQuery::new(req.origin.clone(), req.destination.clone()).at(at);
            query.preferences = preferences;

            // The search is CPU-bound; keep it off the async workers.
            let base = snapshot.base.clone();
            let config = state.config.clone();
            let result = tokio::task::spawn_blocking(move || {
                Planner::new(&base, &config).search(&query)
            })
            .await
            .map_err(|e| AppError::Internal {
                message: format!("search task failed: {e}"),
            })??;

            let result = Arc::new(result);
            state.cache.insert(key, result.clone()).await;
            result
        }
    };

    // Return HTML or JSON based on Accept header
    if accepts_html(&headers) {
        let template = RouteResultTemplate {
            view: RouteView::from_result(&snapshot.base, &result),
        };
        let html = template.render().map_err(|e| AppError::Internal {
            message: format!("Template error: {}", e),
        })?;

        Ok(Html(html).into_response())
    } else {
        Ok(Json(RouteResponse::from_result(
            &snapshot.base,
            &result,
            snapshot.generation,
        ))
        .into_response())
    }
}

/// Reload the data set and clear cached routes.
async fn reload(State(state): State<AppState>) -> Result<Json<ReloadResponse>, AppError> {
    let summary = state.store.reload().await?;
    state.cache.invalidate_all();
    info!(generation = summary.generation, "reloaded on request");

    let snapshot = current(&state).await?;
    Ok(Json(ReloadResponse::new(&summary, &snapshot.base)))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Unavailable { message: String },
    Internal { message: String },
}

impl From<SearchError> for AppError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::InvalidInput(msg) => AppError::BadRequest { message: msg },
            SearchError::NotLoaded => AppError::Unavailable {
                message: e.to_string(),
            },
            SearchError::Reconstruction(_) => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl From<LoadError> for AppError {
    fn from(e: LoadError) -> Self {
        AppError::Internal {
            message: format!("reload failed: {e}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::Unavailable { message } => (StatusCode::SERVICE_UNAVAILABLE, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
