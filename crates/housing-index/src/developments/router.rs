use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde_json::json;
use tracing::error;

use super::domain::DevelopmentId;
use super::selection::{SelectionSignals, SelectionStore, SessionId};
use super::service::{DevelopmentMapService, DevelopmentServiceError};

pub fn development_router<S>(service: Arc<DevelopmentMapService<S>>) -> Router
where
    S: SelectionStore + 'static,
{
    Router::new()
        .route("/api/v1/developments", get(overview_handler::<S>))
        .route("/api/v1/map", get(map_handler::<S>))
        .route("/api/v1/catalog/reload", post(reload_handler::<S>))
        .route("/api/v1/developments/:development_id", get(detail_handler::<S>))
        .route(
            "/api/v1/sessions/:session_id/selection",
            post(select_handler::<S>).delete(end_session_handler::<S>),
        )
        .with_state(service)
}

pub(crate) async fn overview_handler<S>(
    State(service): State<Arc<DevelopmentMapService<S>>>,
) -> Response
where
    S: SelectionStore + 'static,
{
    (StatusCode::OK, axum::Json(service.overview())).into_response()
}

pub(crate) async fn map_handler<S>(State(service): State<Arc<DevelopmentMapService<S>>>) -> Response
where
    S: SelectionStore + 'static,
{
    (StatusCode::OK, axum::Json(service.geojson())).into_response()
}

pub(crate) async fn detail_handler<S>(
    State(service): State<Arc<DevelopmentMapService<S>>>,
    Path(development_id): Path<String>,
) -> Response
where
    S: SelectionStore + 'static,
{
    match service.detail(&DevelopmentId(development_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn select_handler<S>(
    State(service): State<Arc<DevelopmentMapService<S>>>,
    Path(session_id): Path<String>,
    axum::Json(signals): axum::Json<SelectionSignals>,
) -> Response
where
    S: SelectionStore + 'static,
{
    match service.select(&SessionId(session_id), signals) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn end_session_handler<S>(
    State(service): State<Arc<DevelopmentMapService<S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SelectionStore + 'static,
{
    match service.end_session(&SessionId(session_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

/// Re-ingests the configured source off the async workers.
pub(crate) async fn reload_handler<S>(State(service): State<Arc<DevelopmentMapService<S>>>) -> Response
where
    S: SelectionStore + 'static,
{
    match tokio::task::spawn_blocking(move || service.reload()).await {
        Ok(Ok(summary)) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Ok(Err(error)) => {
            error!(error = %error, "development catalog reload failed");
            error_response(error)
        }
        Err(join_error) => {
            error!(error = %join_error, "development catalog reload task aborted");
            let payload = json!({
                "error": "reload task aborted",
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

fn error_response(error: DevelopmentServiceError) -> Response {
    let status = match &error {
        DevelopmentServiceError::UnknownDevelopment(_) => StatusCode::NOT_FOUND,
        // Imports only read the server's configured source.
        DevelopmentServiceError::Import(_) | DevelopmentServiceError::Store(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
