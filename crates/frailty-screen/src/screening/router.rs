use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use chrono::Local;
use serde_json::json;

use super::domain::SessionId;
use super::report::{HistoryRow, ScreeningReport};
use super::service::{AssessmentRequest, ScreeningService, ScreeningServiceError};
use super::store::{HistoryStore, StoreError};

/// Router builder exposing HTTP endpoints for evaluation and session history.
pub fn screening_router<S>(service: Arc<ScreeningService<S>>) -> Router
where
    S: HistoryStore + 'static,
{
    Router::new()
        .route("/api/v1/assessments", post(evaluate_handler::<S>))
        .route("/api/v1/sessions", post(open_session_handler::<S>))
        .route(
            "/api/v1/sessions/:session_id",
            delete(close_session_handler::<S>),
        )
        .route(
            "/api/v1/sessions/:session_id/assessments",
            post(assess_handler::<S>),
        )
        .route(
            "/api/v1/sessions/:session_id/history",
            get(history_handler::<S>),
        )
        .route(
            "/api/v1/sessions/:session_id/history/export",
            get(export_handler::<S>),
        )
        .route(
            "/api/v1/sessions/:session_id/history/import",
            post(import_handler::<S>),
        )
        .with_state(service)
}

pub(crate) async fn evaluate_handler<S>(
    State(service): State<Arc<ScreeningService<S>>>,
    Json(request): Json<AssessmentRequest>,
) -> Response
where
    S: HistoryStore + 'static,
{
    match service.preview(request) {
        Ok(entry) => (StatusCode::OK, Json(ScreeningReport::from_entry(&entry))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn open_session_handler<S>(
    State(service): State<Arc<ScreeningService<S>>>,
) -> Response
where
    S: HistoryStore + 'static,
{
    match service.start_session() {
        Ok(session) => (
            StatusCode::CREATED,
            Json(json!({ "session_id": session.0 })),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn close_session_handler<S>(
    State(service): State<Arc<ScreeningService<S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: HistoryStore + 'static,
{
    match service.end_session(&SessionId(session_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn assess_handler<S>(
    State(service): State<Arc<ScreeningService<S>>>,
    Path(session_id): Path<String>,
    Json(request): Json<AssessmentRequest>,
) -> Response
where
    S: HistoryStore + 'static,
{
    match service.assess(&SessionId(session_id), request) {
        Ok(entry) => (
            StatusCode::CREATED,
            Json(ScreeningReport::from_entry(&entry)),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn history_handler<S>(
    State(service): State<Arc<ScreeningService<S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: HistoryStore + 'static,
{
    match service.history(&SessionId(session_id)) {
        Ok(entries) => {
            let rows: Vec<HistoryRow> = entries.iter().map(HistoryRow::from).collect();
            (StatusCode::OK, Json(json!({ "entries": rows }))).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn export_handler<S>(
    State(service): State<Arc<ScreeningService<S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: HistoryStore + 'static,
{
    let session = SessionId(session_id);
    match service.export(&session) {
        Ok(payload) => {
            let disposition = format!(
                "attachment; filename=\"frailty_history_{}_{}.json\"",
                session.0,
                Local::now().date_naive().format("%Y%m%d")
            );
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "application/json".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                payload,
            )
                .into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn import_handler<S>(
    State(service): State<Arc<ScreeningService<S>>>,
    Path(session_id): Path<String>,
    body: Bytes,
) -> Response
where
    S: HistoryStore + 'static,
{
    match service.import(&SessionId(session_id), &body) {
        Ok(imported) => (StatusCode::OK, Json(json!({ "imported": imported }))).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: ScreeningServiceError) -> Response {
    let status = match &error {
        ScreeningServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ScreeningServiceError::Serialization(_) => StatusCode::BAD_REQUEST,
        ScreeningServiceError::Store(StoreError::UnknownSession(_)) => StatusCode::NOT_FOUND,
        ScreeningServiceError::Store(
            StoreError::SessionExists(_)
            | StoreError::History(_)
            | StoreError::SessionLimitReached { .. },
        ) => StatusCode::CONFLICT,
        ScreeningServiceError::Store(StoreError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = match &error {
        ScreeningServiceError::Validation(validation) => json!({
            "error": error.to_string(),
            "field": validation.field(),
        }),
        _ => json!({ "error": error.to_string() }),
    };

    (status, Json(payload)).into_response()
}
