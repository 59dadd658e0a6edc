use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{BusinessId, BusinessRecord};
use super::repository::{
    BusinessRepository, BusinessSummaryView, RepositoryError, VerificationNotifier,
};
use super::service::{BusinessCompletionService, BusinessServiceError};

/// Router exposing completion scoring and the business registry.
pub fn business_router<R, N>(service: Arc<BusinessCompletionService<R, N>>) -> Router
where
    R: BusinessRepository + 'static,
    N: VerificationNotifier + 'static,
{
    Router::new()
        .route("/api/v1/completion", post(assess_handler::<R, N>))
        .route("/api/v1/businesses", post(register_handler::<R, N>))
        .route(
            "/api/v1/businesses/:business_id",
            get(summary_handler::<R, N>),
        )
        .route(
            "/api/v1/businesses/:business_id/completion",
            post(score_handler::<R, N>),
        )
        .route(
            "/api/v1/verification-queue",
            get(verification_queue_handler::<R, N>),
        )
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct QueueParams {
    pub(crate) limit: Option<usize>,
}

pub(crate) async fn assess_handler<R, N>(
    State(service): State<Arc<BusinessCompletionService<R, N>>>,
    Json(business): Json<BusinessRecord>,
) -> Response
where
    R: BusinessRepository + 'static,
    N: VerificationNotifier + 'static,
{
    let report = service.assess(&business);
    (StatusCode::OK, Json(report)).into_response()
}

pub(crate) async fn register_handler<R, N>(
    State(service): State<Arc<BusinessCompletionService<R, N>>>,
    Json(business): Json<BusinessRecord>,
) -> Response
where
    R: BusinessRepository + 'static,
    N: VerificationNotifier + 'static,
{
    match service.register(business) {
        Ok(entry) => (StatusCode::ACCEPTED, Json(entry.summary_view())).into_response(),
        Err(BusinessServiceError::Repository(RepositoryError::Conflict)) => {
            error_response(StatusCode::CONFLICT, "business already exists")
        }
        Err(other) => error_response(StatusCode::INTERNAL_SERVER_ERROR, &other.to_string()),
    }
}

pub(crate) async fn summary_handler<R, N>(
    State(service): State<Arc<BusinessCompletionService<R, N>>>,
    Path(business_id): Path<String>,
) -> Response
where
    R: BusinessRepository + 'static,
    N: VerificationNotifier + 'static,
{
    let id = BusinessId(business_id);
    match service.get(&id) {
        Ok(entry) => (StatusCode::OK, Json(entry.summary_view())).into_response(),
        Err(err) => service_error_response(&id, err),
    }
}

pub(crate) async fn score_handler<R, N>(
    State(service): State<Arc<BusinessCompletionService<R, N>>>,
    Path(business_id): Path<String>,
) -> Response
where
    R: BusinessRepository + 'static,
    N: VerificationNotifier + 'static,
{
    let id = BusinessId(business_id);
    match service.score(&id) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(err) => service_error_response(&id, err),
    }
}

pub(crate) async fn verification_queue_handler<R, N>(
    State(service): State<Arc<BusinessCompletionService<R, N>>>,
    Query(params): Query<QueueParams>,
) -> Response
where
    R: BusinessRepository + 'static,
    N: VerificationNotifier + 'static,
{
    match service.verification_queue(params.limit) {
        Ok(entries) => {
            let views: Vec<BusinessSummaryView> =
                entries.iter().map(|entry| entry.summary_view()).collect();
            (StatusCode::OK, Json(views)).into_response()
        }
        Err(other) => error_response(StatusCode::INTERNAL_SERVER_ERROR, &other.to_string()),
    }
}

fn service_error_response(id: &BusinessId, err: BusinessServiceError) -> Response {
    match err {
        BusinessServiceError::Repository(RepositoryError::NotFound) => {
            let payload = json!({
                "business_id": id.0,
                "error": "business not found",
            });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        other => error_response(StatusCode::INTERNAL_SERVER_ERROR, &other.to_string()),
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
