use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ApplicationRecord, ScoreRequest};
use super::intake::IntakeViolation;
use super::service::ApplicationReviewService;

/// Batch payload accepted by `/api/analysis/batch`.
#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    #[serde(default)]
    pub applications: Vec<ApplicationRecord>,
}

/// Router builder exposing the analysis endpoints.
pub fn review_router(service: Arc<ApplicationReviewService>) -> Router {
    Router::new()
        .route("/api/analysis/application", post(analyze_handler))
        .route("/api/analysis/batch", post(batch_handler))
        .route("/api/analysis/score", post(score_handler))
        .with_state(service)
}

pub(crate) async fn analyze_handler(
    State(service): State<Arc<ApplicationReviewService>>,
    axum::Json(record): axum::Json<ApplicationRecord>,
) -> Response {
    match service.analyze(&record).await {
        Ok(analysis) => (StatusCode::OK, axum::Json(analysis)).into_response(),
        Err(violation) => intake_rejection(violation),
    }
}

pub(crate) async fn batch_handler(
    State(service): State<Arc<ApplicationReviewService>>,
    axum::Json(request): axum::Json<BatchRequest>,
) -> Response {
    match service.analyze_batch(&request.applications).await {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(violation) => intake_rejection(violation),
    }
}

pub(crate) async fn score_handler(
    State(service): State<Arc<ApplicationReviewService>>,
    axum::Json(request): axum::Json<ScoreRequest>,
) -> Response {
    match service.score(&request) {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(violation) => intake_rejection(violation),
    }
}

fn intake_rejection(violation: IntakeViolation) -> Response {
    let payload = json!({
        "error": violation.to_string(),
    });
    (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
}
