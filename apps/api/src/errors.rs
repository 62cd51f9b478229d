use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::scoring::ScoringError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Scoring(#[from] ScoringError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Scoring(e) => match e {
                ScoringError::InvalidInput(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                ScoringError::RecommendationUnavailable { .. }
                | ScoringError::RankingUnavailable { .. } => {
                    tracing::error!("Scoring batch failed: {e}");
                    (StatusCode::SERVICE_UNAVAILABLE, "SCORING_UNAVAILABLE", e.to_string())
                }
                ScoringError::Cancelled => (
                    StatusCode::GATEWAY_TIMEOUT,
                    "SCORING_TIMEOUT",
                    "Scoring did not finish in time, try again".to_string(),
                ),
                ScoringError::ModelContractViolation { reason, raw } => {
                    tracing::error!("Scoring model contract violation: {reason}; raw: {raw}");
                    (
                        StatusCode::BAD_GATEWAY,
                        "SCORING_BACKEND_ERROR",
                        "The scoring model returned an invalid response".to_string(),
                    )
                }
                ScoringError::Backend(msg) => {
                    tracing::error!("Scoring backend error: {msg}");
                    (
                        StatusCode::BAD_GATEWAY,
                        "SCORING_BACKEND_ERROR",
                        "The scoring backend is unavailable".to_string(),
                    )
                }
            },
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
