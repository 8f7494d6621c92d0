//! API error type
//!
//! Every error response has the shape
//! `{"error": {"code": ..., "message": ..., "fields": [...]}}`. Server-side
//! failures report a generic message and log the detail.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use sentiment_common::api::types::{ErrorDetail, ErrorResponse};
use sentiment_common::validation::ValidationErrors;
use sentiment_common::SentimentVerdict;
use thiserror::Error;
use tracing::{error, warn};

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Form validation failed (400)
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Malformed request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Text was classified but the activity record could not be written.
    /// The verdict is still returned alongside the error.
    #[error("Activity could not be logged: {source}")]
    LogFailed {
        verdict: SentimentVerdict,
        source: sentiment_common::Error,
    },

    /// sentiment-common error
    #[error(transparent)]
    Common(#[from] sentiment_common::Error),
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

fn detail(code: &str, message: impl Into<String>) -> ErrorDetail {
    ErrorDetail {
        code: code.to_string(),
        message: message.into(),
        fields: Vec::new(),
    }
}

/// Status and payload for a sentiment-common error
fn common_error_detail(err: &sentiment_common::Error) -> (StatusCode, ErrorDetail) {
    use sentiment_common::Error;

    match err {
        Error::InvalidInput(msg) => (StatusCode::BAD_REQUEST, detail("INVALID_INPUT", msg.clone())),
        Error::NotFound(msg) => (StatusCode::NOT_FOUND, detail("NOT_FOUND", msg.clone())),
        Error::Conflict(msg) => (StatusCode::CONFLICT, detail("CONFLICT", msg.clone())),
        Error::StorageFailure(e) => {
            error!("Storage failure: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                detail("STORAGE_FAILURE", "The request could not be completed. Please try again later."),
            )
        }
        Error::ScoringUnavailable(msg) => {
            error!("Scoring unavailable: {}", msg);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                detail("SCORING_UNAVAILABLE", "Sentiment analysis is temporarily unavailable."),
            )
        }
        other => {
            error!("Internal error: {}", other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                detail("INTERNAL_ERROR", "The request could not be completed."),
            )
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => {
                warn!("Rejected request: {}", errors);
                let message = errors
                    .errors()
                    .first()
                    .map(|e| e.message.clone())
                    .unwrap_or_else(|| "Invalid input".to_string());
                let body = ErrorResponse {
                    error: ErrorDetail {
                        code: "INVALID_INPUT".to_string(),
                        message,
                        fields: errors.errors().to_vec(),
                    },
                };
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            ApiError::BadRequest(msg) => {
                warn!("Bad request: {}", msg);
                let body = ErrorResponse {
                    error: detail("BAD_REQUEST", msg),
                };
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            ApiError::LogFailed { verdict, source } => {
                let (status, detail) = common_error_detail(&source);
                let body = json!({
                    "error": detail,
                    "verdict": verdict,
                });
                (status, Json(body)).into_response()
            }
            ApiError::Common(err) => {
                let (status, detail) = common_error_detail(&err);
                (status, Json(ErrorResponse { error: detail })).into_response()
            }
        }
    }
}
