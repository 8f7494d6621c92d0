//! Request signing middleware
//!
//! GET, HEAD and DELETE requests carry `timestamp` and `hash` in the query
//! string and sign the method and path along with the timestamp; every other
//! method carries them in the JSON body, which is hashed as a whole.

use axum::{
    body::Body,
    extract::{Query, Request, State},
    http::{Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use sentiment_common::api::auth::{validate_hash, validate_timestamp, ApiAuthError};
use sentiment_common::api::types::{AuthQuery, ErrorDetail, ErrorResponse};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::AppState;

/// Largest request body read for hash validation
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Deserialize)]
struct AuthFields {
    timestamp: i64,
    hash: String,
}

/// Authentication middleware
///
/// Applied to the `/api` routes only. Responds 401 on a stale timestamp or
/// wrong hash and 400 when the signing fields are missing or unreadable.
pub async fn auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    // A secret of 0 disables checking
    if state.shared_secret == 0 {
        return Ok(next.run(request).await);
    }

    let signed_in_query = matches!(
        *request.method(),
        Method::GET | Method::HEAD | Method::DELETE
    );

    if signed_in_query {
        let Query(auth) = Query::<AuthQuery>::try_from_uri(request.uri())
            .map_err(|e| AuthError::MissingFields(e.body_text()))?;

        let signed = auth.signed_value(request.method().as_str(), request.uri().path());
        check(auth.timestamp, &auth.hash, &signed, state.shared_secret)?;
        return Ok(next.run(request).await);
    }

    let (parts, body) = request.into_parts();
    let body_bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|e| AuthError::ParseError(format!("Failed to read body: {}", e)))?;

    let json_value: Value = serde_json::from_slice(&body_bytes)
        .map_err(|e| AuthError::ParseError(format!("Invalid JSON: {}", e)))?;

    let fields: AuthFields = serde_json::from_value(json_value.clone())
        .map_err(|e| AuthError::MissingFields(e.to_string()))?;

    check(fields.timestamp, &fields.hash, &json_value, state.shared_secret)?;

    // Handlers read the body again
    let request = Request::from_parts(parts, Body::from(body_bytes));
    Ok(next.run(request).await)
}

fn check(timestamp: i64, hash: &str, signed: &Value, secret: i64) -> Result<(), AuthError> {
    validate_timestamp(timestamp).map_err(|e| match e {
        ApiAuthError::InvalidTimestamp { reason, .. } => AuthError::InvalidTimestamp(reason),
        other => AuthError::Other(other.to_string()),
    })?;

    validate_hash(hash, signed, secret).map_err(|e| match e {
        ApiAuthError::InvalidHash {
            provided,
            calculated,
        } => {
            warn!(
                "Hash validation failed: provided={}, calculated={}",
                provided, calculated
            );
            AuthError::InvalidHash
        }
        other => AuthError::Other(other.to_string()),
    })
}

/// Authentication failures as HTTP responses
#[derive(Debug)]
pub enum AuthError {
    InvalidTimestamp(String),
    InvalidHash,
    MissingFields(String),
    ParseError(String),
    Other(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AuthError::InvalidTimestamp(reason) => (
                StatusCode::UNAUTHORIZED,
                "INVALID_TIMESTAMP",
                format!("Invalid timestamp: {}", reason),
            ),
            AuthError::InvalidHash => (
                StatusCode::UNAUTHORIZED,
                "INVALID_HASH",
                "Invalid hash".to_string(),
            ),
            AuthError::MissingFields(msg) => (
                StatusCode::BAD_REQUEST,
                "MISSING_AUTH_FIELDS",
                format!("Missing required fields: {}", msg),
            ),
            AuthError::ParseError(msg) => (
                StatusCode::BAD_REQUEST,
                "PARSE_ERROR",
                format!("Parse error: {}", msg),
            ),
            AuthError::Other(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "AUTH_ERROR",
                format!("Authentication error: {}", msg),
            ),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                fields: Vec::new(),
            },
        };

        (status, Json(body)).into_response()
    }
}
