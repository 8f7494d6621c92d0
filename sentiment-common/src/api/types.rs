//! Shared API request/response types

use serde::{Deserialize, Serialize};

use crate::validation::FieldError;

/// Authentication parameters for GET/DELETE requests (query string)
///
/// The hash covers `{"hash": <zeros>, "method": <METHOD>, "path": <path>,
/// "timestamp": <timestamp>}`, so a signature is only valid for the request
/// it was made for.
///
/// # Examples
///
/// ```
/// use sentiment_common::api::types::AuthQuery;
///
/// let query = AuthQuery {
///     timestamp: 1730000000000,
///     hash: "abc123...".to_string(),
/// };
/// let signed = query.signed_value("DELETE", "/api/users/alice");
/// assert_eq!(signed["timestamp"], 1730000000000i64);
/// assert_eq!(signed["method"], "DELETE");
/// assert_eq!(signed["path"], "/api/users/alice");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthQuery {
    /// Unix epoch time in milliseconds
    pub timestamp: i64,

    /// SHA-256 hash (64 hex chars)
    pub hash: String,
}

impl AuthQuery {
    /// JSON value the hash is computed over
    ///
    /// `path` excludes the query string.
    pub fn signed_value(&self, method: &str, path: &str) -> serde_json::Value {
        serde_json::json!({
            "timestamp": self.timestamp,
            "hash": self.hash,
            "method": method,
            "path": path,
        })
    }
}

/// POST /api/analyze body
///
/// Signed requests also carry `timestamp` and `hash`; they are checked by the
/// middleware and ignored here.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalyzeRequest {
    /// Username the activity is attributed to
    pub owner: String,

    /// Text to classify
    #[serde(default)]
    pub text: String,
}

/// POST /api/users body
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub username: String,
}

/// Error payload inside every error response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldError>,
}

/// `{"error": {...}}`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}
