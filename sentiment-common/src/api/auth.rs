//! API request signing via timestamp and hash
//!
//! Callers in front of the service (the login/session front end) sign each
//! request with a secret shared through the `settings` table:
//!
//! - Every request carries `timestamp` (Unix epoch ms) and `hash` (SHA-256,
//!   64 hex chars).
//! - The timestamp must be at most 1000 ms old and at most 1 ms in the future.
//! - The hash covers the canonical JSON of the request (sorted keys, no
//!   whitespace, `hash` replaced by 64 zeros) followed by the secret.
//!   Query-string signatures also cover the HTTP method and path.
//! - A secret of `0` disables checking.
//!
//! Framework-agnostic: the axum middleware lives in the server crate.

use rand::Rng;
use serde_json::Value;
use sha2::{Digest, Sha256};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::info;

use crate::db::settings;

/// Settings key holding the shared secret
pub const SHARED_SECRET_KEY: &str = "api_shared_secret";

/// Placeholder substituted for the hash field before hashing
pub const DUMMY_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

/// Maximum age of a request timestamp
pub const MAX_PAST_MS: i64 = 1000;

/// Maximum clock skew into the future
pub const MAX_FUTURE_MS: i64 = 1;

/// Authentication failures
#[derive(Debug, Clone, Error)]
pub enum ApiAuthError {
    #[error("Invalid timestamp: {reason}")]
    InvalidTimestamp {
        timestamp: i64,
        now: i64,
        reason: String,
    },

    #[error("Invalid hash")]
    InvalidHash { provided: String, calculated: String },

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Load the shared secret, generating and storing one on first use
pub async fn load_shared_secret(db: &SqlitePool) -> Result<i64, ApiAuthError> {
    let stored = settings::get_setting(db, SHARED_SECRET_KEY)
        .await
        .map_err(|e| ApiAuthError::DatabaseError(e.to_string()))?;

    match stored {
        Some(value) => value
            .trim()
            .parse::<i64>()
            .map_err(|e| ApiAuthError::DatabaseError(format!("Invalid shared secret: {}", e))),
        None => initialize_shared_secret(db).await,
    }
}

/// Generate a random non-zero secret and store it
pub async fn initialize_shared_secret(db: &SqlitePool) -> Result<i64, ApiAuthError> {
    let secret: i64 = {
        let mut rng = rand::thread_rng();
        loop {
            let candidate = rng.gen::<i64>();
            if candidate != 0 {
                break candidate;
            }
        }
    };

    settings::set_setting(db, SHARED_SECRET_KEY, &secret.to_string())
        .await
        .map_err(|e| ApiAuthError::DatabaseError(e.to_string()))?;

    info!("Generated new API shared secret");
    Ok(secret)
}

/// Current time in Unix epoch milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Check `timestamp` against the current clock
///
/// # Examples
///
/// ```
/// use sentiment_common::api::auth::{now_millis, validate_timestamp};
///
/// let now = now_millis();
/// assert!(validate_timestamp(now).is_ok());
/// assert!(validate_timestamp(now - 500).is_ok());
/// assert!(validate_timestamp(now - 2000).is_err());
/// ```
pub fn validate_timestamp(timestamp: i64) -> Result<(), ApiAuthError> {
    validate_timestamp_at(timestamp, now_millis())
}

/// [`validate_timestamp`] against an explicit clock reading
pub fn validate_timestamp_at(timestamp: i64, now: i64) -> Result<(), ApiAuthError> {
    let Some(age) = now.checked_sub(timestamp) else {
        return Err(ApiAuthError::InvalidTimestamp {
            timestamp,
            now,
            reason: format!("Timestamp {} out of range", timestamp),
        });
    };

    if age > MAX_PAST_MS {
        return Err(ApiAuthError::InvalidTimestamp {
            timestamp,
            now,
            reason: format!("Timestamp {}ms too old (max {}ms past)", age, MAX_PAST_MS),
        });
    }

    if age < -MAX_FUTURE_MS {
        return Err(ApiAuthError::InvalidTimestamp {
            timestamp,
            now,
            reason: format!(
                "Timestamp {}ms in future (max {}ms future)",
                age.saturating_neg(),
                MAX_FUTURE_MS
            ),
        });
    }

    Ok(())
}

/// Hash of `json_value` under `shared_secret`
///
/// # Examples
///
/// ```
/// use sentiment_common::api::auth::calculate_hash;
/// use serde_json::json;
///
/// let body = json!({"owner": "alice", "text": "hi", "timestamp": 1730000000000i64, "hash": ""});
/// assert_eq!(calculate_hash(&body, 42).len(), 64);
/// ```
pub fn calculate_hash(json_value: &Value, shared_secret: i64) -> String {
    let mut value = json_value.clone();
    if let Some(obj) = value.as_object_mut() {
        obj.insert("hash".to_string(), Value::String(DUMMY_HASH.to_string()));
    }

    let mut hasher = Sha256::new();
    hasher.update(to_canonical_json(&value).as_bytes());
    hasher.update(shared_secret.to_string().as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Compact JSON with object keys sorted at every level
pub fn to_canonical_json(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by_key(|(k, _)| *k);
            let items: Vec<String> = entries
                .into_iter()
                .map(|(k, v)| format!("{}:{}", Value::String(k.clone()), to_canonical_json(v)))
                .collect();
            format!("{{{}}}", items.join(","))
        }
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(to_canonical_json).collect();
            format!("[{}]", items.join(","))
        }
        // serde_json escapes scalars correctly
        other => other.to_string(),
    }
}

/// Check a provided hash against the request
pub fn validate_hash(provided: &str, json_value: &Value, shared_secret: i64) -> Result<(), ApiAuthError> {
    let calculated = calculate_hash(json_value, shared_secret);
    if provided.eq_ignore_ascii_case(&calculated) {
        Ok(())
    } else {
        Err(ApiAuthError::InvalidHash {
            provided: provided.to_string(),
            calculated,
        })
    }
}
