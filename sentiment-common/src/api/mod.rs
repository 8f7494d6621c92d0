//! API module for shared HTTP API functionality
//!
//! Contains only pure functions, database operations and shared types; the
//! server crate wraps these in axum extractors and middleware.

pub mod auth;
pub mod types;

pub use auth::{
    calculate_hash, initialize_shared_secret, load_shared_secret, validate_hash,
    validate_timestamp, ApiAuthError,
};
pub use types::{AnalyzeRequest, AuthQuery, CreateUserRequest, ErrorDetail, ErrorResponse};
