//! sentiment-server library
//!
//! HTTP surface for the sentiment analyzer: classify text, log each
//! classification against its owner, and expose history and an admin
//! listing.

use std::sync::Arc;

use axum::Router;
use sentiment_common::db::{ActivityLog, SqliteActivityLog};
use sentiment_common::Classifier;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;
pub mod pagination;

pub use error::{ApiError, ApiResult};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Shared secret for API authentication (0 disables checking)
    pub shared_secret: i64,
    /// Stateless text classifier
    pub classifier: Classifier,
    /// Activity log the analyze endpoint writes to
    pub activity: Arc<dyn ActivityLog>,
    /// Records per page of owner history
    pub history_page_size: i64,
    /// Records per page of the admin listing
    pub admin_page_size: i64,
}

impl AppState {
    /// Create application state with the bundled classifier and the SQLite
    /// activity log
    pub fn new(db: SqlitePool, shared_secret: i64) -> Self {
        let activity = Arc::new(SqliteActivityLog::new(db.clone()));
        Self {
            db,
            shared_secret,
            classifier: Classifier::default(),
            activity,
            history_page_size: pagination::DEFAULT_PAGE_SIZE,
            admin_page_size: pagination::DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_activity_log(mut self, activity: Arc<dyn ActivityLog>) -> Self {
        self.activity = activity;
        self
    }

    pub fn with_page_sizes(mut self, history: i64, admin: i64) -> Self {
        self.history_page_size = history;
        self.admin_page_size = admin;
        self
    }
}

/// Build application router
///
/// `/health` is public; everything under `/api` passes the auth middleware.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{get, post};

    // Protected routes (require authentication)
    let protected = Router::new()
        .route("/api/buildinfo", get(api::get_build_info))
        .route("/api/analyze", post(api::analyze))
        .route("/api/users", post(api::create_user))
        .route(
            "/api/users/:username",
            get(api::get_user).delete(api::delete_user),
        )
        .route("/api/users/:username/activity", get(api::user_activity))
        .route("/api/admin/activity", get(api::admin_activity))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::auth_middleware,
        ));

    Router::new()
        .merge(protected)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
