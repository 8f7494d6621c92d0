//! HTTP API handlers for sentiment-server

pub mod activity;
pub mod admin;
pub mod analyze;
pub mod auth;
pub mod buildinfo;
pub mod health;
pub mod users;

pub use activity::user_activity;
pub use admin::admin_activity;
pub use analyze::analyze;
pub use auth::auth_middleware;
pub use buildinfo::get_build_info;
pub use health::health_routes;
pub use users::{create_user, delete_user, get_user};
