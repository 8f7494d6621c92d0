//! Database models and queries

pub mod activity;
pub mod init;
pub mod models;
pub mod settings;
pub mod users;

pub use activity::{ActivityFilter, ActivityLog, SqliteActivityLog};
pub use init::*;
pub use models::*;
