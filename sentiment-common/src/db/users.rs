//! User identities
//!
//! Activity records belong to a user. Authentication itself is handled in
//! front of this service; this table only gives each username a stable id.
//! Deleting a user cascades to their activity records.

use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use super::models::{User, UserRow};
use crate::time;
use crate::{Error, Result};

/// Register a new username
///
/// Returns [`Error::Conflict`] if the username is taken. The caller is
/// expected to have validated the username already.
pub async fn create_user(pool: &SqlitePool, username: &str) -> Result<User> {
    let user = User {
        id: Uuid::new_v4(),
        username: username.to_string(),
        created_at: time::now(),
    };

    let inserted = sqlx::query("INSERT INTO users (guid, username, created_at_us) VALUES (?, ?, ?)")
        .bind(user.id.to_string())
        .bind(&user.username)
        .bind(time::to_micros(&user.created_at))
        .execute(pool)
        .await;

    match inserted {
        Ok(_) => {
            info!("Registered user {} ({})", user.username, user.id);
            Ok(user)
        }
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(Error::Conflict(format!(
            "Username already exists: {}",
            username
        ))),
        Err(e) => Err(e.into()),
    }
}

/// Look up a user by username
pub async fn find_by_username(pool: &SqlitePool, username: &str) -> Result<Option<User>> {
    let row = sqlx::query_as::<_, UserRow>(
        "SELECT guid, username, created_at_us FROM users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    row.map(User::try_from).transpose()
}

/// Look up a user by username, failing with [`Error::NotFound`]
pub async fn get_by_username(pool: &SqlitePool, username: &str) -> Result<User> {
    find_by_username(pool, username)
        .await?
        .ok_or_else(|| Error::NotFound(format!("User not found: {}", username)))
}

/// Delete a user and, by cascade, all of their activity records
pub async fn delete_user(pool: &SqlitePool, username: &str) -> Result<()> {
    let deleted = sqlx::query("DELETE FROM users WHERE username = ?")
        .bind(username)
        .execute(pool)
        .await?;

    if deleted.rows_affected() == 0 {
        return Err(Error::NotFound(format!("User not found: {}", username)));
    }

    info!("Deleted user {}", username);
    Ok(())
}
