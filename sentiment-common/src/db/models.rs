//! Database models

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::classifier::Sentiment;
use crate::time;
use crate::{Error, Result};

/// Characters shown by [`ActivityRecord::short_text`]
pub const TEXT_PREVIEW_CHARS: usize = 50;

/// A user identity that activity is attributed to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// One logged classification event; immutable once written
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityRecord {
    pub id: i64,
    pub owner: Uuid,
    pub text: String,
    pub result: Sentiment,
    pub created_at: DateTime<Utc>,
}

impl ActivityRecord {
    /// First 50 characters, with `...` appended when truncated
    pub fn short_text(&self) -> String {
        preview(&self.text)
    }
}

/// Admin listing row: a record plus its owner's username
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminActivityRow {
    pub id: i64,
    pub username: String,
    pub text_preview: String,
    pub sentiment: Sentiment,
    pub created_at: DateTime<Utc>,
}

/// Truncate `text` to [`TEXT_PREVIEW_CHARS`] characters
pub fn preview(text: &str) -> String {
    if text.chars().count() > TEXT_PREVIEW_CHARS {
        let head: String = text.chars().take(TEXT_PREVIEW_CHARS).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

// Raw rows as stored in SQLite

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct UserRow {
    pub guid: String,
    pub username: String,
    pub created_at_us: i64,
}

impl TryFrom<UserRow> for User {
    type Error = Error;

    fn try_from(row: UserRow) -> Result<Self> {
        Ok(User {
            id: parse_guid(&row.guid)?,
            username: row.username,
            created_at: parse_micros(row.created_at_us)?,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ActivityRow {
    pub id: i64,
    pub user_guid: String,
    pub text_input: String,
    pub sentiment_result: String,
    pub created_at_us: i64,
}

impl TryFrom<ActivityRow> for ActivityRecord {
    type Error = Error;

    fn try_from(row: ActivityRow) -> Result<Self> {
        Ok(ActivityRecord {
            id: row.id,
            owner: parse_guid(&row.user_guid)?,
            result: parse_sentiment(&row.sentiment_result)?,
            text: row.text_input,
            created_at: parse_micros(row.created_at_us)?,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct AdminActivityDbRow {
    pub id: i64,
    pub username: String,
    pub text_input: String,
    pub sentiment_result: String,
    pub created_at_us: i64,
}

impl TryFrom<AdminActivityDbRow> for AdminActivityRow {
    type Error = Error;

    fn try_from(row: AdminActivityDbRow) -> Result<Self> {
        Ok(AdminActivityRow {
            id: row.id,
            username: row.username,
            text_preview: preview(&row.text_input),
            sentiment: parse_sentiment(&row.sentiment_result)?,
            created_at: parse_micros(row.created_at_us)?,
        })
    }
}

fn parse_guid(guid: &str) -> Result<Uuid> {
    Uuid::parse_str(guid).map_err(|e| Error::Internal(format!("Corrupt guid {:?}: {}", guid, e)))
}

fn parse_sentiment(value: &str) -> Result<Sentiment> {
    value
        .parse()
        .map_err(|_| Error::Internal(format!("Corrupt sentiment value {:?}", value)))
}

fn parse_micros(micros: i64) -> Result<DateTime<Utc>> {
    time::from_micros(micros)
        .ok_or_else(|| Error::Internal(format!("Timestamp out of range: {}", micros)))
}
