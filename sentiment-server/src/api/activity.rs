//! Owner history endpoint

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use futures::{StreamExt, TryStreamExt};
use sentiment_common::db::{users, ActivityRecord};
use sentiment_common::Sentiment;
use serde::{Deserialize, Serialize};

use crate::pagination::calculate_pagination;
use crate::{ApiResult, AppState};

/// `?page=` query parameter
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: Option<i64>,
}

/// One history entry
#[derive(Debug, Serialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub text: String,
    pub text_preview: String,
    pub sentiment: Sentiment,
    pub emoji: &'static str,
    pub created_at: DateTime<Utc>,
}

impl From<ActivityRecord> for HistoryEntry {
    fn from(record: ActivityRecord) -> Self {
        Self {
            id: record.id,
            text_preview: record.short_text(),
            sentiment: record.result,
            emoji: record.result.emoji(),
            created_at: record.created_at,
            text: record.text,
        }
    }
}

/// One page of an owner's history, newest first
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub username: String,
    pub total_records: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub entries: Vec<HistoryEntry>,
}

/// GET /api/users/:username/activity?page=N
pub async fn user_activity(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<HistoryResponse>> {
    let owner = users::get_by_username(&state.db, &username).await?;

    let total = state.activity.count_for(owner.id).await?;
    let page = calculate_pagination(total, query.page.unwrap_or(1), state.history_page_size);

    let entries: Vec<HistoryEntry> = state
        .activity
        .list_for(owner.id)
        .skip(page.offset as usize)
        .take(page.page_size as usize)
        .map_ok(HistoryEntry::from)
        .try_collect()
        .await?;

    Ok(Json(HistoryResponse {
        username: owner.username,
        total_records: total,
        page: page.page,
        page_size: page.page_size,
        total_pages: page.total_pages,
        entries,
    }))
}
