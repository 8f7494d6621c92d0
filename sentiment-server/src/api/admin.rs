//! Admin listing across all owners

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use sentiment_common::db::{ActivityFilter, AdminActivityRow};
use sentiment_common::Sentiment;
use serde::{Deserialize, Serialize};

use crate::pagination::calculate_pagination;
use crate::{ApiError, ApiResult, AppState};

/// Admin listing query; empty strings count as absent
#[derive(Debug, Default, Deserialize)]
pub struct AdminQuery {
    pub page: Option<i64>,
    pub sentiment: Option<String>,
    pub user: Option<String>,
    pub q: Option<String>,
    /// `YYYY-MM-DD`, UTC
    pub date: Option<String>,
}

impl AdminQuery {
    /// Parse into a storage filter
    pub fn to_filter(&self) -> ApiResult<ActivityFilter> {
        let sentiment = non_empty(&self.sentiment)
            .map(|s| s.parse::<Sentiment>())
            .transpose()?;

        let date = non_empty(&self.date)
            .map(|d| {
                NaiveDate::parse_from_str(d, "%Y-%m-%d")
                    .map_err(|_| ApiError::BadRequest(format!("Invalid date (expected YYYY-MM-DD): {}", d)))
            })
            .transpose()?;

        Ok(ActivityFilter {
            sentiment,
            username: non_empty(&self.user).map(str::to_string),
            search: non_empty(&self.q).map(str::to_string),
            date,
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Debug, Serialize)]
pub struct AdminActivityResponse {
    pub total_records: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub entries: Vec<AdminActivityRow>,
}

/// GET /api/admin/activity?page&sentiment&user&q&date
pub async fn admin_activity(
    State(state): State<AppState>,
    Query(query): Query<AdminQuery>,
) -> ApiResult<Json<AdminActivityResponse>> {
    let filter = query.to_filter()?;
    let total = state.activity.count_all(&filter).await?;
    let page = calculate_pagination(total, query.page.unwrap_or(1), state.admin_page_size);
    let entries = state
        .activity
        .list_all(&filter, page.page_size, page.offset)
        .await?;

    Ok(Json(AdminActivityResponse {
        total_records: total,
        page: page.page,
        page_size: page.page_size,
        total_pages: page.total_pages,
        entries,
    }))
}
