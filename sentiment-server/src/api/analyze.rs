//! POST /api/analyze
//!
//! Classify the submitted text and append the outcome to the owner's
//! activity log.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use sentiment_common::api::types::AnalyzeRequest;
use sentiment_common::db::users;
use sentiment_common::validation::validate_analysis_text;
use sentiment_common::SentimentVerdict;
use tracing::{debug, info};

use crate::{ApiError, ApiResult, AppState};

/// Classify and log one submission
///
/// Blank text is rejected before anything is classified or written. If the
/// record cannot be stored the verdict is still returned, inside a
/// `STORAGE_FAILURE` error body.
pub async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> ApiResult<Json<SentimentVerdict>> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let text = validate_analysis_text(&request.text)?;
    let owner = users::get_by_username(&state.db, request.owner.trim()).await?;

    let verdict = state.classifier.classify(&text)?;
    debug!(
        "Classified {} chars for {}: {} ({})",
        text.chars().count(),
        owner.username,
        verdict.label,
        verdict.polarity
    );

    if let Err(source) = state.activity.record(owner.id, &text, verdict.label).await {
        return Err(ApiError::LogFailed { verdict, source });
    }

    info!("Analyzed text for {}: {}", owner.username, verdict.label);
    Ok(Json(verdict))
}
