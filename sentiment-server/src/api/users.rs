//! User identity endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use sentiment_common::api::types::CreateUserRequest;
use sentiment_common::db::{users, User};
use sentiment_common::validation::validate_username;

use crate::{ApiError, ApiResult, AppState};

/// POST /api/users
///
/// Registers a username. 400 with field errors when invalid, 409 when taken.
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let username = validate_username(&request.username)?;

    let user = users::create_user(&state.db, &username).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/users/:username
pub async fn get_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<Json<User>> {
    let user = users::get_by_username(&state.db, &username).await?;
    Ok(Json(user))
}

/// DELETE /api/users/:username
///
/// Removes the user together with every activity record they own.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<StatusCode> {
    users::delete_user(&state.db, &username).await?;
    Ok(StatusCode::NO_CONTENT)
}
