/*
 * Responsibility
 * - /users 系 handler (すべて保護ルート)
 * - 自分自身の更新は AuthCtx の user_id を使う (他人は更新できない)
 */
use axum::{Json, extract::State};

use crate::{
    api::{
        dto::users::{
            UpdateAvatarRequest, UpdateProfileRequest, UserEnvelope, UserList, UserResponse,
        },
        extractors::{AuthCtxExtractor, UserId, ValidatedJson},
    },
    error::AppError,
    state::AppState,
};

fn user_not_found() -> AppError {
    AppError::NotFound("User not found".to_string())
}

pub async fn list_users(State(state): State<AppState>) -> Result<Json<UserList>, AppError> {
    let rows = state.users.list().await?;
    Ok(Json(UserList {
        data: rows.into_iter().map(UserResponse::from).collect(),
    }))
}

pub async fn current_user(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Result<Json<UserEnvelope>, AppError> {
    let row = state
        .users
        .get(ctx.user_id)
        .await?
        .ok_or_else(user_not_found)?;

    Ok(Json(UserEnvelope { user: row.into() }))
}

pub async fn get_user(
    State(state): State<AppState>,
    user_id: UserId,
) -> Result<Json<UserEnvelope>, AppError> {
    let row = state
        .users
        .get(user_id.id)
        .await?
        .ok_or_else(user_not_found)?;

    Ok(Json(UserEnvelope { user: row.into() }))
}

pub async fn update_profile(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    ValidatedJson(req): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let row = state
        .users
        .update_profile(ctx.user_id, &req.name, &req.about)
        .await?
        .ok_or_else(user_not_found)?;

    Ok(Json(row.into()))
}

pub async fn update_avatar(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    ValidatedJson(req): ValidatedJson<UpdateAvatarRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let row = state
        .users
        .update_avatar(ctx.user_id, &req.avatar)
        .await?
        .ok_or_else(user_not_found)?;

    Ok(Json(row.into()))
}
