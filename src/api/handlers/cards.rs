/*
 * Responsibility
 * - /cards 系 handler (すべて保護ルート)
 * - 削除は所有者のみ (他人のカードは 403)
 * - like は set (二重 like しても 1 件)
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::{
        dto::{
            MessageResponse,
            cards::{CardList, CardResponse, CreateCardRequest},
        },
        extractors::{AuthCtxExtractor, CardId, ValidatedJson},
    },
    error::AppError,
    repos::error::RepoError,
    state::AppState,
};

fn card_not_found() -> AppError {
    AppError::NotFound("Card not found".to_string())
}

pub async fn list_cards(State(state): State<AppState>) -> Result<Json<CardList>, AppError> {
    let rows = state.cards.list().await?;
    Ok(Json(CardList {
        data: rows.into_iter().map(CardResponse::from).collect(),
    }))
}

pub async fn create_card(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    ValidatedJson(req): ValidatedJson<CreateCardRequest>,
) -> Result<(StatusCode, Json<CardResponse>), AppError> {
    let row = state
        .cards
        .create(&req.name, &req.link, ctx.user_id)
        .await
        .map_err(|e| match e {
            // token は有効だが user 行が消えている
            RepoError::MissingReference => AppError::NotFound("User not found".to_string()),
            other => other.into(),
        })?;

    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn delete_card(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    card_id: CardId,
) -> Result<Json<MessageResponse>, AppError> {
    let card = state
        .cards
        .get(card_id.id)
        .await?
        .ok_or_else(card_not_found)?;

    if card.owner != ctx.user_id {
        return Err(AppError::Forbidden(
            "You cannot delete another user's card".to_string(),
        ));
    }

    // 直前に get しているが、並行削除されていれば 404
    if !state.cards.delete(card.id).await? {
        return Err(card_not_found());
    }

    Ok(Json(MessageResponse {
        message: "Card deleted",
    }))
}

pub async fn like_card(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    card_id: CardId,
) -> Result<Json<CardResponse>, AppError> {
    let row = state
        .cards
        .add_like(card_id.id, ctx.user_id)
        .await?
        .ok_or_else(card_not_found)?;

    Ok(Json(row.into()))
}

pub async fn unlike_card(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    card_id: CardId,
) -> Result<Json<CardResponse>, AppError> {
    let row = state
        .cards
        .remove_like(card_id.id, ctx.user_id)
        .await?
        .ok_or_else(card_not_found)?;

    Ok(Json(row.into()))
}
