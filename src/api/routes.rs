/*
 * Responsibility
 * - URL 構造を定義
 * - public (/signin, /signup) と protected (それ以外) を分け、protected にだけ認証を掛ける
 * - どのルートにもマッチしなければ 404 "Page not found" (認証状態に関係なく)
 */
use axum::{
    Router,
    routing::{get, patch, post, put},
};

use crate::error::{AppError, PAGE_NOT_FOUND};
use crate::middleware::auth::access;
use crate::state::AppState;

use crate::api::handlers::{
    auth::{signin, signout, signup},
    cards::{create_card, delete_card, like_card, list_cards, unlike_card},
    users::{current_user, get_user, list_users, update_avatar, update_profile},
};

pub fn routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/signin", post(signin))
        .route("/signup", post(signup));

    let protected = Router::new()
        .route("/signout", post(signout))
        .route("/users", get(list_users))
        .route("/users/me", get(current_user).patch(update_profile))
        .route("/users/me/avatar", patch(update_avatar))
        .route("/users/{user_id}", get(get_user))
        .route("/cards", get(list_cards).post(create_card))
        .route("/cards/{card_id}", axum::routing::delete(delete_card))
        .route("/cards/{card_id}/likes", put(like_card).delete(unlike_card));
    let protected = access::apply(protected, state);

    public
        .merge(protected)
        .fallback(not_found)
        .method_not_allowed_fallback(not_found)
}

pub async fn not_found() -> AppError {
    AppError::NotFound(PAGE_NOT_FOUND.to_string())
}
