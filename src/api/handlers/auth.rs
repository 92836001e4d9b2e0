/*
 * Responsibility
 * - POST /signin: email/password を検証して token を発行 (body + signed cookie)
 * - POST /signup: ユーザー作成 (重複 email は 409)
 * - POST /signout: cookie を消す (保護ルート)
 */
use axum::{Json, extract::State, http::StatusCode};
use axum_extra::extract::cookie::SignedCookieJar;

use crate::{
    api::{
        dto::{
            MessageResponse,
            auth::{SigninRequest, SignupRequest, SignupResponse, TokenResponse},
        },
        extractors::{AuthCtxExtractor, ValidatedJson},
    },
    error::AppError,
    services::auth::Registration,
    state::AppState,
};

pub async fn signin(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    ValidatedJson(req): ValidatedJson<SigninRequest>,
) -> Result<(SignedCookieJar, Json<TokenResponse>), AppError> {
    let user_id = state
        .credentials
        .verify_credentials(&req.email, &req.password)
        .await?;

    let token = state.tokens.issue(user_id)?;
    tracing::info!(user_id = %user_id, "signed in");

    let jar = jar.add(state.session_cookie.issue(token.clone()));
    Ok((jar, Json(TokenResponse { token })))
}

pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<SignupRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), AppError> {
    let user = state
        .credentials
        .register(Registration {
            name: req.name,
            about: req.about,
            avatar: req.avatar,
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse { user: user.into() }),
    ))
}

pub async fn signout(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    jar: SignedCookieJar,
) -> (SignedCookieJar, Json<MessageResponse>) {
    tracing::info!(user_id = %ctx.user_id, "signed out");
    (
        jar.remove(state.session_cookie.removal()),
        Json(MessageResponse {
            message: "Signed out",
        }),
    )
}
