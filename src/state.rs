/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - token codec / session cookie / token sources / repos
 * - 起動時に一度だけ組み立て、以降は read-only
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;

use crate::config::Config;
use crate::middleware::auth::token_source::TokenSources;
use crate::repos::{CardRepo, UserRepo};
use crate::services::auth::{
    CredentialService, Passwords, SessionCookie, TokenCodec, factory,
};

#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<TokenCodec>,
    pub session_cookie: Arc<SessionCookie>,
    pub token_sources: Arc<TokenSources>,
    pub credentials: Arc<CredentialService>,
    pub users: Arc<dyn UserRepo>,
    pub cards: Arc<dyn CardRepo>,
}

impl AppState {
    pub fn new(
        config: &Config,
        users: Arc<dyn UserRepo>,
        cards: Arc<dyn CardRepo>,
        passwords: Passwords,
    ) -> Self {
        let tokens = factory::build_token_codec(config);
        let session_cookie = factory::build_session_cookie(config);
        let token_sources = Arc::new(TokenSources::cookie_then_bearer(&session_cookie));
        let credentials = factory::build_credential_service(users.clone(), passwords);

        Self {
            tokens,
            session_cookie,
            token_sources,
            credentials,
            users,
            cards,
        }
    }
}

// SignedCookieJar を handler で受けるため
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.session_cookie.key().clone()
    }
}
