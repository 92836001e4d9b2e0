/// Factory: build the auth services from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::repos::UserRepo;
use crate::services::auth::{CredentialService, Passwords, SessionCookie, TokenCodec};

pub fn build_token_codec(config: &Config) -> Arc<TokenCodec> {
    Arc::new(TokenCodec::new(
        config.jwt_secret.as_bytes(),
        config.token_ttl_seconds,
    ))
}

pub fn build_session_cookie(config: &Config) -> Arc<SessionCookie> {
    Arc::new(SessionCookie::new(
        config.cookie_secret.as_bytes(),
        config.app_env.is_production(),
        config.token_ttl_seconds,
    ))
}

pub fn build_credential_service(
    users: Arc<dyn UserRepo>,
    passwords: Passwords,
) -> Arc<CredentialService> {
    Arc::new(CredentialService::new(users, passwords))
}
