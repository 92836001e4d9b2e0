//! session token 検証 → AuthCtx を extensions に入れる
//!
//! - token は TokenSources の優先順 (signed cookie → Bearer header) で取り出す
//! - 取り出せない / 検証に失敗 → 401 "Authorization required" で打ち切り (handler は走らない)
//! - store には触らない (ゲートのみ)

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::api::extractors::AuthCtx;
use crate::error::AppError;
use crate::state::AppState;

/// 保護対象の Router に認証を掛ける。
///
/// `route_layer` なので、マッチしたルートにだけ効く (未定義パスは fallback の 404 へ)。
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.route_layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let Some((source, token)) = state.token_sources.extract(req.headers()) else {
        tracing::debug!("no session token presented");
        return Err(AppError::authorization_required());
    };

    let user_id = state.tokens.verify(&token).inspect_err(|_| {
        tracing::debug!(source, "session token verification failed");
    })?;

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(AuthCtx::new(user_id));

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        Json,
        http::{StatusCode, header},
        routing::get,
    };
    use chrono::{Duration, Utc};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::api::extractors::AuthCtxExtractor;
    use crate::config::Config;
    use crate::repos::MemoryStore;
    use crate::services::auth::Passwords;
    use crate::services::auth::password::cheap_params;

    fn state() -> AppState {
        let store = Arc::new(MemoryStore::new());
        AppState::new(
            &Config::for_tests(),
            store.clone(),
            store,
            Passwords::new(cheap_params()),
        )
    }

    async fn whoami(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<Uuid> {
        Json(ctx.user_id)
    }

    fn app(state: AppState) -> Router {
        let protected = Router::new().route("/whoami", get(whoami));
        apply(protected, state.clone()).with_state(state)
    }

    async fn call(app: Router, authorization: Option<String>) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().uri("/whoami");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let response = app
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn valid_bearer_token_reaches_the_handler_with_its_identity() {
        let state = state();
        let user_id = Uuid::new_v4();
        let token = state.tokens.issue(user_id).unwrap();

        let (status, body) = call(app(state), Some(format!("Bearer {token}"))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!(user_id));
    }

    #[tokio::test]
    async fn missing_malformed_and_expired_tokens_look_identical() {
        let state = state();
        let expired = state
            .tokens
            .issue_at(Uuid::new_v4(), Utc::now() - Duration::days(8))
            .unwrap();

        let cases = [
            None,
            Some("Bearer not-a-token".to_string()),
            Some(format!("Bearer {expired}")),
        ];

        let mut bodies = Vec::new();
        for case in cases {
            let (status, body) = call(app(state.clone()), case).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            bodies.push(body);
        }

        let expected = serde_json::json!({ "message": "Authorization required" });
        assert!(bodies.iter().all(|b| *b == expected), "{bodies:?}");
    }
}
