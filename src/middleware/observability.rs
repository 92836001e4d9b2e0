//! Request / error taps.
//!
//! Responsibility:
//! - Log every inbound request (method, path, timestamp).
//! - Log every failure that reached the wire, with the request it belongs to.
//!   `AppError::into_response` leaves a `FailureRecord` in the response
//!   extensions; the tap reads it back here.
//! - Turn a panicking handler into an `Internal` failure instead of a dropped
//!   connection.
//!
//! The taps only emit tracing events and cannot fail.

use std::any::Any;

use axum::{
    Router,
    body::Body,
    http::{Method, Request},
    middleware::{self, Next},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use tower_http::catch_panic::CatchPanicLayer;

use crate::error::{AppError, FailureRecord};

/// Apply the taps and the panic catcher. The taps wrap the catcher so that
/// panics are logged like any other failure.
pub fn apply(router: Router) -> Router {
    router
        .layer(CatchPanicLayer::custom(panic_to_response))
        .layer(middleware::from_fn(observe))
}

async fn observe(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    log_request(&method, &path, Utc::now());

    let response = next.run(req).await;

    if let Some(record) = response.extensions().get::<FailureRecord>() {
        log_error(record, &method, &path);
    }
    response
}

pub fn log_request(method: &Method, path: &str, at: DateTime<Utc>) {
    tracing::info!(%method, path, at = %at.to_rfc3339(), "request");
}

pub fn log_error(record: &FailureRecord, method: &Method, path: &str) {
    let status = record.kind.status().as_u16();
    let cause = record.cause.as_deref().unwrap_or("");

    if record.kind.status().is_server_error() {
        tracing::error!(
            %method, path, status, kind = ?record.kind, cause, message = %record.message,
            "request failed"
        );
    } else {
        tracing::warn!(
            %method, path, status, kind = ?record.kind, message = %record.message,
            "request rejected"
        );
    }
}

fn panic_to_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic payload".to_string()
    };

    AppError::internal(anyhow::anyhow!("handler panicked: {detail}")).into_response()
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, routing::get};
    use tower::ServiceExt;

    use super::*;
    use crate::error::{ErrorKind, INTERNAL_MESSAGE};

    async fn boom() -> &'static str {
        panic!("store exploded at 0xdeadbeef");
    }

    #[tokio::test]
    async fn panicking_handler_becomes_internal_with_generic_body() {
        let app = apply(Router::new().route("/boom", get(boom)));

        let response = app
            .oneshot(Request::builder().uri("/boom").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let record = response.extensions().get::<FailureRecord>().cloned().unwrap();
        assert_eq!(record.kind, ErrorKind::Internal);
        assert!(record.cause.unwrap().contains("store exploded"));

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, serde_json::json!({ "message": INTERNAL_MESSAGE }));
    }

    #[tokio::test]
    async fn successful_responses_pass_through_untouched() {
        let app = apply(Router::new().route("/ok", get(|| async { "ok" })));

        let response = app
            .oneshot(Request::builder().uri("/ok").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.extensions().get::<FailureRecord>().is_none());
    }
}
