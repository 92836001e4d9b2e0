//! Request-body validation gate.
//!
//! `ValidatedJson<T>` runs before the handler: the body must be JSON, must
//! deserialize into `T`, and must satisfy `T`'s `Validate` rules. The gate never
//! touches a store. Each `T` is the static schema of one route.

use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AppError;

pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        // Syntax / content-type problems first (BadRequest), shape second (ValidationFailed).
        let Json(value) = Json::<serde_json::Value>::from_request(req, state).await?;

        let payload: T = serde_json::from_value(value)
            .map_err(|e| AppError::ValidationFailed(e.to_string()))?;

        payload.validate()?;

        Ok(Self(payload))
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode, header},
        routing::post,
    };
    use serde::Deserialize;
    use tower::ServiceExt;

    use super::*;
    use crate::error::{ErrorKind, FailureRecord};

    #[derive(Debug, Deserialize, Validate)]
    struct Signin {
        #[validate(email(message = "must be a valid email"))]
        email: String,
        #[validate(length(min = 1, message = "must not be empty"))]
        password: String,
    }

    async fn handler(ValidatedJson(body): ValidatedJson<Signin>) -> String {
        format!("{}:{}", body.email, body.password.len())
    }

    async fn send(body: &str, content_type: Option<&str>) -> (StatusCode, Option<FailureRecord>) {
        let app = Router::new().route("/signin", post(handler));
        let mut builder = Request::builder().method("POST").uri("/signin");
        if let Some(ct) = content_type {
            builder = builder.header(header::CONTENT_TYPE, ct);
        }
        let response = app
            .oneshot(builder.body(Body::from(body.to_string())).unwrap())
            .await
            .unwrap();
        (
            response.status(),
            response.extensions().get::<FailureRecord>().cloned(),
        )
    }

    #[tokio::test]
    async fn valid_body_reaches_the_handler() {
        let (status, record) = send(
            r#"{"email":"a@b.com","password":"secret1"}"#,
            Some("application/json"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(record.is_none());
    }

    #[tokio::test]
    async fn missing_field_is_a_validation_failure() {
        let (status, record) = send(r#"{"email":"a@b.com"}"#, Some("application/json")).await;
        let record = record.unwrap();

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(record.kind, ErrorKind::ValidationFailed);
        assert!(record.message.contains("password"), "{}", record.message);
    }

    #[tokio::test]
    async fn constraint_violation_names_the_field() {
        let (_, record) = send(
            r#"{"email":"not-an-email","password":"x"}"#,
            Some("application/json"),
        )
        .await;
        let record = record.unwrap();

        assert_eq!(record.kind, ErrorKind::ValidationFailed);
        assert_eq!(record.message, "email: must be a valid email");
    }

    #[tokio::test]
    async fn broken_json_is_a_bad_request() {
        let (status, record) = send(r#"{"email":"#, Some("application/json")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(record.unwrap().kind, ErrorKind::BadRequest);
    }

    #[tokio::test]
    async fn missing_content_type_is_a_bad_request() {
        let (status, record) = send(r#"{"email":"a@b.com","password":"x"}"#, None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(record.unwrap().kind, ErrorKind::BadRequest);
    }
}
