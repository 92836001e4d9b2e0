/*
 * Responsibility
 * - アプリ共通の AppError 定義 (closed な ErrorKind と 1:1 で HTTP status に対応)
 * - FailureRecord への正規化と translate (FailureRecord -> status + { message })
 * - IntoResponse 実装: response extensions に FailureRecord を載せ、error tap が拾う
 * - RepoError / JsonRejection / ValidationErrors / anyhow を統一的に変換
 */
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

use crate::repos::error::RepoError;

/// Generic text for every `Internal` failure. Details never leave the process.
pub const INTERNAL_MESSAGE: &str = "An error occurred on the server";
pub const AUTHORIZATION_REQUIRED: &str = "Authorization required";
pub const PAGE_NOT_FOUND: &str = "Page not found";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    ValidationFailed,
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    Internal,
}

impl ErrorKind {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorKind::BadRequest | ErrorKind::ValidationFailed => StatusCode::BAD_REQUEST,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("validation failed: {0}")]
    ValidationFailed(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("internal server error")]
    Internal(#[source] anyhow::Error),
}

impl AppError {
    pub fn authorization_required() -> Self {
        Self::Unauthorized(AUTHORIZATION_REQUIRED.to_string())
    }

    pub fn internal(cause: impl Into<anyhow::Error>) -> Self {
        Self::Internal(cause.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::BadRequest(_) => ErrorKind::BadRequest,
            AppError::ValidationFailed(_) => ErrorKind::ValidationFailed,
            AppError::Unauthorized(_) => ErrorKind::Unauthorized,
            AppError::Forbidden(_) => ErrorKind::Forbidden,
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::Conflict(_) => ErrorKind::Conflict,
            AppError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Normalize into the record that both the wire and the error tap see.
    pub fn into_record(self) -> FailureRecord {
        let kind = self.kind();
        match self {
            AppError::Internal(cause) => FailureRecord {
                kind,
                message: INTERNAL_MESSAGE.to_string(),
                cause: Some(format!("{cause:#}")),
            },
            AppError::BadRequest(message)
            | AppError::ValidationFailed(message)
            | AppError::Unauthorized(message)
            | AppError::Forbidden(message)
            | AppError::NotFound(message)
            | AppError::Conflict(message) => FailureRecord {
                kind,
                message,
                cause: None,
            },
        }
    }
}

/// A failure after normalization. Also stored in response extensions so the
/// error tap can log it with the request it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureRecord {
    pub kind: ErrorKind,
    pub message: String,
    pub cause: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

pub fn translate(record: &FailureRecord) -> (StatusCode, ErrorBody) {
    let message = match record.kind {
        ErrorKind::Internal => INTERNAL_MESSAGE.to_string(),
        _ => record.message.clone(),
    };
    (record.kind.status(), ErrorBody { message })
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let record = self.into_record();
        let (status, body) = translate(&record);

        let mut response = (status, Json(body)).into_response();
        response.extensions_mut().insert(record);
        response
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Conflict => AppError::Conflict("Resource already exists".to_string()),
            RepoError::MissingReference => {
                AppError::NotFound("Referenced resource not found".to_string())
            }
            RepoError::Db(e) => AppError::internal(e),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        AppError::Internal(e)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            // Body is JSON but does not fit the target type.
            JsonRejection::JsonDataError(e) => AppError::ValidationFailed(e.body_text()),
            JsonRejection::JsonSyntaxError(_) => {
                AppError::BadRequest("Request body is not valid JSON".to_string())
            }
            JsonRejection::MissingJsonContentType(_) => AppError::BadRequest(
                "Expected request with `Content-Type: application/json`".to_string(),
            ),
            JsonRejection::BytesRejection(_) => {
                AppError::BadRequest("Failed to read request body".to_string())
            }
            _ => AppError::BadRequest("Invalid request body".to_string()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let message = fields
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => format!("{field}: {msg}"),
                    None => format!("{field}: invalid value ({})", e.code),
                })
            })
            .collect::<Vec<_>>()
            .join("; ");

        AppError::ValidationFailed(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn every_kind_owns_one_status() {
        let cases = [
            (ErrorKind::BadRequest, 400),
            (ErrorKind::ValidationFailed, 400),
            (ErrorKind::Unauthorized, 401),
            (ErrorKind::Forbidden, 403),
            (ErrorKind::NotFound, 404),
            (ErrorKind::Conflict, 409),
            (ErrorKind::Internal, 500),
        ];
        for (kind, status) in cases {
            assert_eq!(kind.status().as_u16(), status, "{kind:?}");
        }
    }

    #[test]
    fn translate_is_stable_for_the_same_record() {
        let record = AppError::NotFound("Card not found".to_string()).into_record();
        assert_eq!(translate(&record), translate(&record));
        assert_eq!(
            translate(&record),
            (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    message: "Card not found".to_string()
                }
            )
        );
    }

    #[test]
    fn internal_never_exposes_cause() {
        let err = AppError::internal(anyhow::anyhow!("connection refused: 10.0.0.3:5432"));
        let record = err.into_record();

        assert_eq!(record.kind, ErrorKind::Internal);
        assert!(record.cause.as_deref().unwrap().contains("connection refused"));

        let (status, body) = translate(&record);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.message, INTERNAL_MESSAGE);
    }

    #[test]
    fn translate_masks_internal_even_when_message_was_tampered() {
        let record = FailureRecord {
            kind: ErrorKind::Internal,
            message: "stack trace here".to_string(),
            cause: None,
        };
        assert_eq!(translate(&record).1.message, INTERNAL_MESSAGE);
    }

    #[test]
    fn repo_conflict_maps_to_a_neutral_conflict() {
        let err: AppError = RepoError::Conflict.into();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(err.into_record().message, "Resource already exists");
    }

    #[test]
    fn repo_missing_reference_maps_to_not_found() {
        let err: AppError = RepoError::MissingReference.into();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn repo_db_error_maps_to_internal() {
        let err: AppError = RepoError::Db(sqlx::Error::RowNotFound).into();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[derive(Validate)]
    struct Probe {
        #[validate(email(message = "must be a valid email"))]
        email: String,
        #[validate(length(min = 2, message = "must be at least 2 characters"))]
        about: String,
    }

    #[test]
    fn validation_errors_are_listed_by_field() {
        let probe = Probe {
            email: "nope".to_string(),
            about: "x".to_string(),
        };
        let err: AppError = probe.validate().unwrap_err().into();

        match err {
            AppError::ValidationFailed(msg) => assert_eq!(
                msg,
                "about: must be at least 2 characters; email: must be a valid email"
            ),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn response_carries_message_only_and_the_record() {
        let response = AppError::Forbidden("nope".to_string()).into_response();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let record = response.extensions().get::<FailureRecord>().cloned().unwrap();
        assert_eq!(record.kind, ErrorKind::Forbidden);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, serde_json::json!({ "message": "nope" }));
    }
}
