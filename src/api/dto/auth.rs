/*
 * Responsibility
 * - /signin, /signup の request/response DTO
 */
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::dto::users::UserResponse;
use crate::api::dto::validate_http_url;

#[derive(Debug, Deserialize, Validate)]
pub struct SigninRequest {
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 2, max = 30, message = "must be 2 to 30 characters long"))]
    pub name: Option<String>,
    #[validate(length(min = 2, max = 30, message = "must be 2 to 30 characters long"))]
    pub about: Option<String>,
    #[validate(custom(function = "validate_http_url", message = "must be a valid http(s) URL"))]
    pub avatar: Option<String>,
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub user: UserResponse,
}
