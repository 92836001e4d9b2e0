/*
 * Responsibility
 * - Users の request/response DTO
 * - password hash はどの response にも載せない
 */
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::validate_http_url;
use crate::repos::UserRow;

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 2, max = 30, message = "must be 2 to 30 characters long"))]
    pub name: String,
    #[validate(length(min = 2, max = 30, message = "must be 2 to 30 characters long"))]
    pub about: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAvatarRequest {
    #[validate(custom(function = "validate_http_url", message = "must be a valid http(s) URL"))]
    pub avatar: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub about: String,
    pub avatar: String,
    pub email: String,
}

impl From<UserRow> for UserResponse {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            about: row.about,
            avatar: row.avatar,
            email: row.email,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserEnvelope {
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct UserList {
    pub data: Vec<UserResponse>,
}
