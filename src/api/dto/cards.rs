/*
 * Responsibility
 * - Cards の request/response DTO
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::validate_http_url;
use crate::repos::CardRow;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCardRequest {
    #[validate(length(min = 2, max = 30, message = "must be 2 to 30 characters long"))]
    pub name: String,
    #[validate(custom(function = "validate_http_url", message = "must be a valid http(s) URL"))]
    pub link: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub link: String,
    pub owner: Uuid,
    pub likes: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<CardRow> for CardResponse {
    fn from(row: CardRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            link: row.link,
            owner: row.owner,
            likes: row.likes,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CardList {
    pub data: Vec<CardResponse>,
}
