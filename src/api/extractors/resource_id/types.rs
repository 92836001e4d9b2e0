/**
 * Responsibility
 *  - リソースごとの「意味付きID型」を宣言する
 *  - users / cards で取り違えないようにタグで区別する
 */
use super::core::ResourceId;

// users
pub enum UserTag {}
pub type UserId = ResourceId<UserTag>;

// cards
pub enum CardTag {}
pub type CardId = ResourceId<CardTag>;
