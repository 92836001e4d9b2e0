/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - middleware が検証して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - token の検証は middleware/services 側の責務
 * - 1 リクエストにつき高々 1 つ。リクエスト終了とともに破棄される
 */

use uuid::Uuid;

/// 認証済みのリクエストに付与されるコンテキスト
///
/// - `user_id` は token の `sub` から復元した内部ユーザーID
/// - 権限は「認証済み = 保護ルート全体にアクセス可」のみ (roles/scopes は持たない)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthCtx {
    pub user_id: Uuid,
}

impl AuthCtx {
    pub fn new(user_id: Uuid) -> Self {
        Self { user_id }
    }
}
