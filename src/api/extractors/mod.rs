pub mod auth_ctx;
pub mod resource_id;
pub mod validated_json;

pub use auth_ctx::{AuthCtx, AuthCtxExtractor};
pub use resource_id::{CardId, UserId};
pub use validated_json::ValidatedJson;
