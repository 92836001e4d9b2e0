pub mod card_repo;
pub mod error;
pub mod memory;
pub mod user_repo;

pub use card_repo::{CardRepo, CardRow, PgCardRepo};
pub use memory::MemoryStore;
pub use user_repo::{PgUserRepo, UserRepo, UserRow};
