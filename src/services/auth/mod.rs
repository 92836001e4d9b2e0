pub mod credentials;
pub mod factory;
pub mod password;
pub mod session_cookie;
pub mod token_codec;

pub use credentials::{CredentialService, Registration};
pub use password::Passwords;
pub use session_cookie::SessionCookie;
pub use token_codec::TokenCodec;
