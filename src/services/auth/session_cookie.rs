use axum_extra::extract::cookie::{Cookie, Key, SameSite};
use sha2::{Digest, Sha512};
use time::Duration;

pub const SESSION_COOKIE_NAME: &str = "jwt";

/// How the session token travels as a signed, httpOnly cookie.
#[derive(Clone)]
pub struct SessionCookie {
    key: Key,
    secure: bool,
    max_age_seconds: u64,
}

impl std::fmt::Debug for SessionCookie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("SessionCookie")
            .field("secure", &self.secure)
            .field("max_age_seconds", &self.max_age_seconds)
            .finish()
    }
}

impl SessionCookie {
    /// `secret` may be any length; it is stretched to the 64 bytes a cookie `Key` needs.
    pub fn new(secret: &[u8], secure: bool, max_age_seconds: u64) -> Self {
        let digest = Sha512::digest(secret);
        Self {
            key: Key::from(digest.as_slice()),
            secure,
            max_age_seconds,
        }
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    pub fn issue(&self, token: String) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE_NAME, token))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .max_age(Duration::seconds(self.max_age_seconds.min(i64::MAX as u64) as i64))
            .build()
    }

    pub fn removal(&self) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE_NAME, "")).path("/").build()
    }
}
