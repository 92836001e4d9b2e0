//! Where a session token may come from, in priority order.
//!
//! Each source looks at the request headers only. The first source that yields
//! a token wins; later sources are not consulted.

use axum::http::{HeaderMap, header};
use axum_extra::extract::cookie::{Key, SignedCookieJar};

use crate::services::auth::SessionCookie;
use crate::services::auth::session_cookie::SESSION_COOKIE_NAME;

pub trait TokenSource: Send + Sync {
    fn name(&self) -> &'static str;

    fn extract(&self, headers: &HeaderMap) -> Option<String>;
}

/// Signed `jwt` cookie. A cookie whose signature does not check out is ignored.
pub struct SignedCookieSource {
    key: Key,
}

impl SignedCookieSource {
    pub fn new(key: Key) -> Self {
        Self { key }
    }
}

impl TokenSource for SignedCookieSource {
    fn name(&self) -> &'static str {
        "cookie"
    }

    fn extract(&self, headers: &HeaderMap) -> Option<String> {
        SignedCookieJar::from_headers(headers, self.key.clone())
            .get(SESSION_COOKIE_NAME)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty())
    }
}

/// `Authorization: Bearer <token>`
pub struct BearerHeaderSource;

impl TokenSource for BearerHeaderSource {
    fn name(&self) -> &'static str {
        "bearer"
    }

    fn extract(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    }
}

pub struct TokenSources {
    sources: Vec<Box<dyn TokenSource>>,
}

impl TokenSources {
    pub fn new(sources: Vec<Box<dyn TokenSource>>) -> Self {
        Self { sources }
    }

    pub fn cookie_then_bearer(cookie: &SessionCookie) -> Self {
        Self::new(vec![
            Box::new(SignedCookieSource::new(cookie.key().clone())),
            Box::new(BearerHeaderSource),
        ])
    }

    /// First hit, tagged with the source it came from.
    pub fn extract(&self, headers: &HeaderMap) -> Option<(&'static str, String)> {
        self.sources
            .iter()
            .find_map(|s| s.extract(headers).map(|token| (s.name(), token)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use axum::response::IntoResponse;

    fn cookie() -> SessionCookie {
        SessionCookie::new(b"cookie-secret", false, 60)
    }

    fn signed_cookie_header(cookie: &SessionCookie, token: &str) -> HeaderValue {
        let jar = SignedCookieJar::new(cookie.key().clone()).add(cookie.issue(token.to_string()));
        let response = (jar, ()).into_response();
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        HeaderValue::from_str(set_cookie.split(';').next().unwrap()).unwrap()
    }

    #[test]
    fn nothing_present_yields_nothing() {
        let sources = TokenSources::cookie_then_bearer(&cookie());
        assert!(sources.extract(&HeaderMap::new()).is_none());
    }

    #[test]
    fn bearer_header_is_read() {
        let sources = TokenSources::cookie_then_bearer(&cookie());
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));

        assert_eq!(
            sources.extract(&headers),
            Some(("bearer", "abc".to_string()))
        );
    }

    #[test]
    fn other_schemes_are_ignored() {
        let sources = TokenSources::cookie_then_bearer(&cookie());
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Basic dXNlcjpwYXNz"),
        );

        assert!(sources.extract(&headers).is_none());
    }

    #[test]
    fn signed_cookie_wins_over_bearer() {
        let cookie = cookie();
        let sources = TokenSources::cookie_then_bearer(&cookie);
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, signed_cookie_header(&cookie, "from-cookie"));
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer from-header"),
        );

        assert_eq!(
            sources.extract(&headers),
            Some(("cookie", "from-cookie".to_string()))
        );
    }

    #[test]
    fn unsigned_cookie_falls_through_to_bearer() {
        let sources = TokenSources::cookie_then_bearer(&cookie());
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("jwt=forged"));
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer from-header"),
        );

        assert_eq!(
            sources.extract(&headers),
            Some(("bearer", "from-header".to_string()))
        );
    }
}
