/*
 * Responsibility
 * - request/response DTO
 * - request DTO は validator の derive で route ごとの schema を兼ねる
 */
pub mod auth;
pub mod cards;
pub mod users;

use serde::Serialize;
use validator::ValidationError;

/// `{ message }` for successful responses that carry no resource.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// http(s) URL with a host. Used for avatars and card links.
pub fn validate_http_url(value: &str) -> Result<(), ValidationError> {
    match url::Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.host_str().is_some() => Ok(()),
        _ => Err(ValidationError::new("url")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_urls_pass() {
        assert!(validate_http_url("https://example.com/a.png").is_ok());
        assert!(validate_http_url("http://www.example.com/a?b=c#d").is_ok());
    }

    #[test]
    fn other_urls_fail() {
        for value in ["", "example.com/a.png", "ftp://example.com/a", "javascript:alert(1)"] {
            assert!(validate_http_url(value).is_err(), "{value}");
        }
    }
}
