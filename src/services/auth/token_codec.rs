use chrono::{DateTime, Duration as ChronoDuration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use uuid::Uuid;

use crate::error::AppError;

/// Claims carried by a session token: the user id and its lifetime.
#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    sub: Uuid,
    iat: i64,
    exp: i64,
}

/// HS256 session-token codec.
///
/// - The secret is loaded once at startup and never changes.
/// - `exp` is checked with zero leeway: a token is valid until exactly `iat + ttl`.
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_seconds: u64,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("validation", &self.validation)
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

impl TokenCodec {
    pub fn new(secret: &[u8], ttl_seconds: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl_seconds,
        }
    }

    /// Issue a token for `user_id`, valid for the configured TTL from now.
    pub fn issue(&self, user_id: Uuid) -> Result<String, AppError> {
        self.issue_at(user_id, Utc::now())
    }

    pub fn issue_at(&self, user_id: Uuid, issued_at: DateTime<Utc>) -> Result<String, AppError> {
        let exp = i64::try_from(self.ttl_seconds)
            .ok()
            .and_then(ChronoDuration::try_seconds)
            .and_then(|ttl| issued_at.checked_add_signed(ttl))
            .ok_or_else(|| {
                error!(ttl_seconds = self.ttl_seconds, "session token expiry out of range");
                AppError::internal(anyhow::anyhow!(
                    "token ttl of {}s overflows the expiry timestamp",
                    self.ttl_seconds
                ))
            })?;
        let claims = SessionClaims {
            sub: user_id,
            iat: issued_at.timestamp(),
            exp: exp.timestamp(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(
            |e| {
                error!(error = %e, "failed to sign session token");
                AppError::internal(e)
            },
        )
    }

    /// Verify signature and expiry, then hand back the user id.
    ///
    /// Every failure collapses into the same `Unauthorized` so callers cannot
    /// tell a forged token from an expired one.
    pub fn verify(&self, token: &str) -> Result<Uuid, AppError> {
        match jsonwebtoken::decode::<SessionClaims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Ok(data.claims.sub),
            Err(err) => {
                debug!(error = ?err.kind(), "session token rejected");
                Err(AppError::authorization_required())
            }
        }
    }
}
