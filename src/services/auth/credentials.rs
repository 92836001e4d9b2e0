use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::error::AppError;
use crate::repos::error::RepoError;
use crate::repos::user_repo::{
    DEFAULT_ABOUT, DEFAULT_AVATAR, DEFAULT_NAME, NewUser, UserRepo, UserRow,
};
use crate::services::auth::password::Passwords;

pub const BAD_CREDENTIALS: &str = "Incorrect email or password";
pub const EMAIL_TAKEN: &str = "A user with this email already exists";

/// Signup payload after validation. Missing profile fields fall back to defaults.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: Option<String>,
    pub about: Option<String>,
    pub avatar: Option<String>,
    pub email: String,
    pub password: String,
}

/// Credential store adapter: registration and email/password verification.
///
/// Hashing is CPU bound, so it runs on the blocking pool.
#[derive(Clone)]
pub struct CredentialService {
    users: Arc<dyn UserRepo>,
    passwords: Passwords,
}

impl std::fmt::Debug for CredentialService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialService").finish_non_exhaustive()
    }
}

impl CredentialService {
    pub fn new(users: Arc<dyn UserRepo>, passwords: Passwords) -> Self {
        Self { users, passwords }
    }

    pub async fn register(&self, registration: Registration) -> Result<UserRow, AppError> {
        let passwords = self.passwords.clone();
        let plain = registration.password;
        let password_hash = tokio::task::spawn_blocking(move || passwords.hash(&plain))
            .await
            .map_err(AppError::internal)??;

        let user = self
            .users
            .create(NewUser {
                name: registration.name.unwrap_or_else(|| DEFAULT_NAME.to_string()),
                about: registration.about.unwrap_or_else(|| DEFAULT_ABOUT.to_string()),
                avatar: registration
                    .avatar
                    .unwrap_or_else(|| DEFAULT_AVATAR.to_string()),
                email: registration.email,
                password_hash,
            })
            .await
            .map_err(|e| match e {
                RepoError::Conflict => AppError::Conflict(EMAIL_TAKEN.to_string()),
                other => other.into(),
            })?;

        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Resolve the user id for a matching email/password pair.
    ///
    /// Unknown email and wrong password produce the same `Unauthorized`.
    pub async fn verify_credentials(&self, email: &str, password: &str) -> Result<Uuid, AppError> {
        let Some(creds) = self.users.find_credentials_by_email(email).await? else {
            debug!("signin for unknown email");
            return Err(AppError::Unauthorized(BAD_CREDENTIALS.to_string()));
        };

        let passwords = self.passwords.clone();
        let plain = password.to_string();
        let hash = creds.password_hash;
        let matches = tokio::task::spawn_blocking(move || passwords.verify(&plain, &hash))
            .await
            .map_err(AppError::internal)?;

        if !matches {
            debug!(user_id = %creds.id, "signin with wrong password");
            return Err(AppError::Unauthorized(BAD_CREDENTIALS.to_string()));
        }

        Ok(creds.id)
    }
}
