/*
 * Responsibility
 * - users テーブル向けの操作 (UserRepo trait) と SQLx 実装
 * - email の重複は RepoError::Conflict で返す
 * - password hash は UserRow に含めない (credentials lookup だけが触る)
 */
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::RepoError;

pub const DEFAULT_NAME: &str = "Jacques-Yves Cousteau";
pub const DEFAULT_ABOUT: &str = "Explorer";
pub const DEFAULT_AVATAR: &str =
    "https://pictures.s3.yandex.net/resources/jacques-cousteau_1604399756.png";

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub about: String,
    pub avatar: String,
    pub email: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct CredentialRow {
    pub id: Uuid,
    pub password_hash: String,
}

/// Insert payload. Profile fields are already defaulted by the caller.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub about: String,
    pub avatar: String,
    pub email: String,
    pub password_hash: String,
}

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn create(&self, user: NewUser) -> Result<UserRow, RepoError>;

    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<CredentialRow>, RepoError>;

    async fn get(&self, id: Uuid) -> Result<Option<UserRow>, RepoError>;

    async fn list(&self) -> Result<Vec<UserRow>, RepoError>;

    async fn update_profile(
        &self,
        id: Uuid,
        name: &str,
        about: &str,
    ) -> Result<Option<UserRow>, RepoError>;

    async fn update_avatar(&self, id: Uuid, avatar: &str) -> Result<Option<UserRow>, RepoError>;
}

#[derive(Clone, Debug)]
pub struct PgUserRepo {
    pool: PgPool,
}

impl PgUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepo for PgUserRepo {
    async fn create(&self, user: NewUser) -> Result<UserRow, RepoError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, name, about, avatar, email, password_hash)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, about, avatar, email
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.name)
        .bind(&user.about)
        .bind(&user.avatar)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        Ok(row)
    }

    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<CredentialRow>, RepoError> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT id, password_hash
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn get(&self, id: Uuid) -> Result<Option<UserRow>, RepoError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, about, avatar, email
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn list(&self) -> Result<Vec<UserRow>, RepoError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, about, avatar, email
            FROM users
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn update_profile(
        &self,
        id: Uuid,
        name: &str,
        about: &str,
    ) -> Result<Option<UserRow>, RepoError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET name = $2, about = $3
            WHERE id = $1
            RETURNING id, name, about, avatar, email
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(about)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update_avatar(&self, id: Uuid, avatar: &str) -> Result<Option<UserRow>, RepoError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET avatar = $2
            WHERE id = $1
            RETURNING id, name, about, avatar, email
            "#,
        )
        .bind(id)
        .bind(avatar)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}
