/*
 * Responsibility
 * - cards / card_likes 向けの操作 (CardRepo trait) と SQLx 実装
 * - likes は set として扱う (同じ user の二重 like は 1 件)
 * - 所有者チェックは handler 側 (ここは CRUD のみ)
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::RepoError;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct CardRow {
    pub id: Uuid,
    pub name: String,
    pub link: String,
    pub owner: Uuid,
    pub likes: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait CardRepo: Send + Sync {
    /// Newest first.
    async fn list(&self) -> Result<Vec<CardRow>, RepoError>;

    async fn create(&self, name: &str, link: &str, owner: Uuid) -> Result<CardRow, RepoError>;

    async fn get(&self, id: Uuid) -> Result<Option<CardRow>, RepoError>;

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError>;

    async fn add_like(&self, id: Uuid, user_id: Uuid) -> Result<Option<CardRow>, RepoError>;

    async fn remove_like(&self, id: Uuid, user_id: Uuid) -> Result<Option<CardRow>, RepoError>;
}

#[derive(Clone, Debug)]
pub struct PgCardRepo {
    pool: PgPool,
}

impl PgCardRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_CARDS: &str = r#"
    SELECT
        c.id, c.name, c.link, c.owner, c.created_at,
        COALESCE(
            array_agg(l.user_id ORDER BY l.liked_at) FILTER (WHERE l.user_id IS NOT NULL),
            '{}'
        ) AS likes
    FROM cards c
    LEFT JOIN card_likes l ON l.card_id = c.id
"#;

#[async_trait]
impl CardRepo for PgCardRepo {
    async fn list(&self) -> Result<Vec<CardRow>, RepoError> {
        let sql = format!("{SELECT_CARDS} GROUP BY c.id ORDER BY c.created_at DESC");
        let rows = sqlx::query_as::<_, CardRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn create(&self, name: &str, link: &str, owner: Uuid) -> Result<CardRow, RepoError> {
        let row = sqlx::query_as::<_, CardRow>(
            r#"
            INSERT INTO cards (id, name, link, owner)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, link, owner, created_at, '{}'::uuid[] AS likes
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(link)
        .bind(owner)
        .fetch_one(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        Ok(row)
    }

    async fn get(&self, id: Uuid) -> Result<Option<CardRow>, RepoError> {
        let sql = format!("{SELECT_CARDS} WHERE c.id = $1 GROUP BY c.id");
        let row = sqlx::query_as::<_, CardRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        // card_likes rows go with it (ON DELETE CASCADE)
        let result = sqlx::query(
            r#"
            DELETE FROM cards
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn add_like(&self, id: Uuid, user_id: Uuid) -> Result<Option<CardRow>, RepoError> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO card_likes (card_id, user_id)
            SELECT id, $2 FROM cards WHERE id = $1
            ON CONFLICT (card_id, user_id) DO NOTHING
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;
        tracing::debug!(card_id = %id, rows = inserted.rows_affected(), "like stored");

        self.get(id).await
    }

    async fn remove_like(&self, id: Uuid, user_id: Uuid) -> Result<Option<CardRow>, RepoError> {
        sqlx::query(
            r#"
            DELETE FROM card_likes
            WHERE card_id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        self.get(id).await
    }
}
