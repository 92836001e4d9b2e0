//! In-process store used when no `DATABASE_URL` is configured, and by tests.
//!
//! Mirrors the Postgres repos: unique email, cards must point at an existing
//! owner, newest-first card listing, likes as a set. Locks are never held across an await on another resource.
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::repos::card_repo::{CardRepo, CardRow};
use crate::repos::error::RepoError;
use crate::repos::user_repo::{CredentialRow, NewUser, UserRepo, UserRow};

#[derive(Debug, Clone)]
struct StoredUser {
    row: UserRow,
    password_hash: String,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<Vec<StoredUser>>,
    cards: RwLock<HashMap<Uuid, CardRow>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn create(&self, user: NewUser) -> Result<UserRow, RepoError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.row.email == user.email) {
            return Err(RepoError::Conflict);
        }

        let row = UserRow {
            id: Uuid::new_v4(),
            name: user.name,
            about: user.about,
            avatar: user.avatar,
            email: user.email,
        };
        users.push(StoredUser {
            row: row.clone(),
            password_hash: user.password_hash,
        });
        Ok(row)
    }

    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<CredentialRow>, RepoError> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .find(|u| u.row.email == email)
            .map(|u| CredentialRow {
                id: u.row.id,
                password_hash: u.password_hash.clone(),
            }))
    }

    async fn get(&self, id: Uuid) -> Result<Option<UserRow>, RepoError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.row.id == id).map(|u| u.row.clone()))
    }

    async fn list(&self) -> Result<Vec<UserRow>, RepoError> {
        let users = self.users.read().await;
        Ok(users.iter().map(|u| u.row.clone()).collect())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        name: &str,
        about: &str,
    ) -> Result<Option<UserRow>, RepoError> {
        let mut users = self.users.write().await;
        Ok(users.iter_mut().find(|u| u.row.id == id).map(|u| {
            u.row.name = name.to_string();
            u.row.about = about.to_string();
            u.row.clone()
        }))
    }

    async fn update_avatar(&self, id: Uuid, avatar: &str) -> Result<Option<UserRow>, RepoError> {
        let mut users = self.users.write().await;
        Ok(users.iter_mut().find(|u| u.row.id == id).map(|u| {
            u.row.avatar = avatar.to_string();
            u.row.clone()
        }))
    }
}

#[async_trait]
impl CardRepo for MemoryStore {
    async fn list(&self) -> Result<Vec<CardRow>, RepoError> {
        let cards = self.cards.read().await;
        let mut rows: Vec<CardRow> = cards.values().cloned().collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn create(&self, name: &str, link: &str, owner: Uuid) -> Result<CardRow, RepoError> {
        if !self.users.read().await.iter().any(|u| u.row.id == owner) {
            return Err(RepoError::MissingReference);
        }

        let row = CardRow {
            id: Uuid::new_v4(),
            name: name.to_string(),
            link: link.to_string(),
            owner,
            likes: Vec::new(),
            created_at: Utc::now(),
        };
        self.cards.write().await.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get(&self, id: Uuid) -> Result<Option<CardRow>, RepoError> {
        Ok(self.cards.read().await.get(&id).cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        Ok(self.cards.write().await.remove(&id).is_some())
    }

    async fn add_like(&self, id: Uuid, user_id: Uuid) -> Result<Option<CardRow>, RepoError> {
        let mut cards = self.cards.write().await;
        Ok(cards.get_mut(&id).map(|card| {
            if !card.likes.contains(&user_id) {
                card.likes.push(user_id);
            }
            card.clone()
        }))
    }

    async fn remove_like(&self, id: Uuid, user_id: Uuid) -> Result<Option<CardRow>, RepoError> {
        let mut cards = self.cards.write().await;
        Ok(cards.get_mut(&id).map(|card| {
            card.likes.retain(|u| *u != user_id);
            card.clone()
        }))
    }
}
