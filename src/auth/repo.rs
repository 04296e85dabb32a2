use std::collections::HashMap;

use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use crate::auth::repo_types::{InsertOutcome, NewUser, User};

#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>>;
    async fn create(&self, user: NewUser) -> anyhow::Result<InsertOutcome>;
}

#[derive(Clone)]
pub struct PgCredentialStore {
    db: PgPool,
}

impl PgCredentialStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    /// Find a user by username.
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await
        .context("find user by username")?;
        Ok(user)
    }

    /// Create a new user with hashed password.
    async fn create(&self, user: NewUser) -> anyhow::Result<InsertOutcome> {
        let res = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, password_hash, created_at
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.db)
        .await;

        match res {
            Ok(created) => Ok(InsertOutcome::Created(created)),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Ok(InsertOutcome::Duplicate)
            }
            Err(e) => Err(anyhow::Error::new(e).context("insert user")),
        }
    }
}

/// Process-local credential store, keyed by username.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    inner: RwLock<MemUsers>,
}

#[derive(Default)]
struct MemUsers {
    next_id: i64,
    by_username: HashMap<String, User>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        Ok(self.inner.read().await.by_username.get(username).cloned())
    }

    async fn create(&self, user: NewUser) -> anyhow::Result<InsertOutcome> {
        let mut guard = self.inner.write().await;
        if guard.by_username.contains_key(&user.username) {
            return Ok(InsertOutcome::Duplicate);
        }
        guard.next_id += 1;
        let created = User {
            id: guard.next_id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: OffsetDateTime::now_utc(),
        };
        guard
            .by_username
            .insert(created.username.clone(), created.clone());
        Ok(InsertOutcome::Created(created))
    }
}
