use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;

use crate::users::repo_types::{NewUser, User};

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// `Ok(None)` means no live user has this email.
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;

    /// Creates the user, or returns the existing live record for the email untouched.
    async fn create(&self, user: NewUser) -> anyhow::Result<User>;

    async fn list(&self) -> anyhow::Result<Vec<User>>;
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
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password, phone, created_at, updated_at, deleted_at
            FROM users
            WHERE email = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .context("find user by email")?;
        Ok(user)
    }

    async fn create(&self, user: NewUser) -> anyhow::Result<User> {
        let inserted = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password, phone)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (email) WHERE deleted_at IS NULL DO NOTHING
            RETURNING id, name, email, password, phone, created_at, updated_at, deleted_at
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password)
        .bind(user.phone)
        .fetch_optional(&self.db)
        .await
        .context("insert user")?;

        match inserted {
            Some(u) => Ok(u),
            // Lost a race with a concurrent insert for the same email.
            None => self
                .find_by_email(&user.email)
                .await?
                .ok_or_else(|| anyhow::anyhow!("user {} vanished after conflict", user.email)),
        }
    }

    async fn list(&self) -> anyhow::Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password, phone, created_at, updated_at, deleted_at
            FROM users
            WHERE deleted_at IS NULL
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list users")?;
        Ok(users)
    }
}
