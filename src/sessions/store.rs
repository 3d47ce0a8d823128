use anyhow::Context;
use async_trait::async_trait;
use sqlx::{types::Json, PgPool};
use time::OffsetDateTime;

use super::session::SessionData;

/// Backing storage for sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns `None` for unknown or expired ids.
    async fn load(&self, id: &str) -> anyhow::Result<Option<SessionData>>;

    async fn store(&self, id: &str, data: &SessionData, expires_at: OffsetDateTime)
        -> anyhow::Result<()>;

    /// Removes expired rows, returning how many were deleted.
    async fn delete_expired(&self) -> anyhow::Result<u64>;
}

#[derive(Clone)]
pub struct PgSessionStore {
    db: PgPool,
}

impl PgSessionStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn load(&self, id: &str) -> anyhow::Result<Option<SessionData>> {
        let row = sqlx::query_as::<_, (Json<SessionData>,)>(
            r#"
            SELECT data
            FROM sessions
            WHERE id = $1 AND expires_at > now()
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("load session")?;
        Ok(row.map(|(Json(data),)| data))
    }

    async fn store(
        &self,
        id: &str,
        data: &SessionData,
        expires_at: OffsetDateTime,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO sessions (id, data, expires_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE
                SET data = EXCLUDED.data,
                    expires_at = EXCLUDED.expires_at
            "#,
        )
        .bind(id)
        .bind(Json(data))
        .bind(expires_at)
        .execute(&self.db)
        .await
        .context("store session")?;
        Ok(())
    }

    async fn delete_expired(&self) -> anyhow::Result<u64> {
        let res = sqlx::query("DELETE FROM sessions WHERE expires_at <= now()")
            .execute(&self.db)
            .await
            .context("delete expired sessions")?;
        Ok(res.rows_affected())
    }
}
