use std::{
    collections::HashMap,
    sync::atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use super::{session::SessionData, store::SessionStore};

/// HashMap-backed store for tests, with switches to simulate backend failures.
#[derive(Default)]
pub struct InMemorySessionStore {
    rows: RwLock<HashMap<String, (SessionData, OffsetDateTime)>>,
    writes: AtomicUsize,
    pub fail_reads: bool,
    pub fail_writes: bool,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_reads() -> Self {
        Self {
            fail_reads: true,
            ..Self::default()
        }
    }

    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    /// Number of successful `store` calls.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub async fn raw(&self, id: &str) -> Option<SessionData> {
        self.rows.read().await.get(id).map(|(d, _)| d.clone())
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self, id: &str) -> anyhow::Result<Option<SessionData>> {
        if self.fail_reads {
            anyhow::bail!("session backend unavailable");
        }
        let now = OffsetDateTime::now_utc();
        Ok(self
            .rows
            .read()
            .await
            .get(id)
            .filter(|(_, exp)| *exp > now)
            .map(|(d, _)| d.clone()))
    }

    async fn store(
        &self,
        id: &str,
        data: &SessionData,
        expires_at: OffsetDateTime,
    ) -> anyhow::Result<()> {
        if self.fail_writes {
            anyhow::bail!("session backend read-only");
        }
        self.rows
            .write()
            .await
            .insert(id.to_string(), (data.clone(), expires_at));
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn delete_expired(&self) -> anyhow::Result<u64> {
        let now = OffsetDateTime::now_utc();
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|_, (_, exp)| *exp > now);
        Ok((before - rows.len()) as u64)
    }
}
