use std::{sync::Arc, time::Duration as StdDuration};

use time::{Duration, OffsetDateTime};
use tracing::{debug, warn};

use super::{session::Session, store::SessionStore};

/// Loads and saves sessions against a [`SessionStore`] with a sliding expiry.
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    ttl: Duration,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Session for the cookie value, or a fresh one when the id is missing,
    /// unknown or expired. Fresh sessions are not persisted until saved.
    pub async fn get(&self, cookie: Option<&str>) -> anyhow::Result<Session> {
        let Some(id) = cookie.filter(|id| !id.is_empty()) else {
            return Ok(Session::fresh());
        };
        match self.store.load(id).await? {
            Some(data) => Ok(Session::restore(id.to_string(), data)),
            None => {
                debug!("unknown or expired session id; starting fresh");
                Ok(Session::fresh())
            }
        }
    }

    pub async fn save(&self, session: &Session) -> anyhow::Result<()> {
        let expires_at = OffsetDateTime::now_utc() + self.ttl;
        self.store
            .store(session.id(), session.data(), expires_at)
            .await?;
        if session.is_fresh() {
            debug!("new session persisted");
        }
        Ok(())
    }
}

/// Periodically purges expired sessions until the runtime shuts down.
pub fn spawn_gc(store: Arc<dyn SessionStore>, every: StdDuration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            match store.delete_expired().await {
                Ok(0) => {}
                Ok(n) => debug!(removed = n, "expired sessions removed"),
                Err(e) => warn!(error = %e, "session gc failed"),
            }
        }
    })
}
