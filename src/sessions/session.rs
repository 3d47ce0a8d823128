use std::collections::HashMap;

use rand::{distributions::Alphanumeric, Rng};
use serde_json::Value;
use uuid::Uuid;

/// Attribute map persisted for a session.
pub type SessionData = HashMap<String, Value>;

pub const USER_ID_KEY: &str = "user_id";

const SESSION_ID_LEN: usize = 48;

/// A browser session as seen by one request. Changes are local until saved.
#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    data: SessionData,
    fresh: bool,
}

impl Session {
    /// A new, never-persisted session with a random id.
    pub fn fresh() -> Self {
        let id = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(SESSION_ID_LEN)
            .map(char::from)
            .collect();
        Self {
            id,
            data: SessionData::new(),
            fresh: true,
        }
    }

    pub fn restore(id: String, data: SessionData) -> Self {
        Self {
            id,
            data,
            fresh: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn data(&self) -> &SessionData {
        &self.data
    }

    pub fn is_fresh(&self) -> bool {
        self.fresh
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn set(&mut self, key: &str, value: Value) {
        self.data.insert(key.to_string(), value);
    }

    pub fn delete(&mut self, key: &str) {
        self.data.remove(key);
    }

    /// The authenticated user, if any. Unparseable values count as anonymous.
    pub fn user_id(&self) -> Option<Uuid> {
        self.get(USER_ID_KEY)
            .and_then(Value::as_str)
            .and_then(|s| Uuid::parse_str(s).ok())
    }

    pub fn set_user_id(&mut self, user_id: Uuid) {
        self.set(USER_ID_KEY, Value::String(user_id.to_string()));
    }

    pub fn clear_user_id(&mut self) {
        self.delete(USER_ID_KEY);
    }
}
