use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    repo::CredentialStore,
    repo_types::{NewUser, User},
};

/// Vec-backed store for tests. `fail_lookups` makes `find_by_email` error.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    users: RwLock<Vec<User>>,
    pub fail_lookups: bool,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_lookups() -> Self {
        Self {
            fail_lookups: true,
            ..Self::default()
        }
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        if self.fail_lookups {
            anyhow::bail!("connection refused");
        }
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|u| u.email == email && u.deleted_at.is_none())
            .cloned())
    }

    async fn create(&self, user: NewUser) -> anyhow::Result<User> {
        let mut users = self.users.write().await;
        if let Some(existing) = users
            .iter()
            .find(|u| u.email == user.email && u.deleted_at.is_none())
        {
            return Ok(existing.clone());
        }
        let now = OffsetDateTime::now_utc();
        let row = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password: user.password,
            phone: user.phone,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        users.push(row.clone());
        Ok(row)
    }

    async fn list(&self) -> anyhow::Result<Vec<User>> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .filter(|u| u.deleted_at.is_none())
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_keeps_existing_record_for_same_email() {
        let store = InMemoryCredentialStore::new();
        let first = store
            .create(NewUser::from_oauth("Alice", "alice@example.com"))
            .await
            .unwrap();
        let second = store
            .create(NewUser {
                phone: 555,
                ..NewUser::from_oauth("Someone Else", "alice@example.com")
            })
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.name, "Alice");
        assert_eq!(second.phone, 0);
        assert_eq!(store.len().await, 1);
    }

    #[test]
    fn password_is_not_serialized() {
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: Uuid::new_v4(),
            name: "Bob".into(),
            email: "bob@example.com".into(),
            password: "hash".into(),
            phone: 0,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["email"], "bob@example.com");
        assert!(json["deleted_at"].is_null());
    }
}
