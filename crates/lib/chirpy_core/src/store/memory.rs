//! In-memory store backed by `dashmap`.
//!
//! Used by tests and by the server's `--in-memory` mode. Each record lives
//! under a single map key, and mutations go through that key's entry lock,
//! so readers never observe a half-applied change.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use super::{ChirpStore, RefreshTokenStore, StoreError, UserStore};
use crate::models::auth::{RefreshTokenRecord, User, UserWithPassword};
use crate::models::chirp::{Chirp, SortOrder};
use crate::uuid::uuidv7;

/// Process-local store. Cheap to share behind an `Arc`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: DashMap<Uuid, UserWithPassword>,
    // email -> user id; the uniqueness index.
    emails: DashMap<String, Uuid>,
    refresh_tokens: DashMap<String, RefreshTokenRecord>,
    chirps: DashMap<Uuid, Chirp>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, StoreError> {
        match self.emails.entry(email.to_string()) {
            Entry::Occupied(_) => Err(StoreError::Conflict("Email already registered".into())),
            Entry::Vacant(slot) => {
                let now = Utc::now();
                let user = User {
                    id: uuidv7(),
                    created_at: now,
                    updated_at: now,
                    email: email.to_string(),
                    is_chirpy_red: false,
                };
                self.users.insert(
                    user.id,
                    UserWithPassword {
                        user: user.clone(),
                        password_hash: password_hash.to_string(),
                    },
                );
                slot.insert(user.id);
                Ok(user)
            }
        }
    }

    async fn find_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserWithPassword>, StoreError> {
        let Some(id) = self.emails.get(email).map(|e| *e.value()) else {
            return Ok(None);
        };
        Ok(self.users.get(&id).map(|u| u.value().clone()))
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.get(&id).map(|u| u.user.clone()))
    }

    async fn update_user(
        &self,
        id: Uuid,
        email: &str,
        password_hash: &str,
    ) -> Result<Option<User>, StoreError> {
        let Some(old_email) = self.users.get(&id).map(|u| u.user.email.clone()) else {
            return Ok(None);
        };

        if old_email != email {
            match self.emails.entry(email.to_string()) {
                Entry::Occupied(_) => {
                    return Err(StoreError::Conflict("Email already registered".into()));
                }
                Entry::Vacant(slot) => {
                    slot.insert(id);
                }
            }
            self.emails.remove(&old_email);
        }

        let Some(mut entry) = self.users.get_mut(&id) else {
            return Ok(None);
        };
        entry.user.email = email.to_string();
        entry.user.updated_at = Utc::now();
        entry.password_hash = password_hash.to_string();
        Ok(Some(entry.user.clone()))
    }

    async fn upgrade_user(&self, id: Uuid) -> Result<bool, StoreError> {
        match self.users.get_mut(&id) {
            Some(mut entry) => {
                entry.user.is_chirpy_red = true;
                entry.user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_all_users(&self) -> Result<u64, StoreError> {
        let count = self.users.len() as u64;
        self.chirps.clear();
        self.refresh_tokens.clear();
        self.emails.clear();
        self.users.clear();
        Ok(count)
    }
}

#[async_trait]
impl RefreshTokenStore for MemoryStore {
    async fn insert_refresh_token(&self, record: &RefreshTokenRecord) -> Result<(), StoreError> {
        match self.refresh_tokens.entry(record.token_hash.clone()) {
            Entry::Occupied(_) => Err(StoreError::Conflict("Refresh token already exists".into())),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(())
            }
        }
    }

    async fn find_refresh_token(
        &self,
        token_hash: &str,
    ) -> Result<Option<RefreshTokenRecord>, StoreError> {
        Ok(self.refresh_tokens.get(token_hash).map(|r| r.value().clone()))
    }

    async fn revoke_refresh_token(
        &self,
        token_hash: &str,
        at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        match self.refresh_tokens.get_mut(token_hash) {
            Some(mut record) => {
                record.revoked_at.get_or_insert(at);
                record.updated_at = at;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl ChirpStore for MemoryStore {
    async fn create_chirp(&self, user_id: Uuid, body: &str) -> Result<Chirp, StoreError> {
        // Hold the author's entry so a concurrent delete cannot orphan the chirp.
        let Some(_author) = self.users.get(&user_id) else {
            return Err(StoreError::UnknownUser);
        };
        let now = Utc::now();
        let chirp = Chirp {
            id: uuidv7(),
            created_at: now,
            updated_at: now,
            body: body.to_string(),
            user_id,
        };
        self.chirps.insert(chirp.id, chirp.clone());
        Ok(chirp)
    }

    async fn list_chirps(
        &self,
        author_id: Option<Uuid>,
        order: SortOrder,
    ) -> Result<Vec<Chirp>, StoreError> {
        let mut chirps: Vec<Chirp> = self
            .chirps
            .iter()
            .filter(|c| author_id.is_none_or(|a| c.user_id == a))
            .map(|c| c.value().clone())
            .collect();
        chirps.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        if order == SortOrder::Desc {
            chirps.reverse();
        }
        Ok(chirps)
    }

    async fn get_chirp(&self, id: Uuid) -> Result<Option<Chirp>, StoreError> {
        Ok(self.chirps.get(&id).map(|c| c.value().clone()))
    }

    async fn delete_chirp(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.chirps.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_user_rejects_duplicate_email() {
        let store = MemoryStore::new();
        store.create_user("a@b.com", "hash").await.unwrap();
        let err = store.create_user("a@b.com", "hash").await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn find_user_by_email_returns_hash() {
        let store = MemoryStore::new();
        let user = store.create_user("a@b.com", "hash").await.unwrap();
        let found = store.find_user_by_email("a@b.com").await.unwrap().unwrap();
        assert_eq!(found.user, user);
        assert_eq!(found.password_hash, "hash");
        assert!(store.find_user_by_email("x@y.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_user_moves_email_index() {
        let store = MemoryStore::new();
        let user = store.create_user("old@b.com", "h1").await.unwrap();
        let updated = store
            .update_user(user.id, "new@b.com", "h2")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.email, "new@b.com");
        assert!(store.find_user_by_email("old@b.com").await.unwrap().is_none());
        let found = store.find_user_by_email("new@b.com").await.unwrap().unwrap();
        assert_eq!(found.password_hash, "h2");
        // The old address is free again.
        store.create_user("old@b.com", "h3").await.unwrap();
    }

    #[tokio::test]
    async fn update_user_rejects_taken_email() {
        let store = MemoryStore::new();
        let a = store.create_user("a@b.com", "h").await.unwrap();
        store.create_user("c@d.com", "h").await.unwrap();
        let err = store.update_user(a.id, "c@d.com", "h").await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn upgrade_unknown_user_returns_false() {
        let store = MemoryStore::new();
        assert!(!store.upgrade_user(Uuid::new_v4()).await.unwrap());
        let user = store.create_user("a@b.com", "h").await.unwrap();
        assert!(store.upgrade_user(user.id).await.unwrap());
        assert!(store.get_user(user.id).await.unwrap().unwrap().is_chirpy_red);
    }

    #[tokio::test]
    async fn revoke_keeps_first_timestamp() {
        let store = MemoryStore::new();
        let user = store.create_user("a@b.com", "h").await.unwrap();
        let now = Utc::now();
        store
            .insert_refresh_token(&RefreshTokenRecord {
                token_hash: "t".into(),
                user_id: user.id,
                created_at: now,
                updated_at: now,
                expires_at: now + chrono::Duration::days(1),
                revoked_at: None,
            })
            .await
            .unwrap();

        let first = now + chrono::Duration::seconds(1);
        let second = now + chrono::Duration::seconds(2);
        assert!(store.revoke_refresh_token("t", first).await.unwrap());
        assert!(store.revoke_refresh_token("t", second).await.unwrap());
        let record = store.find_refresh_token("t").await.unwrap().unwrap();
        assert_eq!(record.revoked_at, Some(first));
        assert!(!store.revoke_refresh_token("missing", first).await.unwrap());
    }

    #[tokio::test]
    async fn list_chirps_filters_and_orders() {
        let store = MemoryStore::new();
        let a = store.create_user("a@b.com", "h").await.unwrap().id;
        let b = store.create_user("c@d.com", "h").await.unwrap().id;
        let first = store.create_chirp(a, "one").await.unwrap();
        store.create_chirp(b, "two").await.unwrap();
        let third = store.create_chirp(a, "three").await.unwrap();

        let all = store.list_chirps(None, SortOrder::Asc).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].body, "one");
        assert_eq!(all[2].body, "three");

        let only_a = store.list_chirps(Some(a), SortOrder::Asc).await.unwrap();
        assert_eq!(only_a, vec![first.clone(), third.clone()]);

        let newest_first = store.list_chirps(Some(a), SortOrder::Desc).await.unwrap();
        assert_eq!(newest_first, vec![third, first]);

        let all_desc = store.list_chirps(None, SortOrder::Desc).await.unwrap();
        assert_eq!(all_desc.first().map(|c| c.body.as_str()), Some("three"));
        assert_eq!(all_desc.last().map(|c| c.body.as_str()), Some("one"));
    }

    #[tokio::test]
    async fn create_chirp_requires_existing_author() {
        let store = MemoryStore::new();
        let err = store.create_chirp(Uuid::new_v4(), "hello").await.unwrap_err();
        assert!(matches!(err, StoreError::UnknownUser));

        let user = store.create_user("a@b.com", "h").await.unwrap();
        store.delete_all_users().await.unwrap();
        let err = store.create_chirp(user.id, "hello").await.unwrap_err();
        assert!(matches!(err, StoreError::UnknownUser));
        assert!(store.list_chirps(None, SortOrder::Asc).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_all_users_cascades() {
        let store = MemoryStore::new();
        let user = store.create_user("a@b.com", "h").await.unwrap();
        store.create_chirp(user.id, "hello").await.unwrap();
        assert_eq!(store.delete_all_users().await.unwrap(), 1);
        assert!(store.list_chirps(None, SortOrder::Asc).await.unwrap().is_empty());
        assert!(store.find_user_by_email("a@b.com").await.unwrap().is_none());
    }
}
