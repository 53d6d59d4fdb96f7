//! Storage seam for users, chirps and refresh-token records.
//!
//! The auth core never talks to a database directly; it consumes these
//! traits. Every mutating method must be atomic with respect to concurrent
//! readers: a lookup observes either the old record or the new one, never a
//! partially written row.

pub mod memory;
pub mod pg;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::auth::{RefreshTokenRecord, User, UserWithPassword};
use crate::models::chirp::{Chirp, SortOrder};

pub use memory::MemoryStore;
pub use pg::PgStore;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// A record refers to a user that does not exist.
    #[error("User not found")]
    UnknownUser,
}

/// Credential records, keyed by id and unique email.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Create a user. Fails with [`StoreError::Conflict`] if the email is taken.
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, StoreError>;

    async fn find_user_by_email(&self, email: &str)
    -> Result<Option<UserWithPassword>, StoreError>;

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Replace email and password hash. `Ok(None)` if the user does not exist.
    async fn update_user(
        &self,
        id: Uuid,
        email: &str,
        password_hash: &str,
    ) -> Result<Option<User>, StoreError>;

    /// Set the Chirpy Red flag. Returns `false` if the user does not exist.
    async fn upgrade_user(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Delete every user, cascading to their chirps and refresh tokens.
    async fn delete_all_users(&self) -> Result<u64, StoreError>;
}

/// Refresh-token records. Only creation and revocation mutate a record.
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    async fn insert_refresh_token(&self, record: &RefreshTokenRecord) -> Result<(), StoreError>;

    async fn find_refresh_token(
        &self,
        token_hash: &str,
    ) -> Result<Option<RefreshTokenRecord>, StoreError>;

    /// Mark a record revoked at `at`. An already revoked record keeps its
    /// first timestamp. Returns `false` if no record matches.
    async fn revoke_refresh_token(
        &self,
        token_hash: &str,
        at: DateTime<Utc>,
    ) -> Result<bool, StoreError>;
}

/// Chirp records.
#[async_trait]
pub trait ChirpStore: Send + Sync {
    /// Fails with [`StoreError::UnknownUser`] if the author does not exist.
    async fn create_chirp(&self, user_id: Uuid, body: &str) -> Result<Chirp, StoreError>;

    /// All chirps in creation order, optionally restricted to one author.
    async fn list_chirps(
        &self,
        author_id: Option<Uuid>,
        order: SortOrder,
    ) -> Result<Vec<Chirp>, StoreError>;

    async fn get_chirp(&self, id: Uuid) -> Result<Option<Chirp>, StoreError>;

    /// Returns `false` if the chirp did not exist.
    async fn delete_chirp(&self, id: Uuid) -> Result<bool, StoreError>;
}

/// Everything the HTTP layer needs from storage.
pub trait Store: UserStore + RefreshTokenStore + ChirpStore {}

impl<T> Store for T where T: UserStore + RefreshTokenStore + ChirpStore {}
