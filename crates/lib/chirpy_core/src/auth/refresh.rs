//! Opaque refresh tokens.
//!
//! A refresh token is 256 random bits rendered as 64 lowercase hex chars.
//! Stores only ever see its SHA-256 digest. A record resolves to its owner
//! until it expires or is revoked; revocation is permanent.

use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};
use tracing::debug;
use uuid::Uuid;

use super::AuthError;
use crate::models::auth::RefreshTokenRecord;
use crate::store::RefreshTokenStore;

/// Bytes of entropy per token.
pub const REFRESH_TOKEN_BYTES: usize = 32;

/// Refresh token lifetime: 60 days.
pub const REFRESH_TOKEN_EXPIRY_DAYS: i64 = 60;

/// Generate a new refresh token from the thread-local CSPRNG.
pub fn mint_refresh_token() -> String {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// SHA-256 hash a refresh token for storage.
pub fn hash_refresh_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Persist a freshly minted token for `user_id`, expiring
/// [`REFRESH_TOKEN_EXPIRY_DAYS`] after `now`.
pub async fn persist_refresh_token<S>(
    store: &S,
    token: &str,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> Result<RefreshTokenRecord, AuthError>
where
    S: RefreshTokenStore + ?Sized,
{
    let record = RefreshTokenRecord {
        token_hash: hash_refresh_token(token),
        user_id,
        created_at: now,
        updated_at: now,
        expires_at: now + Duration::days(REFRESH_TOKEN_EXPIRY_DAYS),
        revoked_at: None,
    };
    store.insert_refresh_token(&record).await?;
    Ok(record)
}

/// Resolve a refresh token to its owner.
pub async fn resolve_refresh_token<S>(store: &S, token: &str) -> Result<Uuid, AuthError>
where
    S: RefreshTokenStore + ?Sized,
{
    resolve_refresh_token_at(store, token, Utc::now()).await
}

/// [`resolve_refresh_token`] with an explicit clock.
pub async fn resolve_refresh_token_at<S>(
    store: &S,
    token: &str,
    now: DateTime<Utc>,
) -> Result<Uuid, AuthError>
where
    S: RefreshTokenStore + ?Sized,
{
    let record = store
        .find_refresh_token(&hash_refresh_token(token))
        .await?
        .ok_or(AuthError::NotFound)?;

    if record.expires_at <= now {
        debug!(user_id = %record.user_id, "refresh token expired");
        return Err(AuthError::Expired);
    }
    if record.revoked_at.is_some() {
        debug!(user_id = %record.user_id, "refresh token revoked");
        return Err(AuthError::Revoked);
    }
    Ok(record.user_id)
}

/// Revoke a refresh token. Revoking twice succeeds; an unknown token is
/// [`AuthError::NotFound`].
pub async fn revoke_refresh_token<S>(store: &S, token: &str) -> Result<(), AuthError>
where
    S: RefreshTokenStore + ?Sized,
{
    if store
        .revoke_refresh_token(&hash_refresh_token(token), Utc::now())
        .await?
    {
        Ok(())
    } else {
        Err(AuthError::NotFound)
    }
}
