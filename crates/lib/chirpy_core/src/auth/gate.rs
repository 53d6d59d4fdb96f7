//! Authorization gate.
//!
//! The fixed decision sequences the HTTP handlers run: login, access-token
//! authentication, ownership checks, refresh, revoke and the webhook API-key
//! check. The gate holds only immutable configuration; all mutable state
//! lives in the store passed to each call.

use std::fmt;

use chrono::{Duration, Utc};
use http::HeaderMap;
use tracing::{debug, info};
use uuid::Uuid;

use super::{AuthError, header, jwt, password, refresh};
use crate::models::auth::User;
use crate::store::{RefreshTokenStore, UserStore};

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

/// Per-request authorization verdicts.
#[derive(Clone)]
pub struct AuthGate {
    signing_secret: Vec<u8>,
    api_key: String,
}

impl fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthGate")
            .field("signing_secret", &"<redacted>")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl AuthGate {
    pub fn new(signing_secret: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            signing_secret: signing_secret.into().into_bytes(),
            api_key: api_key.into(),
        }
    }

    /// Authenticate with email + password and issue a token pair.
    ///
    /// Unknown email and wrong password both yield
    /// [`AuthError::CredentialMismatch`]. `requested_ttl_secs` can shorten
    /// the access token lifetime but never extend it. The bcrypt check runs
    /// on the blocking pool.
    pub async fn login<S>(
        &self,
        store: &S,
        email: &str,
        password: &str,
        requested_ttl_secs: Option<i64>,
    ) -> Result<LoginOutcome, AuthError>
    where
        S: UserStore + RefreshTokenStore + ?Sized,
    {
        let Some(record) = store.find_user_by_email(email).await? else {
            debug!("login rejected: unknown email");
            return Err(AuthError::CredentialMismatch);
        };

        let plain = password.to_string();
        let digest = record.password_hash.clone();
        let checked =
            tokio::task::spawn_blocking(move || password::check_password(&plain, &digest))
                .await
                .map_err(|e| AuthError::Internal(format!("password check task: {e}")))?;
        if let Err(e) = checked {
            debug!(user_id = %record.user.id, "login rejected: password mismatch");
            return Err(e);
        }

        let ttl = jwt::clamp_ttl(requested_ttl_secs);
        let access_token = self.issue_access_token(record.user.id, ttl)?;

        let refresh_token = refresh::mint_refresh_token();
        refresh::persist_refresh_token(store, &refresh_token, record.user.id, Utc::now()).await?;

        info!(user_id = %record.user.id, ttl_secs = ttl.num_seconds(), "user logged in");
        Ok(LoginOutcome {
            user: record.user,
            access_token,
            refresh_token,
        })
    }

    /// Sign an access token for `user_id`.
    pub fn issue_access_token(&self, user_id: Uuid, ttl: Duration) -> Result<String, AuthError> {
        jwt::issue_access_token(user_id, &self.signing_secret, ttl)
    }

    /// Resolve the caller from `Authorization: Bearer <access token>`.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<Uuid, AuthError> {
        let token = header::bearer_token(headers)?;
        jwt::validate_access_token(&token, &self.signing_secret)
    }

    /// Require that `identity` owns a resource belonging to `owner`.
    pub fn authorize_owner(identity: Uuid, owner: Uuid) -> Result<(), AuthError> {
        if identity == owner {
            Ok(())
        } else {
            Err(AuthError::Forbidden)
        }
    }

    /// Exchange `Authorization: Bearer <refresh token>` for a new access
    /// token. The refresh token itself is not rotated.
    pub async fn refresh<S>(&self, store: &S, headers: &HeaderMap) -> Result<String, AuthError>
    where
        S: RefreshTokenStore + ?Sized,
    {
        let token = header::bearer_token(headers)?;
        let user_id = refresh::resolve_refresh_token(store, &token).await?;
        debug!(%user_id, "refreshing access token");
        self.issue_access_token(user_id, Duration::seconds(jwt::ACCESS_TOKEN_MAX_TTL_SECS))
    }

    /// Revoke the refresh token in `Authorization: Bearer <refresh token>`.
    pub async fn revoke<S>(&self, store: &S, headers: &HeaderMap) -> Result<(), AuthError>
    where
        S: RefreshTokenStore + ?Sized,
    {
        let token = header::bearer_token(headers)?;
        refresh::revoke_refresh_token(store, &token).await?;
        info!("refresh token revoked");
        Ok(())
    }

    /// Check `Authorization: ApiKey <key>` against the configured key.
    pub fn check_api_key(&self, headers: &HeaderMap) -> Result<(), AuthError> {
        let key = header::api_key(headers)?;
        if constant_time_eq(key.as_bytes(), self.api_key.as_bytes()) {
            Ok(())
        } else {
            Err(AuthError::InvalidApiKey)
        }
    }
}

/// Compare two byte strings without short-circuiting on the first difference.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
