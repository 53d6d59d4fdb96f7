//! Authentication and authorization logic.
//!
//! Password hashing, JWT access tokens, opaque refresh tokens, header
//! credential extraction, and the [`gate::AuthGate`] that composes them for
//! the HTTP handlers.

pub mod gate;
pub mod header;
pub mod jwt;
pub mod password;
pub mod refresh;

use thiserror::Error;

use crate::store::StoreError;

pub use gate::{AuthGate, LoginOutcome};

/// Authentication errors.
///
/// Every variant except [`AuthError::HashingError`], [`AuthError::Internal`]
/// and [`AuthError::Store`] is a client-side failure; callers must not leak the
/// distinction between them beyond a status code.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing authorization header")]
    MissingHeader,

    #[error("Malformed authorization header")]
    MalformedHeader,

    #[error("Token signature mismatch")]
    BadSignature,

    #[error("Token expired")]
    Expired,

    #[error("Malformed token")]
    Malformed,

    #[error("Refresh token not found")]
    NotFound,

    #[error("Refresh token revoked")]
    Revoked,

    #[error("Incorrect email or password")]
    CredentialMismatch,

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Not the owner of this resource")]
    Forbidden,

    #[error("Hashing error: {0}")]
    HashingError(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}
