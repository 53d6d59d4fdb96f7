//! Password hashing via bcrypt.

use super::AuthError;

/// bcrypt cost factor used when none is configured.
pub const DEFAULT_COST: u32 = 10;

/// Outcome of checking a password against a stored digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordMatch {
    Match,
    Mismatch,
    /// The stored digest is not a valid bcrypt hash.
    MalformedDigest,
}

impl PasswordMatch {
    pub fn is_match(self) -> bool {
        self == PasswordMatch::Match
    }
}

/// Hash a password with bcrypt at [`DEFAULT_COST`].
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    hash_password_with_cost(password, DEFAULT_COST)
}

/// Hash a password with bcrypt at the given cost (4..=31).
pub fn hash_password_with_cost(password: &str, cost: u32) -> Result<String, AuthError> {
    bcrypt::hash(password, cost).map_err(|e| AuthError::HashingError(format!("bcrypt hash: {e}")))
}

/// Verify a password against a bcrypt hash.
pub fn verify_password(password: &str, hash: &str) -> PasswordMatch {
    match bcrypt::verify(password, hash) {
        Ok(true) => PasswordMatch::Match,
        Ok(false) => PasswordMatch::Mismatch,
        Err(_) => PasswordMatch::MalformedDigest,
    }
}

/// Like [`verify_password`], collapsing both failure kinds into
/// [`AuthError::CredentialMismatch`].
pub fn check_password(password: &str, hash: &str) -> Result<(), AuthError> {
    if verify_password(password, hash).is_match() {
        Ok(())
    } else {
        Err(AuthError::CredentialMismatch)
    }
}
