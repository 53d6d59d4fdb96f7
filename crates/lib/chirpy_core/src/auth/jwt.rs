//! JWT access token generation and verification.
//!
//! Tokens are HS256-signed and carry `{iss, sub, iat, exp}` only. They are
//! never persisted: validity is the signature plus the expiry, checked with
//! no leeway.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::debug;
use uuid::Uuid;

use super::AuthError;
use crate::models::auth::TokenClaims;

/// Value of the `iss` claim on every access token.
pub const ISSUER: &str = "chirpy";

/// Access token lifetime, and the ceiling for client-requested lifetimes.
pub const ACCESS_TOKEN_MAX_TTL_SECS: i64 = 60 * 60;

/// Resolve a client-requested lifetime in seconds.
///
/// Requests may only shorten the lifetime: a missing, non-positive or
/// too-large value yields the maximum.
pub fn clamp_ttl(requested_secs: Option<i64>) -> Duration {
    let secs = match requested_secs {
        Some(s) if s > 0 && s <= ACCESS_TOKEN_MAX_TTL_SECS => s,
        _ => ACCESS_TOKEN_MAX_TTL_SECS,
    };
    Duration::seconds(secs)
}

/// Generate a signed JWT access token for `user_id`, valid for `ttl`.
pub fn issue_access_token(user_id: Uuid, secret: &[u8], ttl: Duration) -> Result<String, AuthError> {
    issue_access_token_at(user_id, secret, ttl, Utc::now())
}

/// [`issue_access_token`] with an explicit clock. Identical inputs produce
/// identical tokens.
pub fn issue_access_token_at(
    user_id: Uuid,
    secret: &[u8],
    ttl: Duration,
    now: DateTime<Utc>,
) -> Result<String, AuthError> {
    let iat = now.timestamp();
    let claims = TokenClaims {
        iss: ISSUER.to_string(),
        sub: user_id.to_string(),
        iat,
        exp: iat + ttl.num_seconds(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| AuthError::Internal(format!("jwt encode: {e}")))
}

/// Verify a JWT access token, returning the user it was issued to.
pub fn validate_access_token(token: &str, secret: &[u8]) -> Result<Uuid, AuthError> {
    validate_access_token_at(token, secret, Utc::now())
}

/// [`validate_access_token`] with an explicit clock.
///
/// Checks run in order: signature, expiry (`exp <= now` is expired), issuer
/// and subject shape.
pub fn validate_access_token_at(
    token: &str,
    secret: &[u8],
    now: DateTime<Utc>,
) -> Result<Uuid, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    // Expiry is checked below so that `exp == now` counts as expired.
    validation.validate_exp = false;
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);

    let claims = decode::<TokenClaims>(token, &DecodingKey::from_secret(secret), &validation)
        .map_err(|e| match e.kind() {
            ErrorKind::InvalidSignature => AuthError::BadSignature,
            kind => {
                debug!(?kind, "rejecting unparseable access token");
                AuthError::Malformed
            }
        })?
        .claims;

    if claims.exp <= now.timestamp() {
        return Err(AuthError::Expired);
    }
    if claims.iss != ISSUER {
        return Err(AuthError::Malformed);
    }
    Uuid::parse_str(&claims.sub).map_err(|_| AuthError::Malformed)
}
