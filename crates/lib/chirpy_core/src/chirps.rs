//! Chirp body rules.

use thiserror::Error;

/// Longest accepted chirp, in characters.
pub const MAX_CHIRP_LENGTH: usize = 140;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChirpError {
    #[error("Chirp is empty")]
    Empty,

    #[error("Chirp is too long")]
    TooLong,
}

/// Validate a chirp body, returning it unchanged when acceptable.
pub fn validate_body(body: &str) -> Result<&str, ChirpError> {
    if body.trim().is_empty() {
        return Err(ChirpError::Empty);
    }
    if body.chars().count() > MAX_CHIRP_LENGTH {
        return Err(ChirpError::TooLong);
    }
    Ok(body)
}
