//! Application error types.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chirpy_core::auth::AuthError;
use chirpy_core::chirps::ChirpError;
use chirpy_core::store::StoreError;
use thiserror::Error;
use tracing::{debug, error};

use crate::models::ErrorResponse;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::BadRequest(m)
            | AppError::Unauthorized(m)
            | AppError::Forbidden(m)
            | AppError::NotFound(m) => m,
            AppError::Internal(cause) => {
                error!(%cause, "responding with 5XX error");
                "Internal server error".to_string()
            }
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict(msg) => AppError::BadRequest(msg),
            StoreError::UnknownUser => AppError::NotFound(e.to_string()),
            StoreError::Db(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::MissingHeader | AuthError::MalformedHeader => {
                AppError::Unauthorized(e.to_string())
            }
            AuthError::BadSignature
            | AuthError::Expired
            | AuthError::Malformed
            | AuthError::NotFound
            | AuthError::Revoked => {
                debug!(reason = %e, "rejecting token");
                AppError::Unauthorized("Invalid or expired token".into())
            }
            AuthError::CredentialMismatch | AuthError::InvalidApiKey => {
                AppError::Unauthorized(e.to_string())
            }
            AuthError::Forbidden => AppError::Forbidden(e.to_string()),
            AuthError::HashingError(msg) | AuthError::Internal(msg) => AppError::Internal(msg),
            AuthError::Store(e) => AppError::from(e),
        }
    }
}

/// Body decode failures keep the JSON error shape instead of axum's plain text.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        debug!(status = %rejection.status(), "rejecting request body");
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<ChirpError> for AppError {
    fn from(e: ChirpError) -> Self {
        AppError::BadRequest(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_failures_share_one_message() {
        let messages: Vec<String> = [
            AuthError::BadSignature,
            AuthError::Expired,
            AuthError::Malformed,
            AuthError::Revoked,
            AuthError::NotFound,
        ]
        .into_iter()
        .map(|e| match AppError::from(e) {
            AppError::Unauthorized(m) => m,
            other => panic!("unexpected {other:?}"),
        })
        .collect();
        assert!(messages.iter().all(|m| m == &messages[0]));
    }

    #[test]
    fn status_mapping() {
        assert_eq!(
            AppError::from(AuthError::MissingHeader).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::from(AuthError::Forbidden).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::from(AuthError::HashingError("boom".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::from(StoreError::Conflict("dup".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(ChirpError::TooLong).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(StoreError::UnknownUser).status(),
            StatusCode::NOT_FOUND
        );
    }
}
