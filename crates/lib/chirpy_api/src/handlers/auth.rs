//! Login, refresh and revoke handlers.

use axum::Json;
use axum::extract::State;
use axum_extra::extract::WithRejection;
use axum::http::{HeaderMap, StatusCode};
use chirpy_core::auth::AuthError;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{LoginRequest, LoginResponse, TokenResponse};

/// On the refresh endpoints a bad header is a client syntax error, not a
/// failed authentication.
fn header_error_as_bad_request(e: AuthError) -> AppError {
    match e {
        AuthError::MissingHeader | AuthError::MalformedHeader => {
            AppError::BadRequest(e.to_string())
        }
        other => AppError::from(other),
    }
}

/// `POST /api/login`: authenticate with email + password.
pub async fn login_handler(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<LoginRequest>, AppError>,
) -> AppResult<Json<LoginResponse>> {
    if body.email.is_empty() {
        return Err(AppError::BadRequest("Empty email".into()));
    }

    let outcome = state
        .gate
        .login(
            &*state.store,
            &body.email,
            &body.password,
            body.expires_in_seconds,
        )
        .await?;

    Ok(Json(LoginResponse {
        user: outcome.user.into(),
        token: outcome.access_token,
        refresh_token: outcome.refresh_token,
    }))
}

/// `POST /api/refresh`: exchange a refresh token for a new access token.
pub async fn refresh_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<TokenResponse>> {
    let token = state
        .gate
        .refresh(&*state.store, &headers)
        .await
        .map_err(header_error_as_bad_request)?;
    Ok(Json(TokenResponse { token }))
}

/// `POST /api/revoke`: revoke a refresh token.
pub async fn revoke_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<StatusCode> {
    state
        .gate
        .revoke(&*state.store, &headers)
        .await
        .map_err(|e| match e {
            AuthError::NotFound => AppError::BadRequest("Couldn't revoke refresh token".into()),
            other => header_error_as_bad_request(other),
        })?;
    Ok(StatusCode::NO_CONTENT)
}
