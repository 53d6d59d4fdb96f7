//! User registration and profile update handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use axum_extra::extract::WithRejection;
use chirpy_core::auth::password;
use tracing::info;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{CredentialsRequest, UserResponse};

/// Hash on the blocking pool.
async fn hash_password(state: &AppState, plain: String) -> AppResult<String> {
    let cost = state.config.bcrypt_cost;
    tokio::task::spawn_blocking(move || password::hash_password_with_cost(&plain, cost))
        .await
        .map_err(|e| AppError::Internal(format!("hashing task: {e}")))?
        .map_err(AppError::from)
}

/// `POST /api/users`: create a new user account.
pub async fn create_user_handler(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<CredentialsRequest>, AppError>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    if body.email.is_empty() {
        return Err(AppError::BadRequest("Empty email".into()));
    }

    let hash = hash_password(&state, body.password).await?;
    let user = state.store.create_user(&body.email, &hash).await?;

    info!(user_id = %user.id, "user registered");
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// `PUT /api/users`: change the caller's email and password.
pub async fn update_user_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
    WithRejection(Json(body), _): WithRejection<Json<CredentialsRequest>, AppError>,
) -> AppResult<Json<UserResponse>> {
    if body.email.is_empty() {
        return Err(AppError::BadRequest("Empty email".into()));
    }

    let hash = hash_password(&state, body.password).await?;
    let user = state
        .store
        .update_user(user_id, &body.email, &hash)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    info!(%user_id, "user updated");
    Ok(Json(user.into()))
}
