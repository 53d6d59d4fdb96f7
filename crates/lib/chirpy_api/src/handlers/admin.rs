//! Operational endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use tracing::warn;

use crate::AppState;
use crate::error::{AppError, AppResult};

/// `GET /api/healthz`: readiness probe.
pub async fn healthz() -> &'static str {
    "OK"
}

/// `POST /admin/reset`: delete every user. Only allowed on the dev platform.
pub async fn reset_handler(State(state): State<AppState>) -> AppResult<(StatusCode, String)> {
    if !state.config.is_dev() {
        return Err(AppError::Forbidden(
            "Reset is only allowed in dev environment".into(),
        ));
    }

    let deleted = state.store.delete_all_users().await?;
    warn!(deleted, "all users deleted");
    Ok((StatusCode::OK, format!("Deleted {deleted} users")))
}
