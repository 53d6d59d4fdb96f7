//! Polka payment webhooks.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use tracing::{debug, info};
use uuid::Uuid;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{USER_UPGRADED_EVENT, WebhookRequest};

/// `POST /api/polka/webhooks`: upgrade a user to Chirpy Red.
///
/// The API key is checked before the body is parsed. Events other than
/// `user.upgraded` are acknowledged and ignored.
pub async fn polka_webhook_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<StatusCode> {
    state.gate.check_api_key(&headers)?;

    let payload: WebhookRequest = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid webhook payload: {e}")))?;

    if payload.event != USER_UPGRADED_EVENT {
        debug!(event = %payload.event, "ignoring webhook event");
        return Ok(StatusCode::NO_CONTENT);
    }

    let user_id = Uuid::parse_str(&payload.data.user_id)
        .map_err(|_| AppError::BadRequest("Invalid user ID".into()))?;

    if !state.store.upgrade_user(user_id).await? {
        return Err(AppError::NotFound("Couldn't find user".into()));
    }

    info!(%user_id, "user upgraded to Chirpy Red");
    Ok(StatusCode::NO_CONTENT)
}
