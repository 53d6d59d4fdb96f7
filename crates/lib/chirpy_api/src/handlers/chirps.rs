//! Chirp handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use axum_extra::extract::WithRejection;
use chirpy_core::auth::AuthGate;
use chirpy_core::chirps::validate_body;
use chirpy_core::models::chirp::SortOrder;
use tracing::info;
use uuid::Uuid;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{ChirpResponse, CreateChirpRequest, ListChirpsQuery};

fn parse_id(raw: &str, what: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest(format!("Invalid {what}")))
}

/// `POST /api/chirps`: publish a chirp as the caller.
pub async fn create_chirp_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
    WithRejection(Json(body), _): WithRejection<Json<CreateChirpRequest>, AppError>,
) -> AppResult<(StatusCode, Json<ChirpResponse>)> {
    let text = validate_body(&body.body)?;
    let chirp = state.store.create_chirp(user_id, text).await?;
    Ok((StatusCode::CREATED, Json(chirp.into())))
}

/// `GET /api/chirps`: all chirps, optionally by one author. Oldest first
/// unless `sort=desc`.
pub async fn list_chirps_handler(
    State(state): State<AppState>,
    Query(query): Query<ListChirpsQuery>,
) -> AppResult<Json<Vec<ChirpResponse>>> {
    let author_id = match query.author_id.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(parse_id(raw, "author ID")?),
    };
    let order = SortOrder::from_param(query.sort.as_deref());
    let chirps = state.store.list_chirps(author_id, order).await?;
    Ok(Json(chirps.into_iter().map(ChirpResponse::from).collect()))
}

/// `GET /api/chirps/{chirp_id}`: a single chirp.
pub async fn get_chirp_handler(
    State(state): State<AppState>,
    Path(chirp_id): Path<String>,
) -> AppResult<Json<ChirpResponse>> {
    let chirp_id = parse_id(&chirp_id, "chirp ID")?;
    let chirp = state
        .store
        .get_chirp(chirp_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Chirp not found".into()))?;
    Ok(Json(chirp.into()))
}

/// `DELETE /api/chirps/{chirp_id}`: delete one of the caller's chirps.
pub async fn delete_chirp_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
    Path(chirp_id): Path<String>,
) -> AppResult<StatusCode> {
    let chirp_id = parse_id(&chirp_id, "chirp ID")?;
    let chirp = state
        .store
        .get_chirp(chirp_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Chirp not found".into()))?;

    AuthGate::authorize_owner(user_id, chirp.user_id)?;

    if !state.store.delete_chirp(chirp.id).await? {
        return Err(AppError::NotFound("Chirp not found".into()));
    }
    info!(%user_id, %chirp_id, "chirp deleted");
    Ok(StatusCode::NO_CONTENT)
}
