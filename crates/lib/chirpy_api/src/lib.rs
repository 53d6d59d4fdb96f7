//! # chirpy_api
//!
//! HTTP API library for Chirpy.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post, put};
use chirpy_core::auth::AuthGate;
use chirpy_core::store::Store;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::handlers::{admin, auth, chirps, users, webhooks};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Users, chirps and refresh tokens.
    pub store: Arc<dyn Store>,
    /// Credential checks, built from `config`.
    pub gate: Arc<AuthGate>,
    /// API configuration.
    pub config: ApiConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: ApiConfig) -> Self {
        let gate = AuthGate::new(config.jwt_secret.clone(), config.polka_key.clone());
        Self {
            store,
            gate: Arc::new(gate),
            config,
        }
    }
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let require_auth =
        axum::middleware::from_fn_with_state(state.clone(), middleware::auth::require_auth);

    // Reads are public; writes need an access token.
    let api = Router::new()
        .route("/api/healthz", get(admin::healthz))
        .route("/api/login", post(auth::login_handler))
        .route("/api/refresh", post(auth::refresh_handler))
        .route("/api/revoke", post(auth::revoke_handler))
        .route(
            "/api/users",
            post(users::create_user_handler)
                .merge(put(users::update_user_handler).route_layer(require_auth.clone())),
        )
        .route(
            "/api/chirps",
            get(chirps::list_chirps_handler)
                .merge(post(chirps::create_chirp_handler).route_layer(require_auth.clone())),
        )
        .route(
            "/api/chirps/{chirp_id}",
            get(chirps::get_chirp_handler)
                .merge(delete(chirps::delete_chirp_handler).route_layer(require_auth)),
        )
        .route("/api/polka/webhooks", post(webhooks::polka_webhook_handler))
        .route("/admin/reset", post(admin::reset_handler));

    let files = ServeDir::new(&state.config.file_root);

    Router::new()
        .merge(api)
        .nest_service("/app", files)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
