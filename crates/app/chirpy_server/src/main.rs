//! Chirpy API server binary.
//!
//! Reads configuration from flags and environment (a `.env` file is loaded
//! first), connects to PostgreSQL and runs migrations, then serves the API
//! until interrupted.

use std::path::PathBuf;
use std::sync::Arc;

use chirpy_api::config::ApiConfig;
use chirpy_core::store::{MemoryStore, PgStore, Store};
use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

/// CLI arguments for the API server.
#[derive(Parser, Debug)]
#[command(name = "chirpy_server", about = "Chirpy API server")]
struct Args {
    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 8080)]
    port: u16,

    /// PostgreSQL connection URL.
    #[arg(long, env = "DATABASE_URL", required_unless_present = "in_memory")]
    database_url: Option<String>,

    /// Keep all data in process memory instead of PostgreSQL.
    #[arg(long, default_value_t = false)]
    in_memory: bool,

    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = 5)]
    max_connections: u32,

    /// Secret used to sign access tokens.
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    jwt_secret: String,

    /// API key expected on Polka webhooks.
    #[arg(long, env = "POLKA_KEY", hide_env_values = true)]
    polka_key: String,

    /// Deployment platform; `dev` enables `POST /admin/reset`.
    #[arg(long, env = "PLATFORM", default_value = "prod")]
    platform: String,

    /// Directory served under `/app`.
    #[arg(long, env = "FILE_ROOT", default_value = ".")]
    file_root: PathBuf,

    /// bcrypt cost for new password hashes.
    #[arg(long, env = "BCRYPT_COST", default_value_t = chirpy_core::auth::password::DEFAULT_COST)]
    bcrypt_cost: u32,
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("info,chirpy_api=debug,chirpy_core=debug")
            }),
        )
        .init();

    let args = Args::parse();

    let config = ApiConfig {
        bind_addr: format!("0.0.0.0:{}", args.port),
        jwt_secret: args.jwt_secret,
        polka_key: args.polka_key,
        platform: args.platform,
        file_root: args.file_root,
        bcrypt_cost: args.bcrypt_cost,
    };
    config.validate()?;
    info!(?config, "starting chirpy_server");

    let store: Arc<dyn Store> = match (args.in_memory, args.database_url) {
        (true, _) => {
            warn!("using in-memory store; data is lost on exit");
            Arc::new(MemoryStore::new())
        }
        (false, Some(database_url)) => {
            info!(max_connections = args.max_connections, "connecting to PostgreSQL");
            let pool = PgPoolOptions::new()
                .max_connections(args.max_connections)
                .acquire_timeout(std::time::Duration::from_secs(30))
                .connect(&database_url)
                .await?;

            info!("running database migrations");
            chirpy_core::migrate::migrate(&pool).await?;
            Arc::new(PgStore::new(pool))
        }
        (false, None) => {
            return Err("DATABASE_URL must be set unless --in-memory is given".into());
        }
    };

    let bind_addr = config.bind_addr.clone();
    let state = chirpy_api::AppState::new(store, config);
    let app = chirpy_api::router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = %listener.local_addr()?, "REST API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
