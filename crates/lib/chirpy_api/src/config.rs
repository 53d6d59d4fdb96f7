//! API server configuration.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Platform name that unlocks destructive dev-only endpoints.
pub const DEV_PLATFORM: &str = "dev";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set to a non-empty value")]
    Missing(&'static str),

    #[error("bcrypt cost must be between 4 and 31, got {0}")]
    BcryptCost(u32),
}

/// Configuration for the API server.
#[derive(Clone)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "0.0.0.0:8080").
    pub bind_addr: String,
    /// JWT signing secret.
    pub jwt_secret: String,
    /// API key expected on Polka webhooks.
    pub polka_key: String,
    /// Deployment platform; `dev` enables `POST /admin/reset`.
    pub platform: String,
    /// Directory served under `/app`.
    pub file_root: PathBuf,
    /// bcrypt cost for new password hashes.
    pub bcrypt_cost: u32,
}

impl ApiConfig {
    /// Fail fast on configuration the server cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Missing("JWT_SECRET"));
        }
        if self.polka_key.trim().is_empty() {
            return Err(ConfigError::Missing("POLKA_KEY"));
        }
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(ConfigError::BcryptCost(self.bcrypt_cost));
        }
        Ok(())
    }

    pub fn is_dev(&self) -> bool {
        self.platform == DEV_PLATFORM
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("bind_addr", &self.bind_addr)
            .field("jwt_secret", &"<redacted>")
            .field("polka_key", &"<redacted>")
            .field("platform", &self.platform)
            .field("file_root", &self.file_root)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}
