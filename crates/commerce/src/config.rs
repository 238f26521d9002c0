//! Commerce configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CARTWHEEL_REDIS_URL` - Redis connection string for the score store
//!
//! ## Optional
//! - `CARTWHEEL_DATABASE_URL` - `PostgreSQL` connection string for the
//!   catalog backend (falls back to generic `DATABASE_URL`)
//! - `CARTWHEEL_CART_SESSION_KEY` - Session slot name for the cart
//!   (default: `cart`)

use secrecy::SecretString;
use thiserror::Error;

/// Default session slot name holding the serialized cart.
pub const DEFAULT_CART_SESSION_KEY: &str = "cart";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
}

/// Commerce configuration.
#[derive(Debug, Clone)]
pub struct CommerceConfig {
    /// Redis connection URL for the score store (may contain a password)
    pub redis_url: SecretString,
    /// `PostgreSQL` connection URL for the catalog backend, if configured
    pub database_url: Option<SecretString>,
    /// Session slot name holding the serialized cart
    pub cart_session_key: String,
}

impl CommerceConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let redis_url = get_required_secret("CARTWHEEL_REDIS_URL")?;
        let database_url = get_database_url("CARTWHEEL_DATABASE_URL");
        let cart_session_key =
            get_env_or_default("CARTWHEEL_CART_SESSION_KEY", DEFAULT_CART_SESSION_KEY);

        Ok(Self {
            redis_url,
            database_url,
            cart_session_key,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    Ok(SecretString::from(value))
}

/// Get the database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Option<SecretString> {
    std::env::var(primary_key)
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
        .map(SecretString::from)
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
