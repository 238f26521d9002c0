//! Unified error type for commerce operations.
//!
//! All fallible operations in this crate return [`Result`]. Store
//! connectivity failures are surfaced to the caller unmodified - there are no
//! retries and no fallbacks here; a broken recommender backend degrades the
//! pages that depend on it.

use thiserror::Error;

/// Application-level error type for commerce operations.
#[derive(Debug, Error)]
pub enum CommerceError {
    /// The sorted-set store rejected a command or is unreachable.
    #[error("score store error: {0}")]
    ScoreStore(#[from] redis::RedisError),

    /// The session slot could not be read or written.
    #[error("session store error: {0}")]
    SessionStore(String),

    /// The session cart blob failed to (de)serialize.
    #[error("cart serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The product catalog query failed.
    #[cfg(feature = "postgres")]
    #[error("catalog error: {0}")]
    Catalog(#[from] sqlx::Error),

    /// Checkout was attempted on an empty cart.
    #[error("cannot place an order from an empty cart")]
    EmptyCart,
}

/// Result type alias for `CommerceError`.
pub type Result<T> = std::result::Result<T, CommerceError>;
