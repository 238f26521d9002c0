//! Session slot abstraction.
//!
//! The hosting framework owns session identity, expiry, and cookie plumbing;
//! this crate only needs one named slot per visitor session, holding the
//! serialized cart blob. Implement [`SessionStore`] over whatever session
//! abstraction the host provides.

mod memory;

use async_trait::async_trait;

use crate::error::Result;

pub use memory::MemorySessionStore;

/// Well-known session slot names.
pub mod keys {
    /// Slot holding the serialized cart.
    pub const CART: &str = "cart";
}

/// Per-session persistent key-value slots.
///
/// A `SessionStore` instance is already scoped to one visitor's session; keys
/// name slots within it, not sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load the raw bytes stored in a slot.
    ///
    /// Returns `Ok(None)` if the slot has never been written (or the session
    /// expired and the framework dropped it).
    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Overwrite a slot with raw bytes.
    async fn save(&self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Delete a slot.
    async fn delete(&self, key: &str) -> Result<()>;
}
