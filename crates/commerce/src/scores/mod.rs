//! Sorted-set score store abstraction.
//!
//! The recommender needs a minimal subset of a Redis-like command set:
//! per-key score increment, descending range, union-store into a temporary
//! key, member removal, and key deletion. Individual commands are atomic at
//! the store; multi-command sequences are not wrapped in any transaction.

mod memory;
mod redis;

use async_trait::async_trait;

use crate::error::Result;

pub use self::memory::MemoryScoreStore;
pub use self::redis::RedisScoreStore;

/// Per-key score-ordered membership with atomic increment/union operations.
#[async_trait]
pub trait ScoreStore: Send + Sync {
    /// Add `delta` to `member`'s score under `key`, creating both as needed.
    async fn increment(&self, key: &str, member: &str, delta: f64) -> Result<()>;

    /// All members under `key`, ordered by descending score.
    ///
    /// Returns an empty list for an unknown key.
    async fn members_by_score_desc(&self, key: &str) -> Result<Vec<String>>;

    /// Union the sets under `keys` into `dest`, summing scores per member.
    /// Any existing contents of `dest` are replaced.
    async fn union_into(&self, dest: &str, keys: &[String]) -> Result<()>;

    /// Remove `members` from the set under `key`.
    async fn remove_members(&self, key: &str, members: &[String]) -> Result<()>;

    /// Delete `key` entirely.
    async fn delete(&self, key: &str) -> Result<()>;
}
