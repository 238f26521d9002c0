//! Redis score store implementation.
//!
//! Each operation grabs a multiplexed async connection and issues one
//! command. Connectivity failures propagate to the caller - callers get no
//! retries and no fallback from this layer.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;

use super::ScoreStore;
use crate::error::Result;

/// Sorted-set store backed by Redis.
///
/// The client handle is injected at construction and scoped to the
/// application's lifetime; this module holds no process-wide connection.
#[derive(Clone)]
pub struct RedisScoreStore {
    client: redis::Client,
}

impl RedisScoreStore {
    /// Wrap an existing Redis client.
    #[must_use]
    pub const fn new(client: redis::Client) -> Self {
        Self { client }
    }

    /// Create a store from a connection URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not a valid Redis connection string.
    pub fn from_url(url: &str) -> Result<Self> {
        Ok(Self::new(redis::Client::open(url)?))
    }

    async fn connection(&self) -> Result<MultiplexedConnection> {
        Ok(self.client.get_multiplexed_async_connection().await?)
    }
}

#[async_trait]
impl ScoreStore for RedisScoreStore {
    async fn increment(&self, key: &str, member: &str, delta: f64) -> Result<()> {
        let mut conn = self.connection().await?;

        let _new_score: f64 = redis::cmd("ZINCRBY")
            .arg(key)
            .arg(delta)
            .arg(member)
            .query_async(&mut conn)
            .await?;

        Ok(())
    }

    async fn members_by_score_desc(&self, key: &str) -> Result<Vec<String>> {
        let mut conn = self.connection().await?;

        let members: Vec<String> = redis::cmd("ZREVRANGE")
            .arg(key)
            .arg(0)
            .arg(-1)
            .query_async(&mut conn)
            .await?;

        Ok(members)
    }

    async fn union_into(&self, dest: &str, keys: &[String]) -> Result<()> {
        let mut conn = self.connection().await?;

        let mut cmd = redis::cmd("ZUNIONSTORE");
        cmd.arg(dest).arg(keys.len());
        for key in keys {
            cmd.arg(key);
        }
        let _cardinality: i64 = cmd.query_async(&mut conn).await?;

        Ok(())
    }

    async fn remove_members(&self, key: &str, members: &[String]) -> Result<()> {
        if members.is_empty() {
            return Ok(());
        }
        let mut conn = self.connection().await?;

        let mut cmd = redis::cmd("ZREM");
        cmd.arg(key);
        for member in members {
            cmd.arg(member);
        }
        let _removed: i64 = cmd.query_async(&mut conn).await?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.connection().await?;

        let _deleted: i64 = redis::cmd("DEL").arg(key).query_async(&mut conn).await?;

        Ok(())
    }
}
