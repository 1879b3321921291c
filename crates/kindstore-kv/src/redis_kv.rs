//! Redis backend.
//!
//! Uses `deadpool-redis` for async connection pooling. Every trait method is
//! a single Redis command, so the atomicity of `incr` is that of `INCR`.

use async_trait::async_trait;
use deadpool_redis::{Config as PoolConfig, Connection, Pool, Runtime};
use redis::AsyncCommands;
use tracing::debug;

use crate::config::RedisConfig;
use crate::error::{KvError, KvResult};
use crate::pattern::KeyPattern;
use crate::traits::KvBackend;

/// Pooled Redis implementation of [`KvBackend`].
pub struct RedisKv {
    config: RedisConfig,
    pool: Pool,
}

impl RedisKv {
    /// Build the pool and verify a connection can be obtained.
    pub async fn connect(config: RedisConfig) -> KvResult<Self> {
        debug!(url = %config.url, pool_size = config.pool_size, "connecting redis backend");

        let pool = PoolConfig::from_url(&config.url)
            .builder()
            .map_err(|e| KvError::Connection(format!("invalid pool config: {e}")))?
            .max_size(config.pool_size)
            .runtime(Runtime::Tokio1)
            .build()
            .map_err(|e| KvError::Connection(format!("failed to build pool: {e}")))?;

        let kv = Self { config, pool };
        drop(kv.conn().await?);
        Ok(kv)
    }

    pub fn config(&self) -> &RedisConfig {
        &self.config
    }

    async fn conn(&self) -> KvResult<Connection> {
        self.pool
            .get()
            .await
            .map_err(|e| KvError::Connection(e.to_string()))
    }
}

fn command_error(command: &'static str) -> impl FnOnce(redis::RedisError) -> KvError {
    move |e| KvError::Command {
        command,
        reason: e.to_string(),
    }
}

#[async_trait]
impl KvBackend for RedisKv {
    async fn incr(&self, key: &str) -> KvResult<i64> {
        let mut conn = self.conn().await?;
        conn.incr::<_, _, i64>(key, 1)
            .await
            .map_err(command_error("INCR"))
    }

    async fn get(&self, key: &str) -> KvResult<Option<Vec<u8>>> {
        let mut conn = self.conn().await?;
        conn.get::<_, Option<Vec<u8>>>(key)
            .await
            .map_err(command_error("GET"))
    }

    async fn set(&self, key: &str, value: &[u8]) -> KvResult<()> {
        let mut conn = self.conn().await?;
        conn.set::<_, _, ()>(key, value)
            .await
            .map_err(command_error("SET"))
    }

    async fn delete(&self, key: &str) -> KvResult<bool> {
        let mut conn = self.conn().await?;
        let removed = conn
            .del::<_, i64>(key)
            .await
            .map_err(command_error("DEL"))?;
        Ok(removed > 0)
    }

    async fn keys(&self, pattern: &KeyPattern) -> KvResult<Vec<String>> {
        let glob = pattern.to_glob();
        let mut conn = self.conn().await?;
        conn.keys::<_, Vec<String>>(glob.as_str())
            .await
            .map_err(command_error("KEYS"))
    }

    async fn exists(&self, key: &str) -> KvResult<bool> {
        let mut conn = self.conn().await?;
        conn.exists::<_, bool>(key)
            .await
            .map_err(command_error("EXISTS"))
    }
}

impl std::fmt::Debug for RedisKv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisKv")
            .field("url", &self.config.url)
            .finish()
    }
}
