//! Redis-backed stores: rate-limit counters and revoked refresh tokens.

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client, RedisError};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use crate::config::{Config, CACHE_PREFIX_BANNED_TOKEN, CACHE_PREFIX_RATE_LIMIT};
use crate::errors::{AppError, AppResult};

/// Windowed request counter behind the rate limiter.
///
/// A counter is created with TTL = window on the first call of a window and
/// incremented afterwards; expiry is the store's responsibility.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Current count for `key`, 0 when no window is open.
    async fn current(&self, key: &str) -> AppResult<u64>;

    /// Record one call: open a window with count 1, or increment an
    /// existing one.
    async fn record(&self, key: &str, window_seconds: u64) -> AppResult<()>;
}

/// Revocation set for refresh tokens (by jti).
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait BannedTokenStore: Send + Sync {
    /// Ban a token id for `ttl_seconds` (the token's remaining validity).
    async fn ban(&self, jti: &str, ttl_seconds: u64) -> AppResult<()>;

    async fn is_banned(&self, jti: &str) -> AppResult<bool>;
}

/// Redis cache wrapper with connection pooling.
#[derive(Clone)]
pub struct Cache {
    connection: ConnectionManager,
}

impl Cache {
    /// Create a new cache instance and connect to Redis.
    ///
    /// # Panics
    /// Panics if the Redis connection fails.
    pub async fn connect(config: &Config) -> Self {
        let client = Client::open(config.redis_url.as_str()).expect("Failed to create Redis client");

        let connection = ConnectionManager::new(client)
            .await
            .expect("Failed to connect to Redis");

        tracing::info!("Redis cache connected");

        Self { connection }
    }

    /// Try to connect to Redis, returning an error instead of panicking.
    pub async fn try_connect(config: &Config) -> Result<Self, RedisError> {
        let client = Client::open(config.redis_url.as_str())?;
        let connection = ConnectionManager::new(client).await?;
        Ok(Self { connection })
    }

    /// Round-trip a PING, used by the health endpoint.
    pub async fn ping(&self) -> Result<(), RedisError> {
        let mut conn = self.connection.clone();
        redis::cmd("PING").query_async::<String>(&mut conn).await?;
        Ok(())
    }
}

fn cache_error(e: RedisError) -> AppError {
    AppError::internal(format!("Cache error: {}", e))
}

#[async_trait]
impl CounterStore for Cache {
    async fn current(&self, key: &str) -> AppResult<u64> {
        let key = format!("{}{}", CACHE_PREFIX_RATE_LIMIT, key);
        let mut conn = self.connection.clone();
        let count: Option<i64> = conn.get(&key).await.map_err(cache_error)?;
        Ok(count.unwrap_or(0).max(0) as u64)
    }

    async fn record(&self, key: &str, window_seconds: u64) -> AppResult<()> {
        let key = format!("{}{}", CACHE_PREFIX_RATE_LIMIT, key);
        let mut conn = self.connection.clone();

        let exists: bool = conn.exists(&key).await.map_err(cache_error)?;
        if exists {
            let _: i64 = conn.incr(&key, 1).await.map_err(cache_error)?;
        } else {
            let _: () = conn
                .set_ex(&key, 1i64, window_seconds)
                .await
                .map_err(cache_error)?;
        }
        Ok(())
    }
}

#[async_trait]
impl BannedTokenStore for Cache {
    async fn ban(&self, jti: &str, ttl_seconds: u64) -> AppResult<()> {
        let key = format!("{}{}", CACHE_PREFIX_BANNED_TOKEN, jti);
        let mut conn = self.connection.clone();
        let _: () = conn
            .set_ex(&key, 1i64, ttl_seconds.max(1))
            .await
            .map_err(cache_error)?;
        Ok(())
    }

    async fn is_banned(&self, jti: &str) -> AppResult<bool> {
        let key = format!("{}{}", CACHE_PREFIX_BANNED_TOKEN, jti);
        let mut conn = self.connection.clone();
        let exists: bool = conn.exists(&key).await.map_err(cache_error)?;
        Ok(exists)
    }
}
