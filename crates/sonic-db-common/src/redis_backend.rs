//! Redis database backend.
//!
//! One [`RedisDatabase`] wraps one logical database over a
//! `redis::aio::ConnectionManager`. The manager is cheap to clone, so every
//! call works on its own clone and the handle can be shared behind `&self`.

use std::collections::HashMap;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::{debug, info};

use crate::db::{DbId, FieldValues, SonicDb};
use crate::error::{DbError, DbResult};

/// Configuration for a Redis connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedisConfig {
    /// Redis server hostname or IP.
    pub host: String,
    /// Redis server port.
    pub port: u16,
    /// Logical database this connection serves.
    pub db: DbId,
    /// Redis database number (defaults to the standard SONiC layout).
    pub db_number: u32,
}

impl RedisConfig {
    /// Creates a new Redis configuration using the standard database number.
    pub fn new(host: impl Into<String>, port: u16, db: DbId) -> Self {
        Self {
            host: host.into(),
            port,
            db,
            db_number: db.id(),
        }
    }

    /// Overrides the Redis database number.
    pub fn with_db_number(mut self, db_number: u32) -> Self {
        self.db_number = db_number;
        self
    }

    /// Returns the Redis connection URI.
    pub fn uri(&self) -> String {
        format!("redis://{}:{}/{}", self.host, self.port, self.db_number)
    }
}

/// A connected Redis logical database.
#[derive(Clone)]
pub struct RedisDatabase {
    config: RedisConfig,
    connection: ConnectionManager,
}

impl std::fmt::Debug for RedisDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisDatabase")
            .field("config", &self.config)
            .finish()
    }
}

impl RedisDatabase {
    /// Opens a connection to the configured database.
    pub async fn connect(config: RedisConfig) -> DbResult<Self> {
        let uri = config.uri();
        let name = config.db.name();

        let client = redis::Client::open(uri.as_str())
            .map_err(|e| DbError::connection(name, format!("{}: {}", uri, e)))?;

        let connection = ConnectionManager::new(client)
            .await
            .map_err(|e| DbError::connection(name, format!("{}: {}", uri, e)))?;

        info!(
            "Connected to Redis {}:{} ({} db={})",
            config.host, config.port, name, config.db_number
        );

        Ok(Self { config, connection })
    }

    fn command_error(&self, operation: &str, err: redis::RedisError) -> DbError {
        DbError::command(self.config.db.name(), operation, err.to_string())
    }
}

#[async_trait]
impl SonicDb for RedisDatabase {
    fn id(&self) -> DbId {
        self.config.db
    }

    async fn hget(&self, key: &str, field: &str) -> DbResult<Option<String>> {
        let mut conn = self.connection.clone();
        let value: Option<String> = conn
            .hget(key, field)
            .await
            .map_err(|e| self.command_error("hget", e))?;
        Ok(value)
    }

    async fn hgetall(&self, key: &str) -> DbResult<FieldValues> {
        let mut conn = self.connection.clone();
        let fvs: HashMap<String, String> = conn
            .hgetall(key)
            .await
            .map_err(|e| self.command_error("hgetall", e))?;
        Ok(fvs.into_iter().collect())
    }

    async fn keys(&self, pattern: &str) -> DbResult<Vec<String>> {
        let mut conn = self.connection.clone();
        let keys: Vec<String> = conn
            .keys(pattern)
            .await
            .map_err(|e| self.command_error("keys", e))?;
        debug!(pattern, count = keys.len(), "KEYS");
        Ok(keys)
    }

    async fn publish(&self, channel: &str, message: &str) -> DbResult<()> {
        let mut conn = self.connection.clone();
        let receivers: i64 = conn
            .publish(channel, message)
            .await
            .map_err(|e| self.command_error("publish", e))?;
        debug!(channel, receivers, "Published message");
        Ok(())
    }
}
