// SPDX-License-Identifier: MIT OR Apache-2.0

//! Redis document fetcher.
//!
//! Each configuration document is stored whole as a Redis string value under
//! `{namespace}{group}:{data_id}`.

use crate::adapters::runtime::block_on;
use crate::domain::{ConfigError, DataId, Result};
use crate::ports::DocumentFetcher;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client};
use std::time::Duration;

/// Builds `{namespace}{group}:{data_id}`.
pub(crate) fn document_key(namespace: &str, data_id: &DataId, group: &str) -> String {
    format!("{}{}:{}", namespace, group, data_id)
}

/// Rejects namespaces containing glob metacharacters or spaces.
pub(crate) fn validate_namespace(namespace: &str) -> Result<()> {
    if namespace.contains(['*', '?', '[', ']', '\\', ' ']) {
        return Err(ConfigError::ServiceUnavailable {
            message: "Namespace contains invalid characters (* ? [ ] \\ or space)".to_string(),
            source: None,
        });
    }
    Ok(())
}

/// Fetches configuration documents from Redis.
///
/// # Examples
///
/// ```rust,no_run
/// use remotecfg::adapters::RedisFetcher;
///
/// # fn main() -> remotecfg::domain::Result<()> {
/// let fetcher = RedisFetcher::connect("redis://localhost:6379", "config:")?;
/// # Ok(())
/// # }
/// ```
pub struct RedisFetcher {
    /// Multiplexed connection, driven by the shared fetch runtime
    connection: MultiplexedConnection,
    /// Key prefix all documents live under
    namespace: String,
}

impl std::fmt::Debug for RedisFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisFetcher")
            .field("namespace", &self.namespace)
            .finish()
    }
}

impl RedisFetcher {
    /// Connects to Redis.
    ///
    /// # Arguments
    ///
    /// * `url` - Redis connection URL (e.g., `"redis://localhost:6379"`)
    /// * `namespace` - Key prefix for documents (e.g., `"config:"`)
    ///
    /// # Errors
    ///
    /// Returns `ServiceUnavailable` if the URL is invalid or the server cannot
    /// be reached.
    pub fn connect(url: &str, namespace: &str) -> Result<Self> {
        validate_namespace(namespace)?;

        let client = Client::open(url).map_err(|e| ConfigError::ServiceUnavailable {
            message: format!("Failed to create Redis client: {}", e),
            source: Some(Box::new(e)),
        })?;

        let connection =
            block_on(async move { client.get_multiplexed_async_connection().await }).map_err(
                |e| ConfigError::ServiceUnavailable {
                    message: format!("Failed to connect to Redis: {}", e),
                    source: Some(Box::new(e)),
                },
            )?;

        Ok(Self {
            connection,
            namespace: namespace.to_string(),
        })
    }

    /// Returns the Redis key a document is stored under.
    pub fn document_key(&self, data_id: &DataId, group: &str) -> String {
        document_key(&self.namespace, data_id, group)
    }
}

impl DocumentFetcher for RedisFetcher {
    fn name(&self) -> &str {
        "redis"
    }

    fn fetch(&self, data_id: &DataId, group: &str, timeout: Duration) -> Result<Option<Vec<u8>>> {
        let key = self.document_key(data_id, group);
        let mut connection = self.connection.clone();

        let outcome = block_on(async move {
            tokio::time::timeout(timeout, connection.get::<_, Option<Vec<u8>>>(key)).await
        });

        match outcome {
            Err(_) => Err(ConfigError::fetch(
                data_id.as_str(),
                group,
                format!("Redis request timed out after {}ms", timeout.as_millis()),
            )),
            Ok(Err(e)) => Err(ConfigError::FetchError {
                data_id: data_id.to_string(),
                group: group.to_string(),
                message: format!("Redis request failed: {}", e),
                source: Some(Box::new(e)),
            }),
            Ok(Ok(document)) => Ok(document),
        }
    }
}
