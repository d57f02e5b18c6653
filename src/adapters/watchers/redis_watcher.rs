// SPDX-License-Identifier: MIT OR Apache-2.0

//! Redis layer watcher.
//!
//! This module provides a watcher that monitors the Redis keys of resolved
//! layers using keyspace notifications (pub/sub).

use crate::adapters::redis::{document_key, validate_namespace};
use crate::domain::{ConfigError, LayerRequest, Result};
use crate::ports::{ChangeCallback, LayerWatcher};
use redis::Client;
use std::collections::HashMap;
use std::sync::mpsc::{channel, Sender};
use std::thread::{self, JoinHandle};

/// Keyspace notification channel prefix for database 0
const KEYSPACE_PREFIX: &str = "__keyspace@0__:";

/// Watcher for changes to layer documents stored in Redis.
///
/// The watcher subscribes to the keyspace channel of each watched layer's
/// key, as laid out by [`RedisFetcher`].
///
/// **Note**: Redis keyspace notifications must be enabled. Set in redis.conf:
/// ```text
/// notify-keyspace-events KEA
/// ```
/// Or call [`RedisWatcher::try_enable_keyspace_notifications`].
///
/// [`RedisFetcher`]: crate::adapters::RedisFetcher
///
/// # Examples
///
/// ```rust,no_run
/// use remotecfg::adapters::RedisWatcher;
/// use remotecfg::domain::{DataId, LayerRequest};
/// use remotecfg::ports::LayerWatcher;
/// use std::sync::Arc;
///
/// # fn main() -> remotecfg::domain::Result<()> {
/// let mut watcher = RedisWatcher::new("redis://localhost:6379", "config:")?;
///
/// let layers = [LayerRequest::new(DataId::from("orders.yaml"), "DEFAULT_GROUP", "yaml")];
/// watcher.watch(&layers, Arc::new(|layer: &LayerRequest| {
///     println!("Layer changed: {}", layer);
/// }))?;
///
/// // Later, stop watching
/// watcher.stop()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct RedisWatcher {
    /// Redis connection URL
    url: String,
    /// Key prefix all documents live under
    namespace: String,
    /// Stop signal sender
    stop_tx: Option<Sender<()>>,
    /// Watch thread handle
    watch_thread: Option<JoinHandle<()>>,
}

impl RedisWatcher {
    /// Creates a new Redis watcher.
    ///
    /// # Arguments
    ///
    /// * `url` - Redis connection URL (e.g., `"redis://localhost:6379"`)
    /// * `namespace` - Key prefix, matching the fetcher's (e.g., `"config:"`)
    ///
    /// # Errors
    ///
    /// Returns `WatcherError` if Redis cannot be reached, or
    /// `ServiceUnavailable` for an invalid namespace.
    pub fn new(url: &str, namespace: &str) -> Result<Self> {
        validate_namespace(namespace)?;

        // Test connection
        let client = Self::client(url)?;
        client
            .get_connection()
            .map_err(|e| ConfigError::WatcherError {
                message: format!("Failed to connect to Redis: {}", e),
                source: Some(Box::new(e)),
            })?;

        tracing::debug!("Redis watcher initialized. Note: keyspace notifications must be enabled manually with: CONFIG SET notify-keyspace-events KEA");

        Ok(Self {
            url: url.to_string(),
            namespace: namespace.to_string(),
            stop_tx: None,
            watch_thread: None,
        })
    }

    fn client(url: &str) -> Result<Client> {
        Client::open(url).map_err(|e| ConfigError::WatcherError {
            message: format!("Failed to create Redis client: {}", e),
            source: Some(Box::new(e)),
        })
    }

    /// Attempts to enable keyspace notifications on the server.
    ///
    /// This sets `notify-keyspace-events` to `KEA` and requires permission to
    /// run `CONFIG SET`.
    pub fn try_enable_keyspace_notifications(&self) -> Result<()> {
        let mut conn = Self::client(&self.url)?
            .get_connection()
            .map_err(|e| ConfigError::WatcherError {
                message: format!("Failed to connect to Redis: {}", e),
                source: Some(Box::new(e)),
            })?;

        redis::cmd("CONFIG")
            .arg("SET")
            .arg("notify-keyspace-events")
            .arg("KEA")
            .query::<()>(&mut conn)
            .map_err(|e| ConfigError::WatcherError {
                message: format!(
                    "Failed to enable keyspace notifications. Enable manually with: CONFIG SET notify-keyspace-events KEA. Error: {}",
                    e
                ),
                source: Some(Box::new(e)),
            })?;

        tracing::info!("Enabled Redis keyspace notifications");
        Ok(())
    }
}

impl LayerWatcher for RedisWatcher {
    fn watch(&mut self, layers: &[LayerRequest], callback: ChangeCallback) -> Result<()> {
        if self.watch_thread.is_some() {
            return Err(ConfigError::WatcherError {
                message: "Watcher is already running".to_string(),
                source: None,
            });
        }

        let watched: HashMap<String, LayerRequest> = layers
            .iter()
            .map(|layer| {
                let key = document_key(&self.namespace, &layer.data_id, &layer.group);
                (format!("{}{}", KEYSPACE_PREFIX, key), layer.clone())
            })
            .collect();
        let channels: Vec<String> = watched.keys().cloned().collect();

        let (stop_tx, stop_rx) = channel();
        self.stop_tx = Some(stop_tx);

        let url = self.url.clone();

        let watch_thread = thread::spawn(move || loop {
            if stop_rx.try_recv().is_ok() {
                tracing::debug!("Redis watcher stopping");
                break;
            }

            let client = match Client::open(url.as_str()) {
                Ok(c) => c,
                Err(e) => {
                    tracing::error!("Failed to create Redis client for watching: {}", e);
                    thread::sleep(std::time::Duration::from_secs(5));
                    continue;
                }
            };

            let mut conn = match client.get_connection() {
                Ok(c) => c,
                Err(e) => {
                    tracing::error!("Failed to connect to Redis for watching: {}", e);
                    thread::sleep(std::time::Duration::from_secs(5));
                    continue;
                }
            };

            tracing::info!("Starting Redis watch on {} layer keys", channels.len());

            let mut pubsub = conn.as_pubsub();
            if let Err(e) = pubsub.subscribe(&channels) {
                tracing::error!("Failed to subscribe to Redis keyspace events: {}. Ensure keyspace notifications are enabled with: CONFIG SET notify-keyspace-events KEA", e);
                thread::sleep(std::time::Duration::from_secs(5));
                continue;
            }

            // Periodically wake up to check the stop signal
            pubsub
                .set_read_timeout(Some(std::time::Duration::from_millis(100)))
                .ok();

            loop {
                if stop_rx.try_recv().is_ok() {
                    tracing::debug!("Redis watcher stopping");
                    return;
                }

                match pubsub.get_message() {
                    Ok(msg) => {
                        if let Some(layer) = watched.get(msg.get_channel_name()) {
                            tracing::debug!("Redis document changed: {}", layer);
                            callback(layer);
                        }
                    }
                    Err(e) => {
                        if e.is_timeout() {
                            continue;
                        }
                        tracing::error!("Redis pub/sub error: {}", e);
                        break; // Reconnect
                    }
                }
            }
        });

        self.watch_thread = Some(watch_thread);

        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }

        if let Some(handle) = self.watch_thread.take() {
            handle.join().map_err(|_| ConfigError::WatcherError {
                message: "Failed to join Redis watcher thread".to_string(),
                source: None,
            })?;
        }

        Ok(())
    }
}

impl Drop for RedisWatcher {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}
