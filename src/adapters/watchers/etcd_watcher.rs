// SPDX-License-Identifier: MIT OR Apache-2.0

//! etcd layer watcher.
//!
//! This module provides a watcher that monitors the etcd keys of resolved
//! layers using etcd's native watch API.

use crate::adapters::etcd::document_path;
use crate::adapters::runtime::block_on;
use crate::domain::{ConfigError, LayerRequest, Result};
use crate::ports::{ChangeCallback, LayerWatcher};
use etcd_client::{Client, WatchOptions};
use std::collections::HashMap;
use std::sync::mpsc::{channel, Sender};
use std::thread::{self, JoinHandle};

/// Watcher for changes to layer documents stored in etcd.
///
/// Documents are expected at the same keys [`EtcdFetcher`] reads them from.
/// The watcher observes every key under the root and reports only those that
/// belong to a watched layer.
///
/// [`EtcdFetcher`]: crate::adapters::EtcdFetcher
///
/// # Examples
///
/// ```rust,no_run
/// use remotecfg::adapters::{EtcdFetcher, EtcdWatcher};
/// use remotecfg::domain::{AppIdentity, LayerRequest};
/// use remotecfg::service::CompositeBuilder;
/// use std::sync::Arc;
///
/// # fn main() -> remotecfg::domain::Result<()> {
/// let builder = CompositeBuilder::new(EtcdFetcher::connect(vec!["localhost:2379"], Some("config/"))?);
/// let mut watcher = EtcdWatcher::new(vec!["localhost:2379"], Some("config/"))?;
///
/// let identity = AppIdentity::new("orders").with_profile("dev");
/// builder.watch_layers(&identity, &mut watcher, Arc::new(|layer: &LayerRequest| {
///     println!("Layer changed: {}", layer);
/// }))?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct EtcdWatcher {
    /// etcd endpoints
    endpoints: Vec<String>,
    /// Key prefix all documents live under
    root: String,
    /// Stop signal sender
    stop_tx: Option<Sender<()>>,
    /// Watch thread handle
    watch_thread: Option<JoinHandle<()>>,
}

impl EtcdWatcher {
    /// Creates a new etcd watcher.
    ///
    /// # Arguments
    ///
    /// * `endpoints` - List of etcd endpoints (e.g., `["localhost:2379"]`)
    /// * `root` - Optional key prefix, matching the fetcher's
    ///
    /// # Errors
    ///
    /// Returns `WatcherError` if etcd cannot be reached.
    pub fn new<S: AsRef<str>>(endpoints: Vec<S>, root: Option<&str>) -> Result<Self> {
        let endpoints: Vec<String> = endpoints.iter().map(|s| s.as_ref().to_string()).collect();

        // Test connection
        let check = endpoints.clone();
        block_on(async move { Client::connect(&check, None).await }).map_err(|e| {
            ConfigError::WatcherError {
                message: format!("Failed to connect to etcd: {}", e),
                source: Some(Box::new(e)),
            }
        })?;

        Ok(Self {
            endpoints,
            root: root.unwrap_or_default().to_string(),
            stop_tx: None,
            watch_thread: None,
        })
    }
}

impl LayerWatcher for EtcdWatcher {
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
                (
                    document_path(&self.root, &layer.data_id, &layer.group),
                    layer.clone(),
                )
            })
            .collect();

        let (stop_tx, stop_rx) = channel();
        self.stop_tx = Some(stop_tx);

        let endpoints = self.endpoints.clone();
        let root = self.root.clone();

        let watch_thread = thread::spawn(move || {
            // Create a new runtime for this thread
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    tracing::error!("Failed to create tokio runtime for etcd watcher: {}", e);
                    return;
                }
            };

            runtime.block_on(async move {
                loop {
                    if stop_rx.try_recv().is_ok() {
                        tracing::debug!("etcd watcher stopping");
                        break;
                    }

                    let mut client = match Client::connect(&endpoints, None).await {
                        Ok(c) => c,
                        Err(e) => {
                            tracing::error!("Failed to connect to etcd for watching: {}", e);
                            tokio::time::sleep(tokio::time::Duration::from_secs(5)).await;
                            continue;
                        }
                    };

                    tracing::info!(
                        "Starting etcd watch on {} layers under '{}'",
                        watched.len(),
                        root
                    );

                    let options = WatchOptions::new().with_prefix();
                    let (_watcher, mut stream) =
                        match client.watch(root.as_str(), Some(options)).await {
                            Ok((w, s)) => (w, s),
                            Err(e) => {
                                tracing::error!("Failed to create etcd watch: {}", e);
                                tokio::time::sleep(tokio::time::Duration::from_secs(5)).await;
                                continue;
                            }
                        };

                    loop {
                        if stop_rx.try_recv().is_ok() {
                            tracing::debug!("etcd watcher stopping");
                            return;
                        }

                        tokio::select! {
                            message = stream.message() => {
                                let response = match message {
                                    Ok(Some(response)) => response,
                                    Ok(None) => break, // Stream closed; reconnect
                                    Err(e) => {
                                        tracing::error!("etcd watch error: {}", e);
                                        break;
                                    }
                                };
                                for event in response.events() {
                                    let Some(kv) = event.kv() else { continue };
                                    let Ok(key) = kv.key_str() else { continue };
                                    if let Some(layer) = watched.get(key) {
                                        tracing::debug!("etcd document changed: {}", layer);
                                        callback(layer);
                                    }
                                }
                            }
                            _ = tokio::time::sleep(tokio::time::Duration::from_millis(100)) => {
                                // Timeout to check stop signal
                            }
                        }
                    }
                }
            });
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
                message: "Failed to join etcd watcher thread".to_string(),
                source: None,
            })?;
        }

        Ok(())
    }
}

impl Drop for EtcdWatcher {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}
