// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process configuration store.
//!
//! This adapter keeps documents in memory and implements both halves of the
//! remote collaborator interface: [`DocumentFetcher`] and, through
//! [`InMemoryConfigStore::watcher`], [`LayerWatcher`]. It is meant for tests,
//! demos, and embedding a fixed configuration set. Faults and latency can be
//! injected per document.

use crate::domain::{ConfigError, DataId, LayerRequest, Result};
use crate::ports::{ChangeCallback, DocumentFetcher, LayerWatcher};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

type DocumentKey = (String, String);

fn document_key(data_id: &str, group: &str) -> DocumentKey {
    (group.to_string(), data_id.to_string())
}

struct Subscription {
    id: u64,
    layers: Vec<LayerRequest>,
    callback: ChangeCallback,
}

#[derive(Default)]
struct StoreInner {
    documents: RwLock<HashMap<DocumentKey, Vec<u8>>>,
    failures: RwLock<HashMap<DocumentKey, String>>,
    latencies: RwLock<HashMap<DocumentKey, Duration>>,
    subscriptions: Mutex<Vec<Subscription>>,
    next_subscription: AtomicU64,
}

impl StoreInner {
    fn notify(&self, key: &DocumentKey) {
        // Callbacks run outside the lock so they may call back into the store.
        let matching: Vec<(ChangeCallback, LayerRequest)> = match self.subscriptions.lock() {
            Ok(subscriptions) => subscriptions
                .iter()
                .flat_map(|sub| {
                    sub.layers
                        .iter()
                        .filter(|layer| layer.group == key.0 && layer.data_id.as_str() == key.1)
                        .map(move |layer| (Arc::clone(&sub.callback), layer.clone()))
                })
                .collect(),
            Err(_) => return,
        };

        for (callback, layer) in matching {
            tracing::debug!("Notifying watcher of change to '{}'", layer);
            callback(&layer);
        }
    }
}

/// Thread-safe in-memory document store.
///
/// Cloning the store yields another handle to the same documents.
///
/// # Examples
///
/// ```rust
/// use remotecfg::adapters::InMemoryConfigStore;
/// use remotecfg::domain::DataId;
/// use remotecfg::ports::DocumentFetcher;
/// use std::time::Duration;
///
/// let store = InMemoryConfigStore::new();
/// store.publish("orders.properties", "DEFAULT_GROUP", "server.port=8080");
///
/// let doc = store
///     .fetch(&DataId::from("orders.properties"), "DEFAULT_GROUP", Duration::from_secs(1))
///     .unwrap();
/// assert_eq!(doc.as_deref(), Some(&b"server.port=8080"[..]));
/// ```
#[derive(Clone, Default)]
pub struct InMemoryConfigStore {
    inner: Arc<StoreInner>,
}

impl InMemoryConfigStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores or replaces a document and notifies watchers.
    pub fn publish(&self, data_id: &str, group: &str, content: impl Into<Vec<u8>>) {
        let key = document_key(data_id, group);
        if let Ok(mut documents) = self.inner.documents.write() {
            documents.insert(key.clone(), content.into());
        }
        self.inner.notify(&key);
    }

    /// Deletes a document and notifies watchers if it existed.
    pub fn remove(&self, data_id: &str, group: &str) -> bool {
        let key = document_key(data_id, group);
        let removed = match self.inner.documents.write() {
            Ok(mut documents) => documents.remove(&key).is_some(),
            Err(_) => false,
        };
        if removed {
            self.inner.notify(&key);
        }
        removed
    }

    /// Makes every fetch of the document fail with the given message.
    pub fn fail_with(&self, data_id: &str, group: &str, message: impl Into<String>) {
        if let Ok(mut failures) = self.inner.failures.write() {
            failures.insert(document_key(data_id, group), message.into());
        }
    }

    /// Removes an injected failure.
    pub fn clear_failure(&self, data_id: &str, group: &str) {
        if let Ok(mut failures) = self.inner.failures.write() {
            failures.remove(&document_key(data_id, group));
        }
    }

    /// Delays every fetch of the document by `latency`.
    ///
    /// A fetch whose timeout is shorter than the latency fails after waiting
    /// for the timeout.
    pub fn delay(&self, data_id: &str, group: &str, latency: Duration) {
        if let Ok(mut latencies) = self.inner.latencies.write() {
            latencies.insert(document_key(data_id, group), latency);
        }
    }

    /// Returns the number of stored documents.
    pub fn len(&self) -> usize {
        self.inner.documents.read().map(|d| d.len()).unwrap_or(0)
    }

    /// Returns `true` if the store holds no documents.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Creates a watcher bound to this store.
    pub fn watcher(&self) -> MemoryWatcher {
        MemoryWatcher {
            inner: Arc::clone(&self.inner),
            subscription: None,
        }
    }
}

impl DocumentFetcher for InMemoryConfigStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn fetch(&self, data_id: &DataId, group: &str, timeout: Duration) -> Result<Option<Vec<u8>>> {
        let key = document_key(data_id.as_str(), group);
        let lock_error = || ConfigError::fetch(data_id.as_str(), group, "store lock poisoned");

        let latency = self
            .inner
            .latencies
            .read()
            .map_err(|_| lock_error())?
            .get(&key)
            .copied();
        if let Some(latency) = latency {
            std::thread::sleep(latency.min(timeout));
            if latency > timeout {
                return Err(ConfigError::fetch(
                    data_id.as_str(),
                    group,
                    format!("timed out after {}ms", timeout.as_millis()),
                ));
            }
        }

        if let Some(message) = self.inner.failures.read().map_err(|_| lock_error())?.get(&key) {
            return Err(ConfigError::fetch(data_id.as_str(), group, message.clone()));
        }

        Ok(self
            .inner
            .documents
            .read()
            .map_err(|_| lock_error())?
            .get(&key)
            .cloned())
    }
}

/// Watcher over an [`InMemoryConfigStore`].
pub struct MemoryWatcher {
    inner: Arc<StoreInner>,
    subscription: Option<u64>,
}

impl LayerWatcher for MemoryWatcher {
    fn watch(&mut self, layers: &[LayerRequest], callback: ChangeCallback) -> Result<()> {
        self.stop()?;

        let id = self.inner.next_subscription.fetch_add(1, Ordering::Relaxed);
        let mut subscriptions =
            self.inner
                .subscriptions
                .lock()
                .map_err(|_| ConfigError::WatcherError {
                    message: "subscription lock poisoned".to_string(),
                    source: None,
                })?;
        subscriptions.push(Subscription {
            id,
            layers: layers.to_vec(),
            callback,
        });
        self.subscription = Some(id);
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        if let Some(id) = self.subscription.take() {
            let mut subscriptions =
                self.inner
                    .subscriptions
                    .lock()
                    .map_err(|_| ConfigError::WatcherError {
                        message: "subscription lock poisoned".to_string(),
                        source: None,
                    })?;
            subscriptions.retain(|sub| sub.id != id);
        }
        Ok(())
    }
}

impl Drop for MemoryWatcher {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}
