// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layer watcher trait definition.
//!
//! This module defines the `LayerWatcher` trait, the subscribe half of the
//! remote collaborator interface. A watcher notifies the caller when one of the
//! watched documents is published, changed, or removed. The resolver never
//! mutates a composite in place; reacting to a change means building again.

use crate::domain::{LayerRequest, Result};
use std::sync::Arc;

/// Callback invoked with the layer whose document changed.
pub type ChangeCallback = Arc<dyn Fn(&LayerRequest) + Send + Sync>;

/// A trait for subscribing to changes of remote configuration documents.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`. Callbacks may be invoked from any
/// thread and should not block.
///
/// # Examples
///
/// ```rust
/// use remotecfg::domain::{LayerRequest, Result};
/// use remotecfg::ports::{ChangeCallback, LayerWatcher};
///
/// struct NoopWatcher;
///
/// impl LayerWatcher for NoopWatcher {
///     fn watch(&mut self, _layers: &[LayerRequest], _callback: ChangeCallback) -> Result<()> {
///         Ok(())
///     }
///
///     fn stop(&mut self) -> Result<()> {
///         Ok(())
///     }
/// }
/// ```
pub trait LayerWatcher: Send + Sync {
    /// Starts watching the given layers.
    ///
    /// Layers whose documents do not exist yet are watched too, so that an
    /// overlay published later is noticed.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The subscription is active
    /// * `Err(ConfigError::WatcherError)` - The subscription could not be set up
    fn watch(&mut self, layers: &[LayerRequest], callback: ChangeCallback) -> Result<()>;

    /// Stops watching. No notifications are delivered afterwards.
    fn stop(&mut self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DataId;
    use std::sync::Mutex;

    struct TestWatcher {
        watched: Vec<LayerRequest>,
        callback: Option<ChangeCallback>,
    }

    impl TestWatcher {
        fn new() -> Self {
            TestWatcher {
                watched: Vec::new(),
                callback: None,
            }
        }

        fn simulate_change(&self, index: usize) {
            if let Some(callback) = &self.callback {
                callback(&self.watched[index]);
            }
        }
    }

    impl LayerWatcher for TestWatcher {
        fn watch(&mut self, layers: &[LayerRequest], callback: ChangeCallback) -> Result<()> {
            self.watched = layers.to_vec();
            self.callback = Some(callback);
            Ok(())
        }

        fn stop(&mut self) -> Result<()> {
            self.callback = None;
            Ok(())
        }
    }

    fn layers() -> Vec<LayerRequest> {
        vec![
            LayerRequest::new(DataId::from("app.yaml"), "G", "yaml"),
            LayerRequest::new(DataId::from("app-dev.yaml"), "G", "yaml"),
        ]
    }

    #[test]
    fn test_watcher_callback_invocation() {
        let mut watcher = TestWatcher::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);

        watcher
            .watch(
                &layers(),
                Arc::new(move |layer: &LayerRequest| {
                    seen_clone.lock().unwrap().push(layer.data_id.clone());
                }),
            )
            .unwrap();

        watcher.simulate_change(1);
        assert_eq!(*seen.lock().unwrap(), vec![DataId::from("app-dev.yaml")]);
    }

    #[test]
    fn test_watcher_stop_silences_callbacks() {
        let mut watcher = TestWatcher::new();
        let count = Arc::new(Mutex::new(0));
        let count_clone = Arc::clone(&count);

        watcher
            .watch(
                &layers(),
                Arc::new(move |_: &LayerRequest| *count_clone.lock().unwrap() += 1),
            )
            .unwrap();
        watcher.stop().unwrap();
        watcher.simulate_change(0);

        assert_eq!(*count.lock().unwrap(), 0);
    }

    #[test]
    fn test_watcher_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Box<dyn LayerWatcher>>();
    }
}
