// SPDX-License-Identifier: MIT OR Apache-2.0

//! Watcher implementations for remote layer change detection.
//!
//! This module contains implementations of the `LayerWatcher` trait for the
//! remote stores. The in-memory store's watcher lives with the store.

#[cfg(feature = "etcd")]
pub mod etcd_watcher;
#[cfg(feature = "redis")]
pub mod redis_watcher;

#[cfg(feature = "etcd")]
pub use etcd_watcher::EtcdWatcher;
#[cfg(feature = "redis")]
pub use redis_watcher::RedisWatcher;
