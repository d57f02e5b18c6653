// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing parser, store, and loader implementations.
//!
//! This module contains concrete implementations of the traits defined in the
//! ports layer: document parsers (`ConfigParser`), remote stores
//! (`DocumentFetcher`, `LayerWatcher`), and loaders that build an application
//! identity from the process environment or command line.

#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "env")]
pub mod env_var;
#[cfg(feature = "etcd")]
pub mod etcd;
#[cfg(any(feature = "yaml", feature = "json"))]
mod flatten;
pub mod format_parser;
#[cfg(feature = "json")]
pub mod json;
pub mod memory;
pub mod properties;
#[cfg(feature = "redis")]
pub mod redis;
#[cfg(any(feature = "etcd", feature = "redis"))]
mod runtime;
#[cfg(feature = "yaml")]
pub mod yaml;

pub mod watchers;

// Re-export adapters based on feature flags
#[cfg(feature = "cli")]
pub use cli::IdentityArgs;
#[cfg(feature = "env")]
pub use env_var::EnvIdentityLoader;
#[cfg(feature = "etcd")]
pub use etcd::EtcdFetcher;
pub use format_parser::FormatParser;
#[cfg(feature = "json")]
pub use json::JsonParser;
pub use memory::{InMemoryConfigStore, MemoryWatcher};
pub use properties::PropertiesParser;
#[cfg(feature = "redis")]
pub use self::redis::RedisFetcher;
#[cfg(feature = "yaml")]
pub use yaml::YamlParser;

#[cfg(feature = "etcd")]
pub use watchers::EtcdWatcher;
#[cfg(feature = "redis")]
pub use watchers::RedisWatcher;
