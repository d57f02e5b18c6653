// SPDX-License-Identifier: MIT OR Apache-2.0

//! A layered remote configuration resolver.
//!
//! An application identifies itself by name, group, optional resource prefix,
//! file extension and an ordered list of active profiles. This crate turns
//! that identity into an ordered list of remote documents (a base document
//! plus one overlay per profile), fetches each one, parses it into flat
//! dotted keys, and merges them into a single composite configuration where
//! later layers override earlier ones key by key.
//!
//! Remote configuration is treated as optional: a missing overlay contributes
//! nothing, a broken one is skipped with a warning, and an unavailable service
//! yields an empty composite instead of an error.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: Core types (`AppIdentity`, `DataId`, `ParsedLayer`,
//!   `CompositeConfiguration`, errors)
//! - **Ports**: Trait definitions (`DocumentFetcher`, `ConfigParser`,
//!   `ConfigSource`, `LayerWatcher`)
//! - **Adapters**: Parsers, remote stores (in-memory, etcd, Redis) and identity
//!   loaders (environment, command line)
//! - **Service**: Layer resolution and the composite builder
//!
//! # Feature Flags
//!
//! - `yaml`: Enable YAML documents (default)
//! - `json`: Enable JSON documents (default)
//! - `env`: Enable loading the identity from environment variables (default)
//! - `cli`: Enable loading the identity from command-line arguments (default)
//! - `etcd`: Enable the etcd document store
//! - `redis`: Enable the Redis document store
//! - `remote`: Enable all remote stores (etcd + redis)
//! - `full`: Enable all features
//!
//! Property-list documents are always supported.
//!
//! # Quick Start
//!
//! ```rust
//! use remotecfg::prelude::*;
//!
//! let store = InMemoryConfigStore::new();
//! store.publish("orders.properties", "DEFAULT_GROUP", "server.port=8080\nlog.level=info");
//! store.publish("orders-dev.properties", "DEFAULT_GROUP", "log.level=debug");
//!
//! let identity = AppIdentity::new("orders").with_profile("dev");
//! let config = CompositeBuilder::new(store).build(&identity);
//!
//! assert_eq!(config.get("server.port"), Some("8080"));
//! assert_eq!(config.get("log.level"), Some("debug"));
//! assert_eq!(config.get_parsed::<u16>("server.port").unwrap(), Some(8080));
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::domain::{
        AppIdentity, CompositeConfiguration, ConfigError, ConfigFormat, DataId, LayerRequest,
        ParsedLayer, Result,
    };
    pub use crate::ports::{ConfigParser, ConfigSource, DocumentFetcher, LayerWatcher};
    pub use crate::service::{CompositeBuilder, FetchMode, LayerResolver, ResolverSettings};

    pub use crate::adapters::{FormatParser, InMemoryConfigStore, PropertiesParser};

    // Re-export adapters based on feature flags
    #[cfg(feature = "cli")]
    pub use crate::adapters::IdentityArgs;
    #[cfg(feature = "env")]
    pub use crate::adapters::EnvIdentityLoader;
    #[cfg(feature = "json")]
    pub use crate::adapters::JsonParser;
    #[cfg(feature = "yaml")]
    pub use crate::adapters::YamlParser;
}
