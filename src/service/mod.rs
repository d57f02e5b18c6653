// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer that turns an application identity into a composite
//! configuration.
//!
//! [`LayerResolver`] decides which documents apply and in which order;
//! [`CompositeBuilder`] fetches, parses, and merges them.

pub mod composite_builder;
pub mod resolver;
pub mod settings;

// Re-export commonly used types
pub use composite_builder::CompositeBuilder;
pub use resolver::LayerResolver;
pub use settings::{FetchMode, ResolverSettings, DEFAULT_FETCH_TIMEOUT};
