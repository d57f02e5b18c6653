// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! These traits are the seams between the resolver and the outside world: the
//! remote store (fetcher and watcher), document formats (parser), and the host
//! application's environment (source).

pub mod fetcher;
pub mod parser;
pub mod source;
pub mod watcher;

// Re-export commonly used types
pub use fetcher::DocumentFetcher;
pub use parser::ConfigParser;
pub use source::ConfigSource;
pub use watcher::{ChangeCallback, LayerWatcher};
