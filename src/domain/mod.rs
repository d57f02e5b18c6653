// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing core types and logic.
//!
//! This module holds the identity, data id, format, layer and composite types.
//! None of it performs I/O; fetching is reached only through the ports.

pub mod composite;
pub mod data_id;
pub mod errors;
pub mod format;
pub mod identity;
pub mod layer;

// Re-export commonly used types
pub use composite::{merge_layers, CompositeConfiguration, DEFAULT_COMPOSITE_NAME};
pub use data_id::DataId;
pub use errors::{ConfigError, Result};
pub use format::ConfigFormat;
pub use identity::{AppIdentity, DEFAULT_FILE_EXTENSION, DEFAULT_GROUP};
pub use layer::{
    LayerOutcome, LayerRequest, LayerStatus, ParsedLayer, ResolutionWarning, WarningKind,
};
