// SPDX-License-Identifier: MIT OR Apache-2.0

//! The composite configuration handed to the host application.
//!
//! A composite is an ordered list of parsed layers, lowest precedence first,
//! plus the flattened view produced by [`merge_layers`]. Precedence is decided
//! in exactly one place: the merge function walks the layers in order and lets
//! every later layer override earlier values key by key.

use crate::domain::errors::{ConfigError, Result};
use crate::domain::layer::{LayerOutcome, ParsedLayer, ResolutionWarning};
use crate::ports::ConfigSource;
use indexmap::IndexMap;
use serde::Serialize;
use std::str::FromStr;

/// Name given to composites when the settings do not override it.
pub const DEFAULT_COMPOSITE_NAME: &str = "REMOTE";

/// Merges layers into one flat view. Later layers win on shared keys.
///
/// Keys keep the position of their first appearance so that the merged view is
/// deterministic for a given layer sequence.
///
/// # Examples
///
/// ```
/// use indexmap::IndexMap;
/// use remotecfg::domain::{merge_layers, ConfigFormat, DataId, ParsedLayer};
///
/// let layer = |id: &str, pairs: &[(&str, &str)]| {
///     let values: IndexMap<String, String> = pairs
///         .iter()
///         .map(|(k, v)| (k.to_string(), v.to_string()))
///         .collect();
///     ParsedLayer::new(DataId::from(id), "DEFAULT_GROUP", ConfigFormat::Properties, values)
/// };
///
/// let merged = merge_layers(&[
///     layer("app.properties", &[("a", "1"), ("b", "1")]),
///     layer("app-dev.properties", &[("b", "2"), ("c", "2")]),
/// ]);
///
/// assert_eq!(merged.get("a").map(String::as_str), Some("1"));
/// assert_eq!(merged.get("b").map(String::as_str), Some("2"));
/// assert_eq!(merged.get("c").map(String::as_str), Some("2"));
/// ```
pub fn merge_layers(layers: &[ParsedLayer]) -> IndexMap<String, String> {
    let mut merged = IndexMap::new();
    for layer in layers {
        for (key, value) in layer.values() {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

/// Named, ordered set of layers exposed as a single key/value view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CompositeConfiguration {
    name: String,
    layers: Vec<ParsedLayer>,
    #[serde(skip)]
    merged: IndexMap<String, String>,
    outcomes: Vec<LayerOutcome>,
    warnings: Vec<ResolutionWarning>,
}

impl CompositeConfiguration {
    /// Creates a composite with no layers.
    ///
    /// An empty composite is a valid result: remote configuration is optional.
    pub fn empty(name: impl Into<String>) -> Self {
        Self::assemble(name, Vec::new(), Vec::new(), Vec::new())
    }

    /// Assembles a composite from layers in precedence order (lowest first).
    pub fn assemble(
        name: impl Into<String>,
        layers: Vec<ParsedLayer>,
        outcomes: Vec<LayerOutcome>,
        warnings: Vec<ResolutionWarning>,
    ) -> Self {
        let merged = merge_layers(&layers);
        Self {
            name: name.into(),
            layers,
            merged,
            outcomes,
            warnings,
        }
    }

    /// Returns the composite's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the effective value for a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.merged.get(key).map(String::as_str)
    }

    /// Returns the effective value for a key converted with `FromStr`.
    ///
    /// Absent keys yield `Ok(None)`; present but unconvertible values yield a
    /// `TypeConversionError`.
    ///
    /// # Examples
    ///
    /// ```
    /// use indexmap::IndexMap;
    /// use remotecfg::domain::{CompositeConfiguration, ConfigFormat, DataId, ParsedLayer};
    ///
    /// let mut values = IndexMap::new();
    /// values.insert("server.port".to_string(), "8080".to_string());
    /// let layer = ParsedLayer::new(DataId::from("app.properties"), "G", ConfigFormat::Properties, values);
    /// let composite = CompositeConfiguration::assemble("REMOTE", vec![layer], vec![], vec![]);
    ///
    /// assert_eq!(composite.get_parsed::<u16>("server.port").unwrap(), Some(8080));
    /// assert_eq!(composite.get_parsed::<u16>("server.host").unwrap(), None);
    /// ```
    pub fn get_parsed<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        match self.get(key) {
            None => Ok(None),
            Some(raw) => raw
                .parse::<T>()
                .map(Some)
                .map_err(|e| ConfigError::TypeConversionError {
                    key: key.to_string(),
                    target_type: std::any::type_name::<T>().to_string(),
                    source: Box::new(e),
                }),
        }
    }

    /// Returns `true` if any layer defines the key.
    pub fn contains_key(&self, key: &str) -> bool {
        self.merged.contains_key(key)
    }

    /// Returns all effective keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.merged.keys().map(String::as_str)
    }

    /// Returns the flattened view.
    pub fn as_map(&self) -> &IndexMap<String, String> {
        &self.merged
    }

    /// Returns the number of effective keys.
    pub fn len(&self) -> usize {
        self.merged.len()
    }

    /// Returns `true` if the composite holds no keys.
    pub fn is_empty(&self) -> bool {
        self.merged.is_empty()
    }

    /// Returns the contributing layers, lowest precedence first.
    pub fn layers(&self) -> &[ParsedLayer] {
        &self.layers
    }

    /// Returns the layer whose value wins for `key`.
    pub fn winning_layer(&self, key: &str) -> Option<&ParsedLayer> {
        self.layers
            .iter()
            .rev()
            .find(|layer| layer.values().contains_key(key))
    }

    /// Returns what happened to every requested layer, in resolution order.
    pub fn outcomes(&self) -> &[LayerOutcome] {
        &self.outcomes
    }

    /// Returns the warnings recorded while building.
    pub fn warnings(&self) -> &[ResolutionWarning] {
        &self.warnings
    }
}

impl ConfigSource for CompositeConfiguration {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, key: &str) -> Option<&str> {
        CompositeConfiguration::get(self, key)
    }

    fn all_keys(&self) -> Vec<&str> {
        self.keys().collect()
    }
}
