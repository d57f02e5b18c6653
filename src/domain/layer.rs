// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layer requests, parsed layers, and per-layer resolution diagnostics.

use crate::domain::{ConfigFormat, DataId};
use crate::ports::ConfigSource;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// One document the resolver intends to fetch.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct LayerRequest {
    /// Data id of the document
    pub data_id: DataId,
    /// Group the document lives in
    pub group: String,
    /// Declared file extension, which selects the parser
    pub extension: String,
}

impl LayerRequest {
    /// Creates a new layer request.
    pub fn new(data_id: DataId, group: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            data_id,
            group: group.into(),
            extension: extension.into(),
        }
    }
}

impl fmt::Display for LayerRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.data_id, self.group)
    }
}

/// A fetched and parsed configuration document.
///
/// Values keep the order in which they appeared in the document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ParsedLayer {
    data_id: DataId,
    group: String,
    format: ConfigFormat,
    values: IndexMap<String, String>,
}

impl ParsedLayer {
    /// Creates a layer from parsed values.
    pub fn new(
        data_id: DataId,
        group: impl Into<String>,
        format: ConfigFormat,
        values: IndexMap<String, String>,
    ) -> Self {
        Self {
            data_id,
            group: group.into(),
            format,
            values,
        }
    }

    /// Returns the data id the layer was loaded from.
    pub fn data_id(&self) -> &DataId {
        &self.data_id
    }

    /// Returns the group the layer was loaded from.
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Returns the format the layer was parsed as.
    pub fn format(&self) -> ConfigFormat {
        self.format
    }

    /// Returns the layer's values in document order.
    pub fn values(&self) -> &IndexMap<String, String> {
        &self.values
    }

    /// Returns the number of keys in the layer.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the document defined no keys.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ConfigSource for ParsedLayer {
    fn name(&self) -> &str {
        self.data_id.as_str()
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    fn all_keys(&self) -> Vec<&str> {
        self.values.keys().map(String::as_str).collect()
    }
}

/// How a single layer ended up during one resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayerStatus {
    /// Fetched and parsed; the layer is part of the composite.
    Loaded,
    /// The remote store has no such document.
    NotFound,
    /// The fetch failed; the layer was skipped.
    FetchFailed,
    /// The document could not be parsed; the layer was skipped.
    ParseFailed,
    /// The build deadline expired before the fetch completed.
    Abandoned,
}

/// Diagnostic record of one layer's resolution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LayerOutcome {
    /// The layer that was requested
    pub request: LayerRequest,
    /// What happened to it
    pub status: LayerStatus,
}

/// Category of a resolution warning.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarningKind {
    /// A layer fetch failed.
    FetchFailed,
    /// A layer could not be parsed.
    ParseFailed,
    /// A layer declared a format no parser handles.
    UnsupportedFormat,
    /// A layer fetch did not complete before the build deadline.
    DeadlineExceeded,
    /// The remote collaborator could not be obtained at all.
    ServiceUnavailable,
}

/// A non-fatal problem recorded while building a composite.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResolutionWarning {
    /// The layer concerned; `None` for resolution-wide warnings
    pub data_id: Option<DataId>,
    /// Warning category
    pub kind: WarningKind,
    /// Human readable description
    pub message: String,
}

impl fmt::Display for ResolutionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.data_id {
            Some(data_id) => write!(f, "[{}] {}", data_id, self.message),
            None => f.write_str(&self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer() -> ParsedLayer {
        let mut values = IndexMap::new();
        values.insert("server.port".to_string(), "8080".to_string());
        values.insert("app.name".to_string(), "orders".to_string());
        ParsedLayer::new(
            DataId::from("orders.properties"),
            "DEFAULT_GROUP",
            ConfigFormat::Properties,
            values,
        )
    }

    #[test]
    fn test_parsed_layer_accessors() {
        let layer = layer();
        assert_eq!(layer.data_id().as_str(), "orders.properties");
        assert_eq!(layer.group(), "DEFAULT_GROUP");
        assert_eq!(layer.format(), ConfigFormat::Properties);
        assert_eq!(layer.len(), 2);
        assert!(!layer.is_empty());
    }

    #[test]
    fn test_parsed_layer_as_source_keeps_document_order() {
        let layer = layer();
        assert_eq!(layer.name(), "orders.properties");
        assert_eq!(layer.get("server.port"), Some("8080"));
        assert_eq!(layer.get("missing"), None);
        assert_eq!(layer.all_keys(), vec!["server.port", "app.name"]);
    }

    #[test]
    fn test_layer_request_display() {
        let request = LayerRequest::new(DataId::from("app-dev.yaml"), "G", "yaml");
        assert_eq!(request.to_string(), "app-dev.yaml@G");
    }

    #[test]
    fn test_warning_display() {
        let warning = ResolutionWarning {
            data_id: Some(DataId::from("app-dev.yaml")),
            kind: WarningKind::ParseFailed,
            message: "bad indentation".to_string(),
        };
        assert_eq!(warning.to_string(), "[app-dev.yaml] bad indentation");

        let warning = ResolutionWarning {
            data_id: None,
            kind: WarningKind::ServiceUnavailable,
            message: "no service".to_string(),
        };
        assert_eq!(warning.to_string(), "no service");
    }
}
