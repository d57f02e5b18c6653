// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON document parser.

use crate::adapters::flatten::{child_key, index_key};
use crate::domain::{ConfigError, Result};
use crate::ports::ConfigParser;
use indexmap::IndexMap;
use serde_json::Value;

/// JSON parser implementation.
///
/// Objects are flattened with dot notation and arrays with `[i]` suffixes, the
/// same key space the YAML and property-list parsers produce.
///
/// # Examples
///
/// ```rust
/// use remotecfg::adapters::JsonParser;
/// use remotecfg::ports::ConfigParser;
///
/// let result = JsonParser::new()
///     .parse(r#"{"server": {"port": 8080, "hosts": ["a", "b"]}}"#)
///     .unwrap();
/// assert_eq!(result.get("server.port").map(String::as_str), Some("8080"));
/// assert_eq!(result.get("server.hosts[1]").map(String::as_str), Some("b"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonParser;

impl JsonParser {
    /// Creates a new JSON parser.
    pub fn new() -> Self {
        JsonParser
    }

    fn flatten_json(value: &Value, prefix: &str, result: &mut IndexMap<String, String>) {
        match value {
            Value::Object(map) if map.is_empty() && !prefix.is_empty() => {
                result.insert(prefix.to_string(), String::new());
            }
            Value::Object(map) => {
                for (key, val) in map {
                    Self::flatten_json(val, &child_key(prefix, key), result);
                }
            }
            Value::Array(items) if items.is_empty() => {
                result.insert(prefix.to_string(), String::new());
            }
            Value::Array(items) => {
                for (i, val) in items.iter().enumerate() {
                    Self::flatten_json(val, &index_key(prefix, i), result);
                }
            }
            Value::String(s) => {
                result.insert(prefix.to_string(), s.clone());
            }
            Value::Number(n) => {
                result.insert(prefix.to_string(), n.to_string());
            }
            Value::Bool(b) => {
                result.insert(prefix.to_string(), b.to_string());
            }
            Value::Null => {
                result.insert(prefix.to_string(), String::new());
            }
        }
    }
}

impl ConfigParser for JsonParser {
    fn parse(&self, content: &str) -> Result<IndexMap<String, String>> {
        if content.trim().is_empty() {
            return Ok(IndexMap::new());
        }

        let value: Value = serde_json::from_str(content).map_err(|e| ConfigError::ParseError {
            message: format!("Failed to parse JSON: {}", e),
            source: Some(Box::new(e)),
        })?;

        if !value.is_object() {
            return Err(ConfigError::ParseError {
                message: "JSON document root must be an object".to_string(),
                source: None,
            });
        }

        let mut result = IndexMap::new();
        Self::flatten_json(&value, "", &mut result);
        Ok(result)
    }

    fn supported_extensions(&self) -> &[&str] {
        &["json"]
    }
}
