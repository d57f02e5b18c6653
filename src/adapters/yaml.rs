// SPDX-License-Identifier: MIT OR Apache-2.0

//! YAML document parser.
//!
//! This module provides a parser that flattens YAML documents into the same
//! dot-joined key space used by property-list documents.

use crate::adapters::flatten::{child_key, index_key};
use crate::domain::{ConfigError, Result};
use crate::ports::ConfigParser;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_yaml::Value;

/// YAML parser implementation.
///
/// This parser converts YAML documents into flat key-value maps using dot
/// notation for nested mappings and `[i]` suffixes for sequences. A stream with
/// several `---` separated documents is merged in document order, later
/// documents overriding earlier ones.
///
/// # Examples
///
/// ```rust
/// use remotecfg::adapters::YamlParser;
/// use remotecfg::ports::ConfigParser;
///
/// let parser = YamlParser::new();
/// let yaml_content = "database:\n  host: localhost\n  port: 5432";
/// let result = parser.parse(yaml_content).unwrap();
/// assert_eq!(result.get("database.host"), Some(&"localhost".to_string()));
/// ```
#[derive(Debug, Clone)]
pub struct YamlParser;

impl YamlParser {
    /// Creates a new YAML parser.
    pub fn new() -> Self {
        YamlParser
    }

    /// Flattens a YAML value into a flat map with dot notation keys.
    fn flatten_yaml(value: &Value, prefix: &str, result: &mut IndexMap<String, String>) {
        match value {
            Value::Mapping(map) if map.is_empty() && !prefix.is_empty() => {
                result.insert(prefix.to_string(), String::new());
            }
            Value::Mapping(map) => {
                for (key, val) in map {
                    if let Some(key_str) = Self::scalar_to_string(key) {
                        Self::flatten_yaml(val, &child_key(prefix, &key_str), result);
                    }
                }
            }
            Value::Sequence(seq) if seq.is_empty() => {
                result.insert(prefix.to_string(), String::new());
            }
            Value::Sequence(seq) => {
                for (i, val) in seq.iter().enumerate() {
                    Self::flatten_yaml(val, &index_key(prefix, i), result);
                }
            }
            Value::Tagged(tagged) => Self::flatten_yaml(&tagged.value, prefix, result),
            scalar => {
                let rendered = Self::scalar_to_string(scalar).unwrap_or_default();
                result.insert(prefix.to_string(), rendered);
            }
        }
    }

    /// Renders a scalar as a string; `None` for collections.
    fn scalar_to_string(value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Null => Some(String::new()),
            Value::Tagged(tagged) => Self::scalar_to_string(&tagged.value),
            Value::Mapping(_) | Value::Sequence(_) => None,
        }
    }
}

impl Default for YamlParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigParser for YamlParser {
    fn parse(&self, content: &str) -> Result<IndexMap<String, String>> {
        let mut result = IndexMap::new();

        for document in serde_yaml::Deserializer::from_str(content) {
            let value = Value::deserialize(document).map_err(|e| ConfigError::ParseError {
                message: format!("Failed to parse YAML: {}", e),
                source: Some(Box::new(e)),
            })?;

            match value {
                Value::Null => {}
                Value::Mapping(_) => Self::flatten_yaml(&value, "", &mut result),
                _ => {
                    return Err(ConfigError::ParseError {
                        message: "YAML document root must be a mapping".to_string(),
                        source: None,
                    })
                }
            }
        }

        Ok(result)
    }

    fn supported_extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }
}
