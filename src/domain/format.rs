// SPDX-License-Identifier: MIT OR Apache-2.0

//! Declared document formats.

use crate::domain::errors::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The format a remote document is declared to be in.
///
/// The format is derived from the identity's file extension. Unknown extensions
/// are rejected rather than guessed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigFormat {
    /// Flat `key=value` property list.
    Properties,
    /// YAML, flattened into dot-joined keys.
    Yaml,
    /// JSON, flattened into dot-joined keys.
    Json,
}

impl ConfigFormat {
    /// Maps a file extension (without the leading dot) to a format.
    ///
    /// Matching is case-insensitive.
    ///
    /// # Examples
    ///
    /// ```
    /// use remotecfg::domain::ConfigFormat;
    ///
    /// assert_eq!(ConfigFormat::from_extension("yml").unwrap(), ConfigFormat::Yaml);
    /// assert!(ConfigFormat::from_extension("ini").is_err());
    /// ```
    pub fn from_extension(extension: &str) -> Result<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "properties" => Ok(ConfigFormat::Properties),
            "yaml" | "yml" => Ok(ConfigFormat::Yaml),
            "json" => Ok(ConfigFormat::Json),
            _ => Err(ConfigError::UnsupportedFormat {
                extension: extension.to_string(),
            }),
        }
    }

    /// Returns the canonical extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Properties => "properties",
            ConfigFormat::Yaml => "yaml",
            ConfigFormat::Json => "json",
        }
    }
}

impl FromStr for ConfigFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_extension(s)
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
