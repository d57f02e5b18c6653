// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration parser trait definition.
//!
//! This module defines the `ConfigParser` trait, which turns the text of one
//! remote document into a flat, ordered key/value mapping.

use crate::domain::Result;
use indexmap::IndexMap;

/// A trait for parsing configuration documents.
///
/// # Key Format
///
/// Parsers must flatten nested structures using dot notation so every format
/// produces the same shape for merging. For example, a YAML document like:
///
/// ```yaml
/// database:
///   host: localhost
///   port: 5432
/// ```
///
/// must be parsed into:
/// - `database.host` -> `"localhost"`
/// - `database.port` -> `"5432"`
///
/// Sequence elements are addressed with an index suffix, `servers[0]`.
///
/// # Examples
///
/// ```rust
/// use indexmap::IndexMap;
/// use remotecfg::domain::Result;
/// use remotecfg::ports::ConfigParser;
///
/// struct LineParser;
///
/// impl ConfigParser for LineParser {
///     fn parse(&self, content: &str) -> Result<IndexMap<String, String>> {
///         Ok(content
///             .lines()
///             .enumerate()
///             .map(|(i, line)| (format!("line.{}", i), line.to_string()))
///             .collect())
///     }
///
///     fn supported_extensions(&self) -> &[&str] {
///         &["txt"]
///     }
/// }
///
/// let result = LineParser.parse("a\nb").unwrap();
/// assert_eq!(result.get("line.1").map(String::as_str), Some("b"));
/// ```
pub trait ConfigParser: Send + Sync {
    /// Parses document content into a flat key/value map in document order.
    ///
    /// # Returns
    ///
    /// * `Ok(IndexMap<String, String>)` - The parsed configuration
    /// * `Err(ConfigError::ParseError)` - The content is malformed
    fn parse(&self, content: &str) -> Result<IndexMap<String, String>>;

    /// Returns the file extensions (without the leading dot) this parser handles.
    fn supported_extensions(&self) -> &[&str];
}
