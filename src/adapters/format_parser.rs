// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dispatch from a declared format to the parser that handles it.

use crate::adapters::PropertiesParser;
#[cfg(feature = "json")]
use crate::adapters::JsonParser;
#[cfg(feature = "yaml")]
use crate::adapters::YamlParser;
use crate::domain::{ConfigError, ConfigFormat, Result};
use crate::ports::ConfigParser;
use indexmap::IndexMap;

/// Byte order mark some editors prepend to UTF-8 documents.
const UTF8_BOM: char = '\u{feff}';

/// Parses raw document bytes according to a declared format.
///
/// Formats whose parser was compiled out with cargo features are reported as
/// unsupported, the same as unknown extensions.
///
/// # Examples
///
/// ```rust
/// use remotecfg::adapters::FormatParser;
/// use remotecfg::domain::ConfigFormat;
///
/// let parser = FormatParser::new();
/// let values = parser.parse(b"a=1\nb=2", ConfigFormat::Properties).unwrap();
/// assert_eq!(values.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FormatParser {
    properties: PropertiesParser,
    #[cfg(feature = "yaml")]
    yaml: YamlParser,
    #[cfg(feature = "json")]
    json: JsonParser,
}

impl FormatParser {
    /// Creates a dispatcher over every parser enabled at compile time.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the parser for a format.
    pub fn parser_for(&self, format: ConfigFormat) -> Result<&dyn ConfigParser> {
        match format {
            ConfigFormat::Properties => Ok(&self.properties),
            #[cfg(feature = "yaml")]
            ConfigFormat::Yaml => Ok(&self.yaml),
            #[cfg(feature = "json")]
            ConfigFormat::Json => Ok(&self.json),
            #[allow(unreachable_patterns)]
            other => Err(ConfigError::UnsupportedFormat {
                extension: other.extension().to_string(),
            }),
        }
    }

    /// Parses raw bytes in the given format.
    ///
    /// The content must be UTF-8; a leading byte order mark is ignored.
    pub fn parse(&self, content: &[u8], format: ConfigFormat) -> Result<IndexMap<String, String>> {
        let parser = self.parser_for(format)?;
        let text = std::str::from_utf8(content)
            .map_err(|e| ConfigError::parse("Document is not valid UTF-8", e))?;
        parser.parse(text.strip_prefix(UTF8_BOM).unwrap_or(text))
    }

    /// Resolves the format from a file extension, then parses.
    pub fn parse_extension(
        &self,
        content: &[u8],
        extension: &str,
    ) -> Result<(ConfigFormat, IndexMap<String, String>)> {
        let format = ConfigFormat::from_extension(extension)?;
        let values = self.parse(content, format)?;
        Ok((format, values))
    }
}
