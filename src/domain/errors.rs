// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the remote configuration resolver.
//!
//! A document that does not exist in the remote store is *not* an error: fetchers
//! report it as `Ok(None)`. Everything else that can go wrong while resolving,
//! fetching, or parsing a layer is represented by [`ConfigError`].

use thiserror::Error;

/// The main error type for resolver operations.
///
/// The composite builder never surfaces per-layer errors to its caller. It
/// downgrades them into warnings so that one broken overlay cannot block
/// application startup. The variants are still public so that fetchers, parsers,
/// and callers using the strict build path can report precise failures.
///
/// # Examples
///
/// ```
/// use remotecfg::domain::errors::ConfigError;
///
/// let error = ConfigError::UnsupportedFormat {
///     extension: "ini".to_string(),
/// };
/// assert_eq!(error.to_string(), "Unsupported configuration format: ini");
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// Fetching a document from the remote collaborator failed.
    ///
    /// This covers transport faults, timeouts, and errors reported by the remote
    /// service. It never means "document absent".
    #[error("Failed to fetch '{data_id}' (group '{group}'): {message}")]
    FetchError {
        /// The data id of the document being fetched
        data_id: String,
        /// The group of the document being fetched
        group: String,
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A document could not be parsed in its declared format.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// The error message
        message: String,
        /// The underlying parsing error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The declared file extension does not map to any known parser.
    #[error("Unsupported configuration format: {extension}")]
    UnsupportedFormat {
        /// The extension that could not be mapped to a format
        extension: String,
    },

    /// The remote configuration collaborator could not be obtained at all.
    #[error("Remote configuration service unavailable: {message}")]
    ServiceUnavailable {
        /// The error message
        message: String,
        /// The underlying error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The application identity is incomplete or malformed.
    #[error("Invalid application identity: {message}")]
    InvalidIdentity {
        /// The error message
        message: String,
    },

    /// Failed to convert a resolved value to the requested type.
    #[error(
        "Failed to convert configuration value for key '{key}' to type {target_type}: {source}"
    )]
    TypeConversionError {
        /// The key being converted
        key: String,
        /// The target type name
        target_type: String,
        /// The underlying conversion error
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An error occurred while subscribing to layer changes.
    #[error("Layer watcher error: {message}")]
    WatcherError {
        /// The error message
        message: String,
        /// The underlying error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ConfigError {
    /// Creates a `FetchError` with no underlying cause.
    pub fn fetch(
        data_id: impl Into<String>,
        group: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ConfigError::FetchError {
            data_id: data_id.into(),
            group: group.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Creates a `ParseError` wrapping the given cause.
    pub fn parse<E>(message: impl Into<String>, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ConfigError::ParseError {
            message: message.into(),
            source: Some(Box::new(err)),
        }
    }
}

/// A specialized Result type for resolver operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_display() {
        let error = ConfigError::fetch("app-dev.yaml", "DEFAULT_GROUP", "timed out");
        assert_eq!(
            error.to_string(),
            "Failed to fetch 'app-dev.yaml' (group 'DEFAULT_GROUP'): timed out"
        );
    }

    #[test]
    fn test_parse_error_keeps_source() {
        let cause = std::io::Error::new(std::io::ErrorKind::InvalidData, "bad bytes");
        let error = ConfigError::parse("Document is not valid UTF-8", cause);
        assert!(std::error::Error::source(&error).is_some());
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration: Document is not valid UTF-8"
        );
    }

    #[test]
    fn test_unsupported_format() {
        let error = ConfigError::UnsupportedFormat {
            extension: "xml".to_string(),
        };
        assert!(error.to_string().contains("xml"));
    }

    #[test]
    fn test_service_unavailable() {
        let error = ConfigError::ServiceUnavailable {
            message: "no endpoints configured".to_string(),
            source: None,
        };
        assert_eq!(
            error.to_string(),
            "Remote configuration service unavailable: no endpoints configured"
        );
    }

    #[test]
    fn test_type_conversion_error() {
        let source_error = "invalid value".parse::<i32>().unwrap_err();
        let error = ConfigError::TypeConversionError {
            key: "server.port".to_string(),
            target_type: "i32".to_string(),
            source: Box::new(source_error),
        };
        assert!(error.to_string().contains("server.port"));
        assert!(error.to_string().contains("i32"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let error = ConfigError::from(io_error);
        assert!(matches!(error, ConfigError::IoError(_)));
    }
}
