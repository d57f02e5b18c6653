// SPDX-License-Identifier: MIT OR Apache-2.0

//! Settings that control how the composite builder runs.

use crate::domain::{ConfigError, DEFAULT_COMPOSITE_NAME};
use std::str::FromStr;
use std::time::Duration;

/// Per-fetch timeout used when none is configured.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_millis(3000);

/// How layer fetches are scheduled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FetchMode {
    /// Fetch layers one after another on the calling thread.
    #[default]
    Sequential,
    /// Fetch every layer on its own thread and wait for all of them.
    Concurrent,
}

impl FromStr for FetchMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" => Ok(FetchMode::Sequential),
            "concurrent" => Ok(FetchMode::Concurrent),
            other => Err(ConfigError::InvalidIdentity {
                message: format!(
                    "unknown fetch mode '{}' (expected 'sequential' or 'concurrent')",
                    other
                ),
            }),
        }
    }
}

/// Resolver settings.
///
/// # Examples
///
/// ```rust
/// use remotecfg::service::{FetchMode, ResolverSettings};
/// use std::time::Duration;
///
/// let settings = ResolverSettings::default()
///     .with_fetch_timeout(Duration::from_millis(500))
///     .with_deadline(Duration::from_secs(2))
///     .with_fetch_mode(FetchMode::Concurrent);
///
/// assert_eq!(settings.fetch_timeout(), Duration::from_millis(500));
/// assert_eq!(settings.composite_name(), "REMOTE");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolverSettings {
    fetch_timeout: Duration,
    deadline: Option<Duration>,
    fetch_mode: FetchMode,
    composite_name: String,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            deadline: None,
            fetch_mode: FetchMode::default(),
            composite_name: DEFAULT_COMPOSITE_NAME.to_string(),
        }
    }
}

impl ResolverSettings {
    /// Sets the timeout handed to the fetcher for each layer.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Sets the timeout from milliseconds.
    pub fn with_fetch_timeout_millis(self, millis: u64) -> Self {
        self.with_fetch_timeout(Duration::from_millis(millis))
    }

    /// Bounds a whole `build` call. Layers still pending at expiry are skipped.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Selects sequential or concurrent fetching.
    pub fn with_fetch_mode(mut self, mode: FetchMode) -> Self {
        self.fetch_mode = mode;
        self
    }

    /// Names the composites produced by the builder.
    pub fn with_composite_name(mut self, name: impl Into<String>) -> Self {
        self.composite_name = name.into();
        self
    }

    /// Returns the per-fetch timeout.
    pub fn fetch_timeout(&self) -> Duration {
        self.fetch_timeout
    }

    /// Returns the overall build deadline, if any.
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Returns the fetch mode.
    pub fn fetch_mode(&self) -> FetchMode {
        self.fetch_mode
    }

    /// Returns the composite name.
    pub fn composite_name(&self) -> &str {
        &self.composite_name
    }
}
