// SPDX-License-Identifier: MIT OR Apache-2.0

//! Environment variable identity loader.
//!
//! This module builds an [`AppIdentity`] and [`ResolverSettings`] from
//! environment variables, so a host can configure remote resolution without
//! code changes.

use crate::domain::{AppIdentity, ConfigError, Result};
use crate::service::{FetchMode, ResolverSettings};
use std::collections::HashMap;
use std::env;
use std::time::Duration;

/// Prefix used when none is given.
pub const DEFAULT_ENV_PREFIX: &str = "REMOTECFG_";

/// Maximum length for environment variable values (prevents DoS)
const MAX_ENV_VALUE_LEN: usize = 1048576; // 1MB

/// Loads the application identity from environment variables.
///
/// With the default prefix the following variables are read:
///
/// | Variable                     | Meaning                                  |
/// |------------------------------|------------------------------------------|
/// | `REMOTECFG_NAME`             | application name (required)              |
/// | `REMOTECFG_GROUP`            | group                                    |
/// | `REMOTECFG_PREFIX`           | resource prefix                          |
/// | `REMOTECFG_FILE_EXTENSION`   | file extension                           |
/// | `REMOTECFG_ACTIVE_PROFILES`  | comma separated profiles                 |
/// | `REMOTECFG_TIMEOUT`          | per-fetch timeout in milliseconds        |
/// | `REMOTECFG_DEADLINE`         | overall build deadline in milliseconds   |
/// | `REMOTECFG_FETCH_MODE`       | `sequential` or `concurrent`             |
///
/// Empty variables are treated as unset.
///
/// # Examples
///
/// ```rust
/// use remotecfg::adapters::EnvIdentityLoader;
/// use std::collections::HashMap;
///
/// let mut values = HashMap::new();
/// values.insert("REMOTECFG_NAME".to_string(), "orders".to_string());
/// values.insert("REMOTECFG_ACTIVE_PROFILES".to_string(), "dev, local".to_string());
///
/// let identity = EnvIdentityLoader::with_values(values).load_identity().unwrap();
/// assert_eq!(identity.application_name(), "orders");
/// assert_eq!(identity.active_profiles(), ["dev", "local"]);
/// ```
#[derive(Debug, Clone)]
pub struct EnvIdentityLoader {
    /// Prefix prepended to every variable name
    prefix: String,
    /// Fixed values used instead of the process environment
    values: Option<HashMap<String, String>>,
}

impl EnvIdentityLoader {
    /// Creates a loader reading `REMOTECFG_*` variables.
    pub fn new() -> Self {
        Self::with_prefix(DEFAULT_ENV_PREFIX)
    }

    /// Creates a loader reading variables with a custom prefix.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use remotecfg::adapters::EnvIdentityLoader;
    ///
    /// // Reads ORDERS_NAME, ORDERS_GROUP, ...
    /// let loader = EnvIdentityLoader::with_prefix("ORDERS_");
    /// ```
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            values: None,
        }
    }

    /// Creates a loader over fixed values instead of the process environment.
    ///
    /// Keys are full variable names, prefix included. Primarily intended for
    /// tests.
    pub fn with_values(values: HashMap<String, String>) -> Self {
        Self {
            prefix: DEFAULT_ENV_PREFIX.to_string(),
            values: Some(values),
        }
    }

    /// Returns the variable prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn lookup(&self, name: &str) -> Option<String> {
        let key = format!("{}{}", self.prefix, name);
        let value = match &self.values {
            Some(values) => values.get(&key).cloned(),
            None => env::var(&key).ok(),
        }?;

        if value.len() > MAX_ENV_VALUE_LEN {
            tracing::debug!(
                "Ignoring oversized environment variable '{}': value_len={} (max={})",
                key,
                value.len(),
                MAX_ENV_VALUE_LEN
            );
            return None;
        }

        let value = value.trim();
        (!value.is_empty()).then(|| value.to_string())
    }

    fn lookup_millis(&self, name: &str) -> Result<Option<Duration>> {
        self.lookup(name)
            .map(|raw| {
                raw.parse::<u64>()
                    .map(Duration::from_millis)
                    .map_err(|e| ConfigError::TypeConversionError {
                        key: format!("{}{}", self.prefix, name),
                        target_type: "u64".to_string(),
                        source: Box::new(e),
                    })
            })
            .transpose()
    }

    /// Loads the application identity.
    ///
    /// # Errors
    ///
    /// Returns `InvalidIdentity` if the name variable is missing or the
    /// resulting identity does not validate.
    pub fn load_identity(&self) -> Result<AppIdentity> {
        let name = self
            .lookup("NAME")
            .ok_or_else(|| ConfigError::InvalidIdentity {
                message: format!("{}NAME is not set", self.prefix),
            })?;

        let mut identity = AppIdentity::new(name);
        if let Some(group) = self.lookup("GROUP") {
            identity = identity.with_group(group);
        }
        if let Some(prefix) = self.lookup("PREFIX") {
            identity = identity.with_prefix(prefix);
        }
        if let Some(extension) = self.lookup("FILE_EXTENSION") {
            identity = identity.with_file_extension(extension);
        }
        if let Some(profiles) = self.lookup("ACTIVE_PROFILES") {
            identity = identity.with_profiles(split_profiles(&profiles));
        }

        identity.validate()?;

        tracing::debug!(
            "Loaded identity '{}' from environment (prefix={}, profiles={:?})",
            identity.application_name(),
            self.prefix,
            identity.active_profiles()
        );

        Ok(identity)
    }

    /// Loads resolver settings, starting from the defaults.
    pub fn load_settings(&self) -> Result<ResolverSettings> {
        let mut settings = ResolverSettings::default();
        if let Some(timeout) = self.lookup_millis("TIMEOUT")? {
            settings = settings.with_fetch_timeout(timeout);
        }
        if let Some(deadline) = self.lookup_millis("DEADLINE")? {
            settings = settings.with_deadline(deadline);
        }
        if let Some(mode) = self.lookup("FETCH_MODE") {
            settings = settings.with_fetch_mode(mode.parse::<FetchMode>()?);
        }
        Ok(settings)
    }

    /// Loads both the identity and the settings.
    pub fn load(&self) -> Result<(AppIdentity, ResolverSettings)> {
        Ok((self.load_identity()?, self.load_settings()?))
    }
}

impl Default for EnvIdentityLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Splits a comma separated profile list, dropping blanks.
fn split_profiles(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|profile| !profile.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Helper to set and clean up environment variables
    struct EnvGuard {
        keys: Vec<String>,
    }

    impl EnvGuard {
        fn new() -> Self {
            EnvGuard { keys: Vec::new() }
        }

        fn set(&mut self, key: &str, value: &str) {
            env::set_var(key, value);
            self.keys.push(key.to_string());
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for key in &self.keys {
                env::remove_var(key);
            }
        }
    }

    fn loader(pairs: &[(&str, &str)]) -> EnvIdentityLoader {
        EnvIdentityLoader::with_values(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_minimal_identity_uses_defaults() {
        let identity = loader(&[("REMOTECFG_NAME", "orders")])
            .load_identity()
            .unwrap();

        assert_eq!(identity.application_name(), "orders");
        assert_eq!(identity.group(), "DEFAULT_GROUP");
        assert_eq!(identity.file_extension(), "properties");
        assert!(identity.active_profiles().is_empty());
    }

    #[test]
    fn test_full_identity() {
        let identity = loader(&[
            ("REMOTECFG_NAME", "orders"),
            ("REMOTECFG_GROUP", "TEAM_A"),
            ("REMOTECFG_PREFIX", "shared"),
            ("REMOTECFG_FILE_EXTENSION", "yaml"),
            ("REMOTECFG_ACTIVE_PROFILES", " dev, ,local,"),
        ])
        .load_identity()
        .unwrap();

        assert_eq!(identity.group(), "TEAM_A");
        assert_eq!(identity.resource_prefix(), "shared");
        assert_eq!(identity.file_extension(), "yaml");
        assert_eq!(identity.active_profiles(), ["dev", "local"]);
    }

    #[test]
    fn test_missing_name_is_invalid() {
        let result = loader(&[("REMOTECFG_GROUP", "G")]).load_identity();
        assert!(matches!(result, Err(ConfigError::InvalidIdentity { .. })));
    }

    #[test]
    fn test_blank_name_is_invalid() {
        let result = loader(&[("REMOTECFG_NAME", "   ")]).load_identity();
        assert!(matches!(result, Err(ConfigError::InvalidIdentity { .. })));
    }

    #[test]
    fn test_settings() {
        let settings = loader(&[
            ("REMOTECFG_TIMEOUT", "500"),
            ("REMOTECFG_DEADLINE", "2000"),
            ("REMOTECFG_FETCH_MODE", "concurrent"),
        ])
        .load_settings()
        .unwrap();

        assert_eq!(settings.fetch_timeout(), Duration::from_millis(500));
        assert_eq!(settings.deadline(), Some(Duration::from_millis(2000)));
        assert_eq!(settings.fetch_mode(), FetchMode::Concurrent);
    }

    #[test]
    fn test_bad_timeout_is_conversion_error() {
        let result = loader(&[("REMOTECFG_TIMEOUT", "soon")]).load_settings();
        assert!(matches!(
            result,
            Err(ConfigError::TypeConversionError { ref key, .. }) if key == "REMOTECFG_TIMEOUT"
        ));
    }

    #[test]
    fn test_reads_process_environment_with_prefix() {
        let mut guard = EnvGuard::new();
        guard.set("ENVLOADERTEST_NAME", "billing");
        guard.set("ENVLOADERTEST_ACTIVE_PROFILES", "prod");

        let (identity, settings) = EnvIdentityLoader::with_prefix("ENVLOADERTEST_")
            .load()
            .unwrap();

        assert_eq!(identity.application_name(), "billing");
        assert_eq!(identity.active_profiles(), ["prod"]);
        assert_eq!(settings, ResolverSettings::default());
    }

    #[test]
    fn test_split_profiles() {
        assert_eq!(split_profiles("a,b , c"), vec!["a", "b", "c"]);
        assert!(split_profiles(" , ").is_empty());
    }
}
