// SPDX-License-Identifier: MIT OR Apache-2.0

//! Application identity used to resolve configuration layers.

use crate::domain::errors::{ConfigError, Result};
use serde::{Deserialize, Serialize};

/// Group used when the host does not configure one.
pub const DEFAULT_GROUP: &str = "DEFAULT_GROUP";

/// File extension used when the host does not configure one.
pub const DEFAULT_FILE_EXTENSION: &str = "properties";

/// Identity of the application whose remote configuration is being resolved.
///
/// The identity is immutable for the duration of one resolution. The resource
/// prefix is optional; when unset or empty the application name is used.
///
/// # Examples
///
/// ```
/// use remotecfg::domain::AppIdentity;
///
/// let identity = AppIdentity::new("orders")
///     .with_file_extension("yaml")
///     .with_profiles(["dev", "local"]);
///
/// assert_eq!(identity.group(), "DEFAULT_GROUP");
/// assert_eq!(identity.resource_prefix(), "orders");
/// assert_eq!(identity.active_profiles(), ["dev", "local"]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AppIdentity {
    application_name: String,
    #[serde(default = "default_group")]
    group: String,
    #[serde(default, rename = "prefix")]
    resource_prefix: Option<String>,
    #[serde(default = "default_file_extension")]
    file_extension: String,
    #[serde(default)]
    active_profiles: Vec<String>,
}

fn default_group() -> String {
    DEFAULT_GROUP.to_string()
}

fn default_file_extension() -> String {
    DEFAULT_FILE_EXTENSION.to_string()
}

impl AppIdentity {
    /// Creates an identity with the default group, extension and no profiles.
    pub fn new(application_name: impl Into<String>) -> Self {
        Self {
            application_name: application_name.into(),
            group: default_group(),
            resource_prefix: None,
            file_extension: default_file_extension(),
            active_profiles: Vec::new(),
        }
    }

    /// Sets the group the documents live in.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    /// Overrides the resource prefix used to build data ids.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.resource_prefix = Some(prefix.into());
        self
    }

    /// Sets the file extension, which also declares the document format.
    pub fn with_file_extension(mut self, extension: impl Into<String>) -> Self {
        self.file_extension = extension.into();
        self
    }

    /// Replaces the active profiles. Order is significant: later profiles win.
    pub fn with_profiles<I, S>(mut self, profiles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.active_profiles = profiles.into_iter().map(Into::into).collect();
        self
    }

    /// Appends one active profile.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.active_profiles.push(profile.into());
        self
    }

    /// Returns the application name.
    pub fn application_name(&self) -> &str {
        &self.application_name
    }

    /// Returns the group.
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Returns the effective resource prefix.
    ///
    /// An unset or empty prefix falls back to the application name.
    pub fn resource_prefix(&self) -> &str {
        match self.resource_prefix.as_deref() {
            Some(prefix) if !prefix.is_empty() => prefix,
            _ => &self.application_name,
        }
    }

    /// Returns the file extension.
    pub fn file_extension(&self) -> &str {
        &self.file_extension
    }

    /// Returns the active profiles in declaration order.
    pub fn active_profiles(&self) -> &[String] {
        &self.active_profiles
    }

    /// Checks that the identity can produce meaningful data ids.
    ///
    /// The key builder itself accepts anything; this is what loaders call before
    /// handing an identity to the builder.
    pub fn validate(&self) -> Result<()> {
        if self.resource_prefix().is_empty() {
            return Err(ConfigError::InvalidIdentity {
                message: "application name and resource prefix are both empty".to_string(),
            });
        }
        if self.file_extension.is_empty() {
            return Err(ConfigError::InvalidIdentity {
                message: "file extension is empty".to_string(),
            });
        }
        if self.group.is_empty() {
            return Err(ConfigError::InvalidIdentity {
                message: "group is empty".to_string(),
            });
        }
        Ok(())
    }
}
