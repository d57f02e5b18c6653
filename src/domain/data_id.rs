// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resource key (data id) newtype and the canonical key builder.
//!
//! Every configuration document in the remote store is addressed by a data id.
//! The data id of a layer is derived from the application's resource prefix,
//! an optional profile, and the file extension:
//!
//! - base document: `{prefix}.{extension}`
//! - profile overlay: `{prefix}-{profile}.{extension}`

use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between the resource prefix and the profile name.
pub const PROFILE_SEPARATOR: &str = "-";

/// Separator between the key stem and the file extension.
pub const EXTENSION_SEPARATOR: &str = ".";

/// A type-safe wrapper for remote resource keys.
///
/// # Examples
///
/// ```
/// use remotecfg::domain::DataId;
///
/// let base = DataId::build("orders", None, "yaml");
/// let overlay = DataId::build("orders", Some("dev"), "yaml");
///
/// assert_eq!(base.as_str(), "orders.yaml");
/// assert_eq!(overlay.as_str(), "orders-dev.yaml");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataId(String);

impl DataId {
    /// Wraps an already-formed data id.
    pub fn new(id: String) -> Self {
        DataId(id)
    }

    /// Composes the canonical data id for a prefix, optional profile and extension.
    ///
    /// This is plain string composition. An empty prefix is accepted and yields a
    /// key starting with a separator; validating the prefix is the caller's job.
    /// The extension is not checked either.
    ///
    /// # Examples
    ///
    /// ```
    /// use remotecfg::domain::DataId;
    ///
    /// assert_eq!(DataId::build("", None, "properties").as_str(), ".properties");
    /// assert_eq!(DataId::build("app", Some("prod"), "yml").as_str(), "app-prod.yml");
    /// ```
    pub fn build(prefix: &str, profile: Option<&str>, extension: &str) -> Self {
        let mut id = String::with_capacity(
            prefix.len() + profile.map_or(0, |p| p.len() + 1) + extension.len() + 1,
        );
        id.push_str(prefix);
        if let Some(profile) = profile {
            id.push_str(PROFILE_SEPARATOR);
            id.push_str(profile);
        }
        id.push_str(EXTENSION_SEPARATOR);
        id.push_str(extension);
        DataId(id)
    }

    /// Returns the data id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Converts the `DataId` into its inner `String`.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for DataId {
    fn from(s: String) -> Self {
        DataId(s)
    }
}

impl From<&str> for DataId {
    fn from(s: &str) -> Self {
        DataId(s.to_string())
    }
}

impl From<DataId> for String {
    fn from(id: DataId) -> Self {
        id.0
    }
}

impl AsRef<str> for DataId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DataId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
