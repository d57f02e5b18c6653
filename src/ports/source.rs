// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-only property source port.
//!
//! This is the output contract towards the host application's own environment
//! abstraction. Both individual [`ParsedLayer`](crate::domain::ParsedLayer)s and
//! the merged [`CompositeConfiguration`](crate::domain::CompositeConfiguration)
//! implement it, so the host can mount either one.

/// A named, read-only set of resolved configuration properties.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so resolved configuration can be shared
/// across threads once startup is complete.
///
/// # Examples
///
/// ```rust
/// use remotecfg::ports::ConfigSource;
///
/// struct Fixed;
///
/// impl ConfigSource for Fixed {
///     fn name(&self) -> &str {
///         "fixed"
///     }
///
///     fn get(&self, key: &str) -> Option<&str> {
///         (key == "answer").then_some("42")
///     }
///
///     fn all_keys(&self) -> Vec<&str> {
///         vec!["answer"]
///     }
/// }
///
/// let source = Fixed;
/// assert_eq!(source.get("answer"), Some("42"));
/// assert!(!source.contains_key("question"));
/// ```
pub trait ConfigSource: Send + Sync {
    /// Returns the name of this source, used in logs and diagnostics.
    fn name(&self) -> &str;

    /// Returns the value for a key, or `None` if the source does not define it.
    fn get(&self, key: &str) -> Option<&str>;

    /// Returns every key this source defines.
    fn all_keys(&self) -> Vec<&str>;

    /// Returns `true` if the source defines the key.
    fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}
