// SPDX-License-Identifier: MIT OR Apache-2.0

//! Document fetcher port.
//!
//! This is the single wire-level boundary of the resolver. Whatever transport
//! the remote configuration service speaks, an adapter reduces it to
//! [`DocumentFetcher::fetch`].

use crate::domain::{DataId, Result};
use std::time::Duration;

/// Fetches raw configuration documents from a remote store.
///
/// # Outcomes
///
/// - `Ok(Some(bytes))`: the document exists.
/// - `Ok(None)`: the document does not exist. This is a normal outcome, profile
///   overlays are optional.
/// - `Err(ConfigError::FetchError)`: transport, timeout or service fault.
///
/// Retries and caching, if any, belong to the implementation.
///
/// # Thread Safety
///
/// Fetchers are shared through `Arc` and may be called from several threads at
/// once when concurrent fetching is enabled.
///
/// # Examples
///
/// ```rust
/// use remotecfg::domain::{DataId, Result};
/// use remotecfg::ports::DocumentFetcher;
/// use std::time::Duration;
///
/// struct Nothing;
///
/// impl DocumentFetcher for Nothing {
///     fn name(&self) -> &str {
///         "nothing"
///     }
///
///     fn fetch(&self, _data_id: &DataId, _group: &str, _timeout: Duration) -> Result<Option<Vec<u8>>> {
///         Ok(None)
///     }
/// }
///
/// let fetched = Nothing
///     .fetch(&DataId::from("app.yaml"), "DEFAULT_GROUP", Duration::from_secs(3))
///     .unwrap();
/// assert!(fetched.is_none());
/// ```
pub trait DocumentFetcher: Send + Sync {
    /// Returns a short name for logs, such as `"etcd"` or `"memory"`.
    fn name(&self) -> &str;

    /// Fetches one document.
    ///
    /// # Arguments
    ///
    /// * `data_id` - The document's data id
    /// * `group` - The group the document lives in
    /// * `timeout` - Upper bound for this single fetch
    fn fetch(&self, data_id: &DataId, group: &str, timeout: Duration) -> Result<Option<Vec<u8>>>;
}
