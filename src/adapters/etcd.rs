// SPDX-License-Identifier: MIT OR Apache-2.0

//! etcd document fetcher.
//!
//! Each configuration document is stored whole under one etcd key:
//! `{root}{group}/{data_id}`.

use crate::adapters::runtime::block_on;
use crate::domain::{ConfigError, DataId, Result};
use crate::ports::DocumentFetcher;
use etcd_client::Client;
use std::time::Duration;

/// Builds `{root}{group}/{data_id}`.
pub(crate) fn document_path(root: &str, data_id: &DataId, group: &str) -> String {
    format!("{}{}/{}", root, group, data_id)
}

/// Fetches configuration documents from an etcd cluster.
///
/// # Examples
///
/// ```rust,no_run
/// use remotecfg::adapters::EtcdFetcher;
/// use remotecfg::ports::DocumentFetcher;
/// use remotecfg::domain::DataId;
/// use std::time::Duration;
///
/// # fn main() -> remotecfg::domain::Result<()> {
/// let fetcher = EtcdFetcher::connect(vec!["localhost:2379"], Some("config/"))?;
/// let document = fetcher.fetch(
///     &DataId::from("orders.yaml"),
///     "DEFAULT_GROUP",
///     Duration::from_secs(3),
/// )?;
/// # Ok(())
/// # }
/// ```
pub struct EtcdFetcher {
    /// etcd client
    client: Client,
    /// Key prefix all documents live under
    root: String,
}

impl std::fmt::Debug for EtcdFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EtcdFetcher").field("root", &self.root).finish()
    }
}

impl EtcdFetcher {
    /// Connects to etcd.
    ///
    /// # Arguments
    ///
    /// * `endpoints` - List of etcd endpoints (e.g., `["localhost:2379"]`)
    /// * `root` - Optional key prefix for namespacing (e.g., `"config/"`)
    ///
    /// # Errors
    ///
    /// Returns `ServiceUnavailable` if no connection can be established.
    pub fn connect<S: AsRef<str>>(endpoints: Vec<S>, root: Option<&str>) -> Result<Self> {
        let endpoints: Vec<String> = endpoints.iter().map(|s| s.as_ref().to_string()).collect();

        let client = block_on(async move { Client::connect(&endpoints, None).await }).map_err(
            |e| ConfigError::ServiceUnavailable {
                message: format!("Failed to connect to etcd: {}", e),
                source: Some(Box::new(e)),
            },
        )?;

        Ok(Self {
            client,
            root: root.unwrap_or_default().to_string(),
        })
    }

    /// Returns the etcd key a document is stored under.
    pub fn document_path(&self, data_id: &DataId, group: &str) -> String {
        document_path(&self.root, data_id, group)
    }
}

impl DocumentFetcher for EtcdFetcher {
    fn name(&self) -> &str {
        "etcd"
    }

    fn fetch(&self, data_id: &DataId, group: &str, timeout: Duration) -> Result<Option<Vec<u8>>> {
        let path = self.document_path(data_id, group);
        let mut client = self.client.clone();

        let outcome =
            block_on(async move { tokio::time::timeout(timeout, client.get(path, None)).await });

        match outcome {
            Err(_) => Err(ConfigError::fetch(
                data_id.as_str(),
                group,
                format!("etcd request timed out after {}ms", timeout.as_millis()),
            )),
            Ok(Err(e)) => Err(ConfigError::FetchError {
                data_id: data_id.to_string(),
                group: group.to_string(),
                message: format!("etcd request failed: {}", e),
                source: Some(Box::new(e)),
            }),
            Ok(Ok(response)) => Ok(response.kvs().first().map(|kv| kv.value().to_vec())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_path() {
        let path = document_path("config/", &DataId::from("orders-dev.yaml"), "DEFAULT_GROUP");
        assert_eq!(path, "config/DEFAULT_GROUP/orders-dev.yaml");
        assert_eq!(document_path("", &DataId::from("a.yaml"), "G"), "G/a.yaml");
    }

    #[test]
    fn test_malformed_endpoint_is_service_unavailable() {
        let result = EtcdFetcher::connect(vec!["http://bad host:2379"], None);
        assert!(matches!(result, Err(ConfigError::ServiceUnavailable { .. })));
    }
}
