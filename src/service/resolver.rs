// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layer resolution: which documents apply to an identity, in which order.

use crate::domain::{AppIdentity, DataId, LayerRequest};

/// Computes the ordered layer list for an identity.
///
/// The base document always comes first, followed by one overlay per active
/// profile in declaration order. This order is the precedence contract: later
/// entries override earlier ones. Duplicate profiles are not collapsed.
///
/// # Examples
///
/// ```rust
/// use remotecfg::domain::AppIdentity;
/// use remotecfg::service::LayerResolver;
///
/// let identity = AppIdentity::new("orders")
///     .with_file_extension("yaml")
///     .with_profiles(["dev", "local"]);
///
/// let ids: Vec<String> = LayerResolver::resolve(&identity)
///     .into_iter()
///     .map(|layer| layer.data_id.into_string())
///     .collect();
///
/// assert_eq!(ids, ["orders.yaml", "orders-dev.yaml", "orders-local.yaml"]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LayerResolver;

impl LayerResolver {
    /// Resolves the layers for `identity`, lowest precedence first.
    pub fn resolve(identity: &AppIdentity) -> Vec<LayerRequest> {
        let prefix = identity.resource_prefix();
        let extension = identity.file_extension();
        let group = identity.group();

        let base = std::iter::once(None);
        let overlays = identity.active_profiles().iter().map(|p| Some(p.as_str()));

        base.chain(overlays)
            .map(|profile| {
                LayerRequest::new(DataId::build(prefix, profile, extension), group, extension)
            })
            .collect()
    }
}
