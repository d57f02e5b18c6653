// SPDX-License-Identifier: MIT OR Apache-2.0

//! Composite builder.
//!
//! Fetches every layer an identity resolves to, parses each in its declared
//! format, and merges the results into one [`CompositeConfiguration`]. Layer
//! failures never abort a build: a failing layer is left out and recorded as a
//! warning, and an unavailable remote service yields an empty composite.

use crate::adapters::FormatParser;
use crate::domain::{
    AppIdentity, CompositeConfiguration, ConfigError, LayerOutcome, LayerRequest, LayerStatus,
    ParsedLayer, ResolutionWarning, Result, WarningKind,
};
use crate::ports::{ChangeCallback, DocumentFetcher, LayerWatcher};
use crate::service::{FetchMode, LayerResolver, ResolverSettings};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

/// Raw result of fetching one layer; `None` if the deadline cut it off.
type FetchSlot = Option<Result<Option<Vec<u8>>>>;

/// What became of one layer during a build.
enum LayerResult {
    Loaded(ParsedLayer),
    NotFound,
    Failed(LayerStatus, ConfigError),
    Abandoned,
}

/// Builds composite configurations from a remote document store.
///
/// The builder holds no per-build state, so one instance can serve any number
/// of `build` calls, including concurrent ones. Each call re-fetches every
/// layer.
///
/// # Examples
///
/// ```rust
/// use remotecfg::adapters::InMemoryConfigStore;
/// use remotecfg::domain::AppIdentity;
/// use remotecfg::service::CompositeBuilder;
///
/// let store = InMemoryConfigStore::new();
/// store.publish("orders.properties", "DEFAULT_GROUP", "a=1\nb=1");
/// store.publish("orders-dev.properties", "DEFAULT_GROUP", "b=2\nc=2");
///
/// let builder = CompositeBuilder::new(store);
/// let config = builder.build(&AppIdentity::new("orders").with_profile("dev"));
///
/// assert_eq!(config.get("a"), Some("1"));
/// assert_eq!(config.get("b"), Some("2"));
/// assert_eq!(config.get("c"), Some("2"));
/// ```
pub struct CompositeBuilder {
    /// Remote collaborator; `None` when the service could not be obtained
    fetcher: Option<Arc<dyn DocumentFetcher>>,
    /// Why the service is missing, reported on every build
    unavailable: Option<String>,
    parser: FormatParser,
    settings: ResolverSettings,
}

impl std::fmt::Debug for CompositeBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeBuilder")
            .field("fetcher", &self.fetcher.as_ref().map(|fetcher| fetcher.name()))
            .field("unavailable", &self.unavailable)
            .field("settings", &self.settings)
            .finish()
    }
}

impl CompositeBuilder {
    /// Creates a builder over a document fetcher with default settings.
    pub fn new<F>(fetcher: F) -> Self
    where
        F: DocumentFetcher + 'static,
    {
        Self::from_shared(Arc::new(fetcher))
    }

    /// Creates a builder over a shared fetcher.
    pub fn from_shared(fetcher: Arc<dyn DocumentFetcher>) -> Self {
        Self {
            fetcher: Some(fetcher),
            unavailable: None,
            parser: FormatParser::new(),
            settings: ResolverSettings::default(),
        }
    }

    /// Creates a builder with no remote service.
    ///
    /// Every build returns an empty composite carrying one
    /// `ServiceUnavailable` warning with `reason`.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            fetcher: None,
            unavailable: Some(reason.into()),
            parser: FormatParser::new(),
            settings: ResolverSettings::default(),
        }
    }

    /// Obtains the fetcher from `factory`.
    ///
    /// A factory error is logged and turns the builder into one without a
    /// service; it is not returned to the caller.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use remotecfg::adapters::InMemoryConfigStore;
    /// use remotecfg::domain::{AppIdentity, ConfigError};
    /// use remotecfg::service::CompositeBuilder;
    ///
    /// let builder = CompositeBuilder::connect(|| -> remotecfg::domain::Result<InMemoryConfigStore> {
    ///     Err(ConfigError::ServiceUnavailable {
    ///         message: "connection refused".to_string(),
    ///         source: None,
    ///     })
    /// });
    ///
    /// let config = builder.build(&AppIdentity::new("orders"));
    /// assert!(config.is_empty());
    /// assert_eq!(config.warnings().len(), 1);
    /// ```
    pub fn connect<F, D>(factory: F) -> Self
    where
        F: FnOnce() -> Result<D>,
        D: DocumentFetcher + 'static,
    {
        match factory() {
            Ok(fetcher) => Self::new(fetcher),
            Err(e) => {
                tracing::warn!("Remote configuration service unavailable: {}", e);
                Self::unavailable(e.to_string())
            }
        }
    }

    /// Replaces the builder's settings.
    pub fn with_settings(mut self, settings: ResolverSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Returns the builder's settings.
    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    /// Returns `true` if a remote service is attached.
    pub fn has_service(&self) -> bool {
        self.fetcher.is_some()
    }

    /// Builds the composite configuration for `identity`.
    ///
    /// Never fails. Layers that are missing contribute nothing; layers that
    /// fail to fetch or parse are skipped with a warning. Later layers override
    /// earlier ones key by key.
    pub fn build(&self, identity: &AppIdentity) -> CompositeConfiguration {
        let name = self.settings.composite_name();

        let fetcher = match &self.fetcher {
            Some(fetcher) => fetcher,
            None => {
                let message = self.unavailable_message();
                tracing::warn!("{}; using an empty configuration", message);
                let warning = ResolutionWarning {
                    data_id: None,
                    kind: WarningKind::ServiceUnavailable,
                    message,
                };
                return CompositeConfiguration::assemble(
                    name,
                    Vec::new(),
                    Vec::new(),
                    vec![warning],
                );
            }
        };

        let requests = LayerResolver::resolve(identity);
        let results = self.load_layers(fetcher, &requests);

        let mut layers = Vec::new();
        let mut outcomes = Vec::with_capacity(requests.len());
        let mut warnings = Vec::new();

        for (request, result) in requests.into_iter().zip(results) {
            let status = match result {
                LayerResult::Loaded(layer) => {
                    tracing::debug!("Loaded layer '{}' with {} keys", request, layer.len());
                    layers.push(layer);
                    LayerStatus::Loaded
                }
                LayerResult::NotFound => {
                    tracing::debug!("Layer '{}' not found, skipping", request);
                    LayerStatus::NotFound
                }
                LayerResult::Failed(status, error) => {
                    tracing::warn!("Skipping layer '{}': {}", request, error);
                    warnings.push(ResolutionWarning {
                        data_id: Some(request.data_id.clone()),
                        kind: warning_kind(status, &error),
                        message: error.to_string(),
                    });
                    status
                }
                LayerResult::Abandoned => {
                    tracing::warn!("Skipping layer '{}': build deadline exceeded", request);
                    warnings.push(ResolutionWarning {
                        data_id: Some(request.data_id.clone()),
                        kind: WarningKind::DeadlineExceeded,
                        message: "Fetch did not complete before the build deadline".to_string(),
                    });
                    LayerStatus::Abandoned
                }
            };
            outcomes.push(LayerOutcome { request, status });
        }

        let composite = CompositeConfiguration::assemble(name, layers, outcomes, warnings);
        tracing::info!(
            "Built configuration '{}' for '{}': {} of {} layers loaded, {} keys, {} warnings",
            composite.name(),
            identity.application_name(),
            composite.layers().len(),
            composite.outcomes().len(),
            composite.len(),
            composite.warnings().len()
        );
        composite
    }

    /// Builds the composite, failing on the first layer error.
    ///
    /// Missing layers are still skipped silently. Unlike [`build`](Self::build),
    /// a missing service, a failed fetch, an unparsable document, or an expired
    /// deadline is returned as an error.
    pub fn try_build(&self, identity: &AppIdentity) -> Result<CompositeConfiguration> {
        let fetcher = self
            .fetcher
            .as_ref()
            .ok_or_else(|| ConfigError::ServiceUnavailable {
                message: self.unavailable_message(),
                source: None,
            })?;

        let requests = LayerResolver::resolve(identity);
        let results = self.load_layers(fetcher, &requests);

        let mut layers = Vec::new();
        let mut outcomes = Vec::with_capacity(requests.len());

        for (request, result) in requests.into_iter().zip(results) {
            let status = match result {
                LayerResult::Loaded(layer) => {
                    layers.push(layer);
                    LayerStatus::Loaded
                }
                LayerResult::NotFound => LayerStatus::NotFound,
                LayerResult::Failed(_, error) => return Err(error),
                LayerResult::Abandoned => {
                    return Err(ConfigError::fetch(
                        request.data_id.as_str(),
                        &request.group,
                        "Fetch did not complete before the build deadline",
                    ))
                }
            };
            outcomes.push(LayerOutcome { request, status });
        }

        Ok(CompositeConfiguration::assemble(
            self.settings.composite_name(),
            layers,
            outcomes,
            Vec::new(),
        ))
    }

    /// Subscribes `watcher` to every layer `identity` resolves to.
    ///
    /// Layers whose documents do not exist yet are included, so publishing a
    /// new overlay triggers the callback. Reacting to a change means calling
    /// [`build`](Self::build) again.
    ///
    /// Returns the watched layers.
    pub fn watch_layers(
        &self,
        identity: &AppIdentity,
        watcher: &mut dyn LayerWatcher,
        callback: ChangeCallback,
    ) -> Result<Vec<LayerRequest>> {
        let layers = LayerResolver::resolve(identity);
        tracing::debug!(
            "Watching {} layers for '{}'",
            layers.len(),
            identity.application_name()
        );
        watcher.watch(&layers, callback)?;
        Ok(layers)
    }

    fn unavailable_message(&self) -> String {
        match &self.unavailable {
            Some(reason) => format!("Remote configuration service unavailable: {}", reason),
            None => "Remote configuration service unavailable".to_string(),
        }
    }

    fn load_layers(
        &self,
        fetcher: &Arc<dyn DocumentFetcher>,
        requests: &[LayerRequest],
    ) -> Vec<LayerResult> {
        let deadline = self.settings.deadline().map(|d| Instant::now() + d);

        // A deadline is only enforceable when fetches run off the calling thread.
        let slots = match (self.settings.fetch_mode(), deadline) {
            (FetchMode::Concurrent, _) if requests.len() > 1 || deadline.is_some() => {
                self.fetch_concurrent(fetcher, requests, deadline)
            }
            (_, Some(at)) => self.fetch_sequential_watched(fetcher, requests, at),
            (_, None) => self.fetch_sequential(&**fetcher, requests),
        };

        requests
            .iter()
            .zip(slots)
            .map(|(request, slot)| match slot {
                None => LayerResult::Abandoned,
                Some(Ok(None)) => LayerResult::NotFound,
                Some(Ok(Some(content))) => self.parse_layer(request, &content),
                Some(Err(e)) => LayerResult::Failed(LayerStatus::FetchFailed, e),
            })
            .collect()
    }

    /// Per-fetch timeout, shortened so a fetch cannot outlive the deadline.
    fn fetch_timeout(&self, deadline: Option<Instant>) -> Option<Duration> {
        let timeout = self.settings.fetch_timeout();
        match deadline {
            None => Some(timeout),
            Some(at) => {
                let remaining = at.checked_duration_since(Instant::now())?;
                if remaining.is_zero() {
                    None
                } else {
                    Some(timeout.min(remaining))
                }
            }
        }
    }

    fn fetch_sequential(
        &self,
        fetcher: &dyn DocumentFetcher,
        requests: &[LayerRequest],
    ) -> Vec<FetchSlot> {
        let timeout = self.settings.fetch_timeout();
        requests
            .iter()
            .map(|request| Some(fetcher.fetch(&request.data_id, &request.group, timeout)))
            .collect()
    }

    /// Fetches one layer at a time, each on a worker thread, so a fetcher that
    /// overruns its timeout cannot hold the build past the deadline.
    fn fetch_sequential_watched(
        &self,
        fetcher: &Arc<dyn DocumentFetcher>,
        requests: &[LayerRequest],
        deadline: Instant,
    ) -> Vec<FetchSlot> {
        let mut slots = Vec::with_capacity(requests.len());
        for request in requests {
            let slot = self.fetch_timeout(Some(deadline)).and_then(|timeout| {
                let (tx, rx) = mpsc::channel();
                let fetcher = Arc::clone(fetcher);
                let request = request.clone();
                thread::spawn(move || {
                    let _ = tx.send(fetcher.fetch(&request.data_id, &request.group, timeout));
                });
                rx.recv_timeout(deadline.saturating_duration_since(Instant::now())).ok()
            });
            slots.push(slot);
        }
        slots
    }

    fn fetch_concurrent(
        &self,
        fetcher: &Arc<dyn DocumentFetcher>,
        requests: &[LayerRequest],
        deadline: Option<Instant>,
    ) -> Vec<FetchSlot> {
        let mut slots: Vec<FetchSlot> = requests.iter().map(|_| None).collect();
        let (tx, rx) = mpsc::channel();
        let mut pending = 0;

        for (index, request) in requests.iter().enumerate() {
            let Some(timeout) = self.fetch_timeout(deadline) else {
                break;
            };
            let tx = tx.clone();
            let fetcher = Arc::clone(fetcher);
            let request = request.clone();
            thread::spawn(move || {
                let result = fetcher.fetch(&request.data_id, &request.group, timeout);
                // The receiver is gone if the deadline already passed.
                let _ = tx.send((index, result));
            });
            pending += 1;
        }
        drop(tx);

        while pending > 0 {
            let received = match deadline {
                Some(at) => match at.checked_duration_since(Instant::now()) {
                    Some(remaining) => rx.recv_timeout(remaining).ok(),
                    None => None,
                },
                None => rx.recv().ok(),
            };
            let Some((index, result)) = received else {
                break;
            };
            slots[index] = Some(result);
            pending -= 1;
        }

        slots
    }

    fn parse_layer(&self, request: &LayerRequest, content: &[u8]) -> LayerResult {
        match self.parser.parse_extension(content, &request.extension) {
            Ok((format, values)) => LayerResult::Loaded(ParsedLayer::new(
                request.data_id.clone(),
                request.group.clone(),
                format,
                values,
            )),
            Err(e) => LayerResult::Failed(LayerStatus::ParseFailed, e),
        }
    }
}

/// Classifies a layer failure by the stage it failed in.
fn warning_kind(status: LayerStatus, error: &ConfigError) -> WarningKind {
    match (status, error) {
        (LayerStatus::FetchFailed, _) => WarningKind::FetchFailed,
        (_, ConfigError::UnsupportedFormat { .. }) => WarningKind::UnsupportedFormat,
        _ => WarningKind::ParseFailed,
    }
}
