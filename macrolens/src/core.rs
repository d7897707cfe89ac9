use std::sync::Arc;
use std::time::Duration;

use macrolens_core::{CacheStore, MacrolensConnector};
use macrolens_middleware::{CacheCoordinator, MemoryStore};
use macrolens_types::{DegradedPolicy, MacrolensConfig, MacrolensError};

/// Default capacity of the built-in in-memory cache store.
const DEFAULT_CACHE_CAPACITY: usize = 256;

/// Orchestrator that routes series, curve, and discovery requests across
/// registered providers.
pub struct Macrolens {
    pub(crate) connectors: Vec<Arc<dyn MacrolensConnector>>,
    pub(crate) cfg: MacrolensConfig,
    pub(crate) coordinator: CacheCoordinator,
}

impl std::fmt::Debug for Macrolens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Macrolens")
            .field("connectors", &self.connectors.len())
            .field("cfg", &self.cfg)
            .finish_non_exhaustive()
    }
}

/// Builder for constructing a `Macrolens` engine with custom configuration.
pub struct MacrolensBuilder {
    connectors: Vec<Arc<dyn MacrolensConnector>>,
    cfg: MacrolensConfig,
    store: Option<Arc<dyn CacheStore>>,
}

impl Default for MacrolensBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MacrolensBuilder {
    /// Create a new builder with default configuration.
    ///
    /// Starts with no connectors; register at least one via
    /// [`with_connector`](Self::with_connector). Unless overridden, the engine
    /// uses a 30s provider timeout, one-hour cache freshness windows, an
    /// in-memory LRU store, and the stale-serving policy resolved from
    /// `MACROLENS_ENV`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            connectors: vec![],
            cfg: MacrolensConfig::default(),
            store: None,
        }
    }

    /// Register a provider connector.
    ///
    /// Registration order is the priority order: earlier connectors are tried
    /// first for every capability they advertise. Duplicates are not
    /// deduplicated.
    #[must_use]
    pub fn with_connector(mut self, c: Arc<dyn MacrolensConnector>) -> Self {
        self.connectors.push(c);
        self
    }

    /// Inject a cache store, replacing the built-in in-memory LRU.
    ///
    /// Any `CacheStore` implementation works here, which is how a shared or
    /// persistent cache plugs in.
    #[must_use]
    pub fn cache_store(mut self, store: Arc<dyn CacheStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the per-provider request timeout.
    #[must_use]
    pub const fn provider_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.provider_timeout = timeout;
        self
    }

    /// Set the freshness window for cached series payloads.
    #[must_use]
    pub const fn series_ttl(mut self, ttl: Duration) -> Self {
        self.cfg.series_ttl = ttl;
        self
    }

    /// Set the freshness window for cached curve snapshots.
    #[must_use]
    pub const fn curve_ttl(mut self, ttl: Duration) -> Self {
        self.cfg.curve_ttl = ttl;
        self
    }

    /// Override the stale-serving policy resolved from the environment.
    #[must_use]
    pub const fn degraded_policy(mut self, policy: DegradedPolicy) -> Self {
        self.cfg.degraded_policy = policy;
        self
    }

    /// Build the `Macrolens` engine.
    ///
    /// # Errors
    /// Returns `InvalidArg` if no connectors have been registered via
    /// [`with_connector`](Self::with_connector).
    pub fn build(self) -> Result<Macrolens, MacrolensError> {
        if self.connectors.is_empty() {
            return Err(MacrolensError::InvalidArg(
                "no connectors registered; add at least one via with_connector(...)".to_string(),
            ));
        }
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryStore::new(DEFAULT_CACHE_CAPACITY)));
        let coordinator = CacheCoordinator::new(store, self.cfg.degraded_policy);
        Ok(Macrolens {
            connectors: self.connectors,
            cfg: self.cfg,
            coordinator,
        })
    }
}

/// Attribute an otherwise anonymous error to the connector that produced it.
pub(crate) fn tag_err(connector: &str, e: MacrolensError) -> MacrolensError {
    match e {
        e @ (MacrolensError::NotFound { .. }
        | MacrolensError::NotConfigured { .. }
        | MacrolensError::NotSupported { .. }
        | MacrolensError::NotAvailable { .. }
        | MacrolensError::Upstream { .. }
        | MacrolensError::ProviderTimeout { .. }
        | MacrolensError::AllProvidersFailed(_)) => e,
        other => MacrolensError::upstream(connector.to_string(), other.to_string()),
    }
}

impl Macrolens {
    /// Start building a new `Macrolens` engine.
    ///
    /// ```rust,ignore
    /// use std::sync::Arc;
    ///
    /// let fred = Arc::new(FredConnector::builder().api_key_from_env().build());
    /// let ecb = Arc::new(EcbConnector::new_default());
    ///
    /// let engine = macrolens::Macrolens::builder()
    ///     .with_connector(fred)
    ///     .with_connector(ecb)
    ///     .build()?;
    /// ```
    #[must_use]
    pub fn builder() -> MacrolensBuilder {
        MacrolensBuilder::new()
    }

    /// Registered connectors in priority order.
    pub(crate) fn ordered(&self) -> impl Iterator<Item = &Arc<dyn MacrolensConnector>> {
        self.connectors.iter()
    }

    /// Wrap a provider future with a timeout and standardized timeout error
    /// mapping.
    pub(crate) async fn provider_call_with_timeout<T, Fut>(
        connector_name: &'static str,
        capability: &'static str,
        timeout: Duration,
        fut: Fut,
    ) -> Result<T, MacrolensError>
    where
        Fut: Future<Output = Result<T, MacrolensError>>,
    {
        (tokio::time::timeout(timeout, fut).await)
            .unwrap_or_else(|_| Err(MacrolensError::provider_timeout(connector_name, capability)))
    }
}
