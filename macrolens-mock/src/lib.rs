//! macrolens-mock
//!
//! A scriptable [`MacrolensConnector`] for tests. Each capability is backed
//! by an optional closure; a capability with no closure is simply not
//! advertised. Every invocation is appended to a shared call log so tests
//! can assert routing order across connectors.
#![warn(missing_docs)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use macrolens_core::connector::{
    CurveProvider, MacrolensConnector, SeriesMetadataProvider, SeriesObservationsProvider,
    SeriesSearchProvider, TagDiscoveryProvider,
};
use macrolens_types::{
    MacrolensError, ObservationsRequest, RawObservation, RelatedSeries, SeriesMetadata, SeriesTag,
    TenorPoint,
};

type MetadataFn = Arc<dyn Fn(&str) -> Result<SeriesMetadata, MacrolensError> + Send + Sync>;
type ObservationsFn =
    Arc<dyn Fn(&ObservationsRequest) -> Result<Vec<RawObservation>, MacrolensError> + Send + Sync>;
type SearchFn =
    Arc<dyn Fn(&str, usize) -> Result<Vec<SeriesMetadata>, MacrolensError> + Send + Sync>;
type SeriesTagsFn = Arc<dyn Fn(&str) -> Result<Vec<SeriesTag>, MacrolensError> + Send + Sync>;
type RelatedTagsFn =
    Arc<dyn Fn(&[String]) -> Result<Vec<SeriesTag>, MacrolensError> + Send + Sync>;
type TagSeriesFn =
    Arc<dyn Fn(&[String], usize) -> Result<Vec<RelatedSeries>, MacrolensError> + Send + Sync>;
type CurveFn = Arc<dyn Fn() -> Result<Vec<TenorPoint>, MacrolensError> + Send + Sync>;

/// Shared log of mock invocations, in order, as `"{connector}:{capability}"`.
pub type CallLog = Arc<Mutex<Vec<String>>>;

/// Create an empty call log to share across mock connectors.
#[must_use]
pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Scriptable mock connector.
pub struct MockConnector {
    name: &'static str,
    calls: CallLog,
    metadata: Option<MetadataFn>,
    observations: Option<ObservationsFn>,
    search: Option<SearchFn>,
    series_tags: Option<SeriesTagsFn>,
    related_tags: Option<RelatedTagsFn>,
    tag_series: Option<TagSeriesFn>,
    curve: Option<CurveFn>,
}

impl MockConnector {
    /// Start building a mock connector with the given stable name.
    #[must_use]
    pub fn builder(name: &'static str) -> MockConnectorBuilder {
        MockConnectorBuilder {
            name,
            calls: call_log(),
            metadata: None,
            observations: None,
            search: None,
            series_tags: None,
            related_tags: None,
            tag_series: None,
            curve: None,
        }
    }

    /// Calls recorded so far, as `"{connector}:{capability}"` strings.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|g| g.clone()).unwrap_or_default()
    }

    fn record(&self, capability: &str) {
        if let Ok(mut guard) = self.calls.lock() {
            guard.push(format!("{}:{capability}", self.name));
        }
    }

    fn unscripted(capability: &str) -> MacrolensError {
        MacrolensError::not_supported(capability.to_string())
    }
}

/// Builder for [`MockConnector`].
pub struct MockConnectorBuilder {
    name: &'static str,
    calls: CallLog,
    metadata: Option<MetadataFn>,
    observations: Option<ObservationsFn>,
    search: Option<SearchFn>,
    series_tags: Option<SeriesTagsFn>,
    related_tags: Option<RelatedTagsFn>,
    tag_series: Option<TagSeriesFn>,
    curve: Option<CurveFn>,
}

impl MockConnectorBuilder {
    /// Share a call log with other mocks to assert cross-connector ordering.
    #[must_use]
    pub fn with_call_log(mut self, log: CallLog) -> Self {
        self.calls = log;
        self
    }

    /// Script the metadata capability.
    #[must_use]
    pub fn with_metadata<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> Result<SeriesMetadata, MacrolensError> + Send + Sync + 'static,
    {
        self.metadata = Some(Arc::new(f));
        self
    }

    /// Script the metadata capability to always return the given value.
    #[must_use]
    pub fn returns_metadata_ok(self, metadata: SeriesMetadata) -> Self {
        self.with_metadata(move |_| Ok(metadata.clone()))
    }

    /// Script the observations capability.
    #[must_use]
    pub fn with_observations<F>(mut self, f: F) -> Self
    where
        F: Fn(&ObservationsRequest) -> Result<Vec<RawObservation>, MacrolensError>
            + Send
            + Sync
            + 'static,
    {
        self.observations = Some(Arc::new(f));
        self
    }

    /// Script the observations capability to always return the given rows.
    #[must_use]
    pub fn returns_observations_ok(self, rows: Vec<RawObservation>) -> Self {
        self.with_observations(move |_| Ok(rows.clone()))
    }

    /// Script the observations capability to always fail with the given error.
    #[must_use]
    pub fn returns_observations_err(self, err: MacrolensError) -> Self {
        self.with_observations(move |_| Err(err.clone()))
    }

    /// Script the search capability.
    #[must_use]
    pub fn with_search<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, usize) -> Result<Vec<SeriesMetadata>, MacrolensError> + Send + Sync + 'static,
    {
        self.search = Some(Arc::new(f));
        self
    }

    /// Script the series-tags step of discovery.
    #[must_use]
    pub fn with_series_tags<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> Result<Vec<SeriesTag>, MacrolensError> + Send + Sync + 'static,
    {
        self.series_tags = Some(Arc::new(f));
        self
    }

    /// Script the related-tags step of discovery.
    #[must_use]
    pub fn with_related_tags<F>(mut self, f: F) -> Self
    where
        F: Fn(&[String]) -> Result<Vec<SeriesTag>, MacrolensError> + Send + Sync + 'static,
    {
        self.related_tags = Some(Arc::new(f));
        self
    }

    /// Script the tag-to-series step of discovery.
    #[must_use]
    pub fn with_tag_series<F>(mut self, f: F) -> Self
    where
        F: Fn(&[String], usize) -> Result<Vec<RelatedSeries>, MacrolensError>
            + Send
            + Sync
            + 'static,
    {
        self.tag_series = Some(Arc::new(f));
        self
    }

    /// Script the yield-curve capability.
    #[must_use]
    pub fn with_curve<F>(mut self, f: F) -> Self
    where
        F: Fn() -> Result<Vec<TenorPoint>, MacrolensError> + Send + Sync + 'static,
    {
        self.curve = Some(Arc::new(f));
        self
    }

    /// Script the yield-curve capability to always return the given points.
    #[must_use]
    pub fn returns_curve_ok(self, points: Vec<TenorPoint>) -> Self {
        self.with_curve(move || Ok(points.clone()))
    }

    /// Finish the build.
    #[must_use]
    pub fn build(self) -> Arc<MockConnector> {
        Arc::new(MockConnector {
            name: self.name,
            calls: self.calls,
            metadata: self.metadata,
            observations: self.observations,
            search: self.search,
            series_tags: self.series_tags,
            related_tags: self.related_tags,
            tag_series: self.tag_series,
            curve: self.curve,
        })
    }
}

#[async_trait]
impl MacrolensConnector for MockConnector {
    fn name(&self) -> &'static str {
        self.name
    }

    fn vendor(&self) -> &'static str {
        "Mock"
    }

    fn as_series_metadata_provider(&self) -> Option<&dyn SeriesMetadataProvider> {
        self.metadata
            .as_ref()
            .map(|_| self as &dyn SeriesMetadataProvider)
    }

    fn as_series_observations_provider(&self) -> Option<&dyn SeriesObservationsProvider> {
        self.observations
            .as_ref()
            .map(|_| self as &dyn SeriesObservationsProvider)
    }

    fn as_series_search_provider(&self) -> Option<&dyn SeriesSearchProvider> {
        self.search
            .as_ref()
            .map(|_| self as &dyn SeriesSearchProvider)
    }

    fn as_tag_discovery_provider(&self) -> Option<&dyn TagDiscoveryProvider> {
        self.series_tags
            .as_ref()
            .map(|_| self as &dyn TagDiscoveryProvider)
    }

    fn as_curve_provider(&self) -> Option<&dyn CurveProvider> {
        self.curve.as_ref().map(|_| self as &dyn CurveProvider)
    }
}

#[async_trait]
impl SeriesMetadataProvider for MockConnector {
    async fn series_metadata(&self, series_id: &str) -> Result<SeriesMetadata, MacrolensError> {
        self.record("series_metadata");
        match &self.metadata {
            Some(f) => f(series_id),
            None => Err(Self::unscripted("series_metadata")),
        }
    }
}

#[async_trait]
impl SeriesObservationsProvider for MockConnector {
    async fn observations(
        &self,
        req: &ObservationsRequest,
    ) -> Result<Vec<RawObservation>, MacrolensError> {
        self.record("observations");
        match &self.observations {
            Some(f) => f(req),
            None => Err(Self::unscripted("observations")),
        }
    }
}

#[async_trait]
impl SeriesSearchProvider for MockConnector {
    async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SeriesMetadata>, MacrolensError> {
        self.record("search");
        match &self.search {
            Some(f) => f(query, limit),
            None => Err(Self::unscripted("search")),
        }
    }
}

#[async_trait]
impl TagDiscoveryProvider for MockConnector {
    async fn series_tags(&self, series_id: &str) -> Result<Vec<SeriesTag>, MacrolensError> {
        self.record("series_tags");
        match &self.series_tags {
            Some(f) => f(series_id),
            None => Err(Self::unscripted("series_tags")),
        }
    }

    async fn related_tags(&self, tag_names: &[String]) -> Result<Vec<SeriesTag>, MacrolensError> {
        self.record("related_tags");
        match &self.related_tags {
            Some(f) => f(tag_names),
            None => Err(Self::unscripted("related_tags")),
        }
    }

    async fn series_for_tags(
        &self,
        tag_names: &[String],
        limit: usize,
    ) -> Result<Vec<RelatedSeries>, MacrolensError> {
        self.record("series_for_tags");
        match &self.tag_series {
            Some(f) => f(tag_names, limit),
            None => Err(Self::unscripted("series_for_tags")),
        }
    }
}

#[async_trait]
impl CurveProvider for MockConnector {
    async fn yield_curve(&self) -> Result<Vec<TenorPoint>, MacrolensError> {
        self.record("yield_curve");
        match &self.curve {
            Some(f) => f(),
            None => Err(Self::unscripted("yield_curve")),
        }
    }
}
