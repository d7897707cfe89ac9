use async_trait::async_trait;

use crate::{
    MacrolensError, ObservationsRequest, RawObservation, RelatedSeries, SeriesMetadata, SeriesTag,
    TenorPoint,
};

/// Focused role trait for connectors that serve series metadata.
#[async_trait]
pub trait SeriesMetadataProvider: Send + Sync {
    /// Fetch descriptive metadata for the given series identifier.
    async fn series_metadata(&self, series_id: &str) -> Result<SeriesMetadata, MacrolensError>;
}

/// Focused role trait for connectors that serve series observations.
#[async_trait]
pub trait SeriesObservationsProvider: Send + Sync {
    /// Fetch raw observations for the given request.
    async fn observations(
        &self,
        req: &ObservationsRequest,
    ) -> Result<Vec<RawObservation>, MacrolensError>;

    /// Sentinel string this provider uses for missing observations.
    fn missing_marker(&self) -> &'static str {
        "."
    }
}

/// Focused role trait for connectors that can search their series catalog.
#[async_trait]
pub trait SeriesSearchProvider: Send + Sync {
    /// Full-text search over the provider catalog, best matches first.
    async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SeriesMetadata>, MacrolensError>;
}

/// Focused role trait for connectors that expose a tag graph over series.
#[async_trait]
pub trait TagDiscoveryProvider: Send + Sync {
    /// Tags attached to a series.
    async fn series_tags(&self, series_id: &str) -> Result<Vec<SeriesTag>, MacrolensError>;

    /// Tags related to the given tag names.
    async fn related_tags(&self, tag_names: &[String]) -> Result<Vec<SeriesTag>, MacrolensError>;

    /// Series carrying any of the given tags, up to `limit` entries.
    async fn series_for_tags(
        &self,
        tag_names: &[String],
        limit: usize,
    ) -> Result<Vec<RelatedSeries>, MacrolensError>;
}

/// Focused role trait for connectors that serve a sovereign yield curve.
#[async_trait]
pub trait CurveProvider: Send + Sync {
    /// Fetch the latest available observation per reference tenor.
    ///
    /// Tenors the provider cannot resolve are simply absent from the result;
    /// an error means no tenor could be fetched at all.
    async fn yield_curve(&self) -> Result<Vec<TenorPoint>, MacrolensError>;
}

/// Main connector trait implemented by provider crates. Exposes capability discovery.
#[async_trait]
pub trait MacrolensConnector: Send + Sync {
    /// A stable identifier for priority lists (e.g. "macrolens-fred").
    fn name(&self) -> &'static str;

    /// Human-friendly vendor string.
    fn vendor(&self) -> &'static str {
        "unknown"
    }

    /// Advertise metadata capability by returning a usable trait object when supported.
    fn as_series_metadata_provider(&self) -> Option<&dyn SeriesMetadataProvider> {
        None
    }

    /// Advertise observations capability by returning a usable trait object when supported.
    fn as_series_observations_provider(&self) -> Option<&dyn SeriesObservationsProvider> {
        None
    }

    /// If implemented, returns a trait object for catalog search.
    fn as_series_search_provider(&self) -> Option<&dyn SeriesSearchProvider> {
        None
    }

    /// If implemented, returns a trait object for tag-based discovery.
    fn as_tag_discovery_provider(&self) -> Option<&dyn TagDiscoveryProvider> {
        None
    }

    /// If implemented, returns a trait object for yield-curve snapshots.
    fn as_curve_provider(&self) -> Option<&dyn CurveProvider> {
        None
    }
}
