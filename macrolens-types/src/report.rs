use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{Frequency, MacrolensError, ObservationBatch, SeriesMetadata};

/// Where the data in a response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheStatus {
    /// Fetched live and written through to the cache.
    Fresh,
    /// Served from a cache entry still inside its freshness window.
    Cached,
    /// Served from an expired cache entry after a live-fetch failure.
    Stale,
}

/// Provenance attached to every successful response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMeta {
    /// Connector that produced the data.
    pub provider: String,
    /// Identifier actually served; may differ from the request after
    /// alias translation or fallback.
    pub series_id: String,
    /// Identifier the caller asked for.
    pub requested_id: String,
    /// Cache provenance of the payload.
    pub cache_status: CacheStatus,
    /// Effective frequency the observations were served at.
    pub frequency: Option<Frequency>,
    /// True when the served frequency differs from the requested one.
    pub frequency_substituted: bool,
    /// Units of the served observations.
    pub units: Option<String>,
    /// Data caveat from the identity resolver, when one applies.
    pub caveat: Option<String>,
}

/// The full answer to a series request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesReport {
    /// Provenance of the payload.
    pub meta: ResponseMeta,
    /// Provider metadata for the served series.
    pub metadata: SeriesMetadata,
    /// Normalized observations and derived analytics.
    pub batch: ObservationBatch,
}

/// A composite snapshot of the preset headline indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewReport {
    /// When the overview was assembled.
    pub generated_at: DateTime<Utc>,
    /// One report per indicator that resolved; failed indicators are skipped.
    pub indicators: Vec<SeriesReport>,
}

/// Wrap a successful payload in the stable response envelope.
#[must_use]
pub fn success_envelope<T: Serialize>(data: &T) -> serde_json::Value {
    json!({ "status": "success", "data": data })
}

/// Wrap a failure in the stable error envelope.
#[must_use]
pub fn error_envelope(err: &MacrolensError) -> serde_json::Value {
    json!({
        "status": "error",
        "message": err.to_string(),
        "error_code": err.error_code(),
    })
}
