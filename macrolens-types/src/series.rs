use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::Frequency;

/// A caller-facing request for one economic series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesRequest {
    /// Requested series identifier; may be a legacy alias.
    pub series_id: String,
    /// Inclusive start of the observation window.
    pub start: Option<NaiveDate>,
    /// Inclusive end of the observation window.
    pub end: Option<NaiveDate>,
    /// Desired conversion frequency; `None` keeps the native cadence.
    pub frequency: Option<Frequency>,
    /// Provider-specific units transformation (e.g. "pc1" for percent change).
    pub units: Option<String>,
    /// Bypass any fresh cached copy and fetch live.
    pub force_refresh: bool,
}

impl SeriesRequest {
    /// Request a series by identifier with no window or conversion options.
    #[must_use]
    pub fn new(series_id: impl Into<String>) -> Self {
        Self {
            series_id: series_id.into(),
            ..Self::default()
        }
    }
}

/// The wire-level observation query a connector receives after resolution
/// and frequency negotiation have run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObservationsRequest {
    /// Canonical series identifier to fetch.
    pub series_id: String,
    /// Inclusive start of the observation window.
    pub start: Option<NaiveDate>,
    /// Inclusive end of the observation window.
    pub end: Option<NaiveDate>,
    /// Conversion frequency to send upstream; `None` omits the parameter.
    pub frequency: Option<Frequency>,
    /// Units transformation to send upstream.
    pub units: Option<String>,
}

/// Descriptive metadata for a series as reported by its provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesMetadata {
    /// Provider identifier of the series.
    pub id: String,
    /// Human-readable title.
    pub title: String,
    /// Native observation cadence, when the provider reports one.
    pub native_frequency: Option<Frequency>,
    /// Units of the raw observations (e.g. "Percent").
    pub units: Option<String>,
    /// Seasonal adjustment note (e.g. "Seasonally Adjusted").
    pub seasonal_adjustment: Option<String>,
    /// Provider timestamp of the last update, verbatim.
    pub last_updated: Option<String>,
    /// Popularity rank, where the provider exposes one.
    pub popularity: Option<i64>,
}

/// One observation exactly as a provider returned it, before normalization.
///
/// `value` stays a string because providers encode missing data with sentinel
/// markers rather than omitting the observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawObservation {
    /// Observation date.
    pub date: NaiveDate,
    /// Raw value text; `None` when the provider omitted the field.
    pub value: Option<String>,
}

/// A normalized observation. Only emitted with a numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Observation date.
    pub date: NaiveDate,
    /// Numeric value, rounded to four decimals.
    pub value: f64,
}

/// Bookkeeping over a normalization pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizationStats {
    /// Number of raw observations received, including missing ones.
    pub total: usize,
    /// Number of observations that carried a usable numeric value.
    pub valid: usize,
    /// Number of observations dropped as missing or unparsable.
    pub missing: usize,
    /// Share of dropped observations, in percent of `total`.
    #[serde(rename = "missing_percentage")]
    pub missing_pct: f64,
}

/// Trailing moving averages over the normalized values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MovingAverages {
    /// Mean of the last 5 values; `None` with fewer than 5 valid points.
    pub ma_5: Option<f64>,
    /// Mean of the last 20 values; `None` with fewer than 20 valid points.
    pub ma_20: Option<f64>,
}

/// Percentage changes derived from the normalized values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PercentChanges {
    /// Change from the previous observation; `None` when the base is zero.
    pub period: Option<f64>,
    /// Change from 12 observations back; `None` with fewer than 12 points
    /// or a zero base.
    pub year_over_year: Option<f64>,
}

/// Derived indicators computed during normalization.
///
/// Only present when the batch holds at least two valid observations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Analytics {
    /// Most recent value.
    pub latest: f64,
    /// Arithmetic mean over all valid values.
    pub mean: f64,
    /// Smallest value.
    pub min: f64,
    /// Largest value.
    pub max: f64,
    /// Sample standard deviation (N-1 denominator).
    pub volatility: f64,
    /// Trailing moving averages.
    pub moving_averages: MovingAverages,
    /// Period-over-period and year-over-year changes.
    pub percent_changes: PercentChanges,
}

/// The output of a normalization pass: clean observations plus derived stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationBatch {
    /// Observations that survived normalization, in date order.
    pub observations: Vec<Observation>,
    /// Counts over the raw input.
    pub stats: NormalizationStats,
    /// Derived indicators; `None` with fewer than two valid observations.
    pub analytics: Option<Analytics>,
}

/// A provider tag attached to a series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesTag {
    /// Tag name.
    pub name: String,
    /// Provider popularity score for the tag.
    pub popularity: i64,
}

/// A candidate produced by related-series discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedSeries {
    /// Series identifier.
    pub id: String,
    /// Human-readable title.
    pub title: String,
    /// Provider popularity score used for ranking.
    pub popularity: i64,
    /// Native frequency label, verbatim from the provider.
    pub frequency: Option<String>,
    /// Units label, verbatim from the provider.
    pub units: Option<String>,
}

/// Serviceability of a canonical series identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum Availability {
    /// The series can be served normally.
    Available,
    /// The series can be served, but with a known data caveat.
    Limited {
        /// Human-readable caveat surfaced in reports.
        caveat: String,
    },
    /// The series must be refused before any network call.
    NotAvailable {
        /// Why the series cannot be served.
        reason: String,
    },
}

/// The outcome of resolving a requested identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedIdentity {
    /// The identifier the caller asked for, uppercased.
    pub requested_id: String,
    /// The current canonical identifier after alias translation.
    pub canonical_id: String,
    /// Candidate identifiers to try in order; the first entry is canonical.
    pub fallback_chain: Vec<String>,
    /// Serviceability of the canonical identifier.
    pub availability: Availability,
}
