use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::CacheStatus;

/// One tenor of a yield curve as a provider returned it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenorPoint {
    /// Tenor label, e.g. "10Y".
    pub tenor: String,
    /// Date of the observation.
    pub date: NaiveDate,
    /// Yield in percent.
    pub value: f64,
}

/// A point-in-time yield curve keyed by tenor label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveSnapshot {
    /// Name of the provider that produced the snapshot.
    pub source: String,
    /// Most recent observation date across tenors, when any tenor resolved.
    pub asof: Option<NaiveDate>,
    /// Yield per tenor, in percent, rounded to four decimals.
    pub tenors: BTreeMap<String, f64>,
    /// Whether the snapshot came from a live fetch or the cache.
    pub cache_status: CacheStatus,
}

/// Deterministic, rule-based reading of a two-curve comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveInterpretation {
    /// Reading of the average spread between the curves.
    pub spread: String,
    /// Reading of the relative steepness of the curves.
    pub steepness: String,
    /// Reading of the overall yield differential.
    pub divergence: String,
}

/// The result of comparing two yield-curve snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveComparison {
    /// Source name of the first curve.
    pub source_a: String,
    /// Source name of the second curve.
    pub source_b: String,
    /// Reference tenors present in both curves, in maturity order.
    pub common_tenors: Vec<String>,
    /// Spread (curve B minus curve A) per common tenor.
    pub spreads: BTreeMap<String, f64>,
    /// 10Y minus 2Y for curve A, when both tenors are present.
    pub steepness_a: Option<f64>,
    /// 10Y minus 2Y for curve B, when both tenors are present.
    pub steepness_b: Option<f64>,
    /// Mean yield of curve A over all of its tenors.
    pub average_a: f64,
    /// Mean yield of curve B over all of its tenors.
    pub average_b: f64,
    /// Sample standard deviation of curve A yields.
    pub volatility_a: f64,
    /// Sample standard deviation of curve B yields.
    pub volatility_b: f64,
    /// Pearson correlation over common tenors; 0.0 when undefined.
    pub correlation: f64,
    /// Rule-based interpretation of the numbers above.
    pub interpretation: CurveInterpretation,
}
