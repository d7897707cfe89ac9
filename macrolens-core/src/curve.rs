//! Yield-curve comparison math and its rule-based interpretation.

use std::collections::BTreeMap;

use macrolens_types::{CurveComparison, CurveInterpretation, CurveSnapshot};

use crate::timeseries::util::{mean, pearson, round4, sample_std_dev};

/// Reference tenors considered for spreads and correlation, in maturity order.
pub const REFERENCE_TENORS: [&str; 5] = ["1Y", "2Y", "5Y", "10Y", "30Y"];

/// Spread threshold (percentage points) above which two curves are read as
/// trading at materially different levels.
const SPREAD_THRESHOLD: f64 = 0.5;
/// Steepness-difference threshold for the steepness reading.
const STEEPNESS_THRESHOLD: f64 = 0.5;
/// Average-yield differential above which the curves are read as divergent.
const DIVERGENCE_THRESHOLD: f64 = 1.0;

/// Steepness of a curve: the 10Y yield minus the 2Y yield, when both exist.
#[must_use]
pub fn steepness(tenors: &BTreeMap<String, f64>) -> Option<f64> {
    let long = tenors.get("10Y")?;
    let short = tenors.get("2Y")?;
    Some(round4(long - short))
}

/// Compare two curve snapshots over the reference tenors.
///
/// Spreads are curve B minus curve A per tenor present in both curves.
/// Correlation is Pearson over the common tenors and defaults to 0.0 when
/// fewer than two are shared. The interpretation is purely threshold-based
/// so identical inputs always produce identical text.
#[must_use]
pub fn compare(a: &CurveSnapshot, b: &CurveSnapshot) -> CurveComparison {
    let common_tenors: Vec<String> = REFERENCE_TENORS
        .iter()
        .filter(|t| a.tenors.contains_key(**t) && b.tenors.contains_key(**t))
        .map(|t| (*t).to_string())
        .collect();

    let mut spreads = BTreeMap::new();
    let mut xs = Vec::with_capacity(common_tenors.len());
    let mut ys = Vec::with_capacity(common_tenors.len());
    for tenor in &common_tenors {
        let (ya, yb) = (a.tenors[tenor], b.tenors[tenor]);
        spreads.insert(tenor.clone(), round4(yb - ya));
        xs.push(ya);
        ys.push(yb);
    }

    let values_a: Vec<f64> = a.tenors.values().copied().collect();
    let values_b: Vec<f64> = b.tenors.values().copied().collect();

    let steepness_a = steepness(&a.tenors);
    let steepness_b = steepness(&b.tenors);
    let average_a = round4(mean(&values_a));
    let average_b = round4(mean(&values_b));

    let interpretation = interpret(
        &a.source,
        &b.source,
        &spreads,
        steepness_a,
        steepness_b,
        average_a,
        average_b,
    );

    CurveComparison {
        source_a: a.source.clone(),
        source_b: b.source.clone(),
        common_tenors,
        spreads,
        steepness_a,
        steepness_b,
        average_a,
        average_b,
        volatility_a: sample_std_dev(&values_a).map_or(0.0, round4),
        volatility_b: sample_std_dev(&values_b).map_or(0.0, round4),
        correlation: round4(pearson(&xs, &ys)),
        interpretation,
    }
}

fn interpret(
    source_a: &str,
    source_b: &str,
    spreads: &BTreeMap<String, f64>,
    steepness_a: Option<f64>,
    steepness_b: Option<f64>,
    average_a: f64,
    average_b: f64,
) -> CurveInterpretation {
    let spread_values: Vec<f64> = spreads.values().copied().collect();
    let avg_spread = mean(&spread_values);
    let spread = if spreads.is_empty() {
        "no common tenors to compare".to_string()
    } else if avg_spread > SPREAD_THRESHOLD {
        format!("{source_b} yields trade materially above {source_a}")
    } else if avg_spread < -SPREAD_THRESHOLD {
        format!("{source_b} yields trade materially below {source_a}")
    } else {
        format!("{source_a} and {source_b} trade at similar levels")
    };

    let steepness = match (steepness_a, steepness_b) {
        (Some(sa), Some(sb)) if sa - sb > STEEPNESS_THRESHOLD => {
            format!("the {source_a} curve is notably steeper than {source_b}")
        }
        (Some(sa), Some(sb)) if sb - sa > STEEPNESS_THRESHOLD => {
            format!("the {source_b} curve is notably steeper than {source_a}")
        }
        (Some(_), Some(_)) => "both curves show comparable steepness".to_string(),
        _ => "steepness not comparable: a reference tenor is missing".to_string(),
    };

    let divergence = if (average_a - average_b).abs() > DIVERGENCE_THRESHOLD {
        "overall yield levels diverge significantly".to_string()
    } else {
        "overall yield levels are broadly aligned".to_string()
    };

    CurveInterpretation {
        spread,
        steepness,
        divergence,
    }
}
