//! Observation normalization: raw provider rows in, clean batch plus
//! derived analytics out.

use macrolens_types::{
    Analytics, MovingAverages, NormalizationStats, Observation, ObservationBatch, PercentChanges,
    RawObservation,
};

use super::util::{mean, round4, sample_std_dev};

/// Observations needed before a year-over-year change is computed.
const YOY_WINDOW: usize = 12;

/// Normalize raw provider observations into a clean batch.
///
/// Rows whose value equals `missing_marker`, fails to parse as a number, or
/// is absent are dropped but still counted in the stats: `total` is always
/// the raw input length. Values are rounded to four decimals and the output
/// is sorted by date. Analytics are attached only when at least two valid
/// observations remain.
#[must_use]
pub fn normalize(raw: &[RawObservation], missing_marker: &str) -> ObservationBatch {
    let total = raw.len();
    let mut observations: Vec<Observation> = raw
        .iter()
        .filter_map(|obs| {
            let text = obs.value.as_deref()?;
            if text == missing_marker {
                return None;
            }
            let value = text.trim().parse::<f64>().ok()?;
            if !value.is_finite() {
                return None;
            }
            Some(Observation {
                date: obs.date,
                value: round4(value),
            })
        })
        .collect();
    observations.sort_by_key(|o| o.date);

    let valid = observations.len();
    let missing = total - valid;
    let missing_pct = if total == 0 {
        0.0
    } else {
        round4(missing as f64 / total as f64 * 100.0)
    };

    let analytics = compute_analytics(&observations);

    ObservationBatch {
        observations,
        stats: NormalizationStats {
            total,
            valid,
            missing,
            missing_pct,
        },
        analytics,
    }
}

fn compute_analytics(observations: &[Observation]) -> Option<Analytics> {
    if observations.len() < 2 {
        return None;
    }
    let values: Vec<f64> = observations.iter().map(|o| o.value).collect();
    let n = values.len();
    let latest = values[n - 1];

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let ma_5 = trailing_mean(&values, 5);
    let ma_20 = trailing_mean(&values, 20);

    let period = percent_change(latest, values[n - 2]);
    let year_over_year = if n >= YOY_WINDOW {
        percent_change(latest, values[n - YOY_WINDOW])
    } else {
        None
    };

    // len >= 2 here, so the deviation is always defined
    let volatility = sample_std_dev(&values).map(round4)?;

    Some(Analytics {
        latest,
        mean: round4(mean(&values)),
        min,
        max,
        volatility,
        moving_averages: MovingAverages { ma_5, ma_20 },
        percent_changes: PercentChanges {
            period,
            year_over_year,
        },
    })
}

fn trailing_mean(values: &[f64], window: usize) -> Option<f64> {
    if values.len() < window {
        return None;
    }
    Some(round4(mean(&values[values.len() - window..])))
}

fn percent_change(current: f64, base: f64) -> Option<f64> {
    if base == 0.0 {
        return None;
    }
    Some(round4((current - base) / base * 100.0))
}
