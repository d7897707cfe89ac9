//! The headline-indicator overview: a best-effort fan-out over a fixed
//! indicator set.

use chrono::Utc;
use macrolens_types::{MacrolensError, OverviewReport, SeriesRequest};
use tracing::debug;

use crate::Macrolens;

/// Headline indicators assembled into the overview, in display order.
const OVERVIEW_SERIES: [&str; 5] = ["FEDFUNDS", "CPIAUCSL", "UNRATE", "DGS10", "DEXUSEU"];

impl Macrolens {
    /// Assemble a snapshot of the headline economic indicators.
    ///
    /// Indicators are fetched concurrently through the full series pipeline,
    /// caching included. Individual failures drop the indicator from the
    /// report rather than failing the overview.
    ///
    /// # Errors
    /// `Unavailable` only when every indicator failed.
    pub async fn overview(&self) -> Result<OverviewReport, MacrolensError> {
        let fetches = OVERVIEW_SERIES
            .iter()
            .map(|id| async move { (*id, self.series(&SeriesRequest::new(*id)).await) });
        let results = futures::future::join_all(fetches).await;

        let mut indicators = Vec::with_capacity(OVERVIEW_SERIES.len());
        for (id, outcome) in results {
            match outcome {
                Ok(report) => indicators.push(report),
                Err(e) => debug!(series = id, error = %e, "dropping indicator from overview"),
            }
        }

        if indicators.is_empty() {
            return Err(MacrolensError::unavailable("economic overview"));
        }
        Ok(OverviewReport {
            generated_at: Utc::now(),
            indicators,
        })
    }
}
