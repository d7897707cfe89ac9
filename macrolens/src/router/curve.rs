//! Yield-curve routing: per-source snapshots through the cache coordinator
//! and two-source comparison.

use std::collections::BTreeMap;
use std::sync::Arc;

use macrolens_core::MacrolensConnector;
use macrolens_core::timeseries::util::round4;
use macrolens_types::{CacheStatus, CurveComparison, CurveSnapshot, MacrolensError, TenorPoint};

use crate::Macrolens;

fn snapshot(source: &str, points: Vec<TenorPoint>, cache_status: CacheStatus) -> CurveSnapshot {
    let asof = points.iter().map(|p| p.date).max();
    let tenors: BTreeMap<String, f64> = points
        .into_iter()
        .map(|p| (p.tenor, round4(p.value)))
        .collect();
    CurveSnapshot {
        source: source.to_string(),
        asof,
        tenors,
        cache_status,
    }
}

impl Macrolens {
    /// Snapshot the yield curve of one registered source, by connector name.
    ///
    /// The snapshot goes through the cache coordinator under the curve TTL,
    /// so a provider outage inside the stale-serving policy still yields the
    /// last good curve.
    ///
    /// # Errors
    /// `NotFound` when no connector carries that name, `NotSupported` when
    /// the connector serves no curve.
    pub async fn curve(&self, source: &str) -> Result<CurveSnapshot, MacrolensError> {
        let connector: Arc<dyn MacrolensConnector> = self
            .connectors
            .iter()
            .find(|c| c.name() == source)
            .cloned()
            .ok_or_else(|| MacrolensError::not_found(format!("curve source {source}")))?;
        let provider = connector
            .as_curve_provider()
            .ok_or_else(|| MacrolensError::not_supported("yield_curve"))?;

        let name = connector.name();
        let timeout = self.cfg.provider_timeout;
        let key = format!("curve:{name}");
        let (points, cache_status) = self
            .coordinator
            .fetch_with_fallback::<Vec<TenorPoint>, _, _>(&key, self.cfg.curve_ttl, false, || {
                Self::provider_call_with_timeout(name, "yield_curve", timeout, provider.yield_curve())
            })
            .await?;

        Ok(snapshot(name, points, cache_status))
    }

    /// Compare the yield curves of two registered sources.
    ///
    /// Both snapshots are fetched concurrently; the comparison itself is
    /// pure math over the reference tenors, so identical snapshots always
    /// produce an identical result.
    ///
    /// # Errors
    /// Propagates the first snapshot failure.
    pub async fn compare_curves(
        &self,
        source_a: &str,
        source_b: &str,
    ) -> Result<CurveComparison, MacrolensError> {
        let (a, b) = futures::try_join!(self.curve(source_a), self.curve(source_b))?;
        Ok(macrolens_core::compare(&a, &b))
    }
}
