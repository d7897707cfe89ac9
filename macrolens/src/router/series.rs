//! Series routing: identity resolution, provider fallback, frequency
//! negotiation, normalization, and cache coordination for one request.

use macrolens_core::connector::SeriesObservationsProvider;
use macrolens_core::{FrequencyDecision, MacrolensConnector, negotiate, normalize};
use macrolens_types::{
    Availability, MacrolensError, ObservationBatch, ObservationsRequest, ResponseMeta,
    SeriesMetadata, SeriesReport, SeriesRequest,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Macrolens;
use crate::core::tag_err;
use crate::resolver;

/// What gets cached per series request: everything needed to rebuild a
/// report except the cache provenance itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct SeriesPayload {
    pub(crate) provider: String,
    pub(crate) metadata: SeriesMetadata,
    pub(crate) decision: FrequencyDecision,
    pub(crate) batch: ObservationBatch,
}

fn cache_key(series_id: &str, req: &SeriesRequest) -> String {
    let part = |d: Option<chrono::NaiveDate>| d.map_or_else(|| "-".to_string(), |d| d.to_string());
    format!(
        "series:{series_id}:{}:{}:{}:{}",
        part(req.start),
        part(req.end),
        req.frequency.map_or("-", |f| f.as_code()),
        req.units.as_deref().unwrap_or("-"),
    )
}

impl Macrolens {
    /// Fetch one economic series as a normalized report.
    ///
    /// The requested identifier is resolved first: legacy aliases translate
    /// to their canonical successors, and permanently unservable series are
    /// refused before any network call. Candidates from the fallback chain
    /// are then tried in order through the cache coordinator; a candidate
    /// that no provider knows moves resolution to the next one.
    ///
    /// # Errors
    /// `NotAvailable` for refused identifiers, `NotFound` when every
    /// candidate is missing everywhere, `NotSupported` when no registered
    /// connector serves observations, and `Unavailable` when live fetches
    /// fail with no cached copy to fall back on.
    pub async fn series(&self, req: &SeriesRequest) -> Result<SeriesReport, MacrolensError> {
        let identity = resolver::resolve(&req.series_id);
        if let Availability::NotAvailable { reason } = &identity.availability {
            return Err(MacrolensError::not_available(
                identity.canonical_id,
                reason.clone(),
            ));
        }
        let caveat = match &identity.availability {
            Availability::Limited { caveat } => Some(caveat.clone()),
            _ => None,
        };

        for candidate in &identity.fallback_chain {
            let key = cache_key(candidate, req);
            let outcome = self
                .coordinator
                .fetch_with_fallback::<SeriesPayload, _, _>(
                    &key,
                    self.cfg.series_ttl,
                    req.force_refresh,
                    || self.fetch_series_live(candidate, req),
                )
                .await;
            match outcome {
                Ok((payload, cache_status)) => {
                    let meta = ResponseMeta {
                        provider: payload.provider,
                        series_id: candidate.clone(),
                        requested_id: identity.requested_id.clone(),
                        cache_status,
                        frequency: payload
                            .decision
                            .effective
                            .or(payload.metadata.native_frequency),
                        frequency_substituted: payload.decision.substituted,
                        units: req.units.clone().or_else(|| payload.metadata.units.clone()),
                        caveat: caveat.clone(),
                    };
                    return Ok(SeriesReport {
                        meta,
                        metadata: payload.metadata,
                        batch: payload.batch,
                    });
                }
                Err(MacrolensError::NotFound { .. }) => {
                    debug!(series = %candidate, "candidate unknown everywhere; moving down the chain");
                }
                Err(e) => return Err(e),
            }
        }

        Err(MacrolensError::not_found(format!(
            "series {} (requested as {})",
            identity.canonical_id, identity.requested_id
        )))
    }

    /// Try every observation-capable connector in priority order for one
    /// candidate identifier.
    async fn fetch_series_live(
        &self,
        series_id: &str,
        req: &SeriesRequest,
    ) -> Result<SeriesPayload, MacrolensError> {
        let mut attempted_any = false;
        let mut errors: Vec<MacrolensError> = Vec::new();

        for c in self.ordered() {
            let Some(obs) = c.as_series_observations_provider() else {
                continue;
            };
            attempted_any = true;
            match self
                .fetch_from_connector(c.as_ref(), obs, series_id, req)
                .await
            {
                Ok(payload) => return Ok(payload),
                Err(e @ MacrolensError::NotFound { .. }) => errors.push(e),
                Err(e) => errors.push(tag_err(c.name(), e)),
            }
        }

        if !attempted_any {
            return Err(MacrolensError::not_supported("series_observations"));
        }
        if errors
            .iter()
            .all(|e| matches!(e, MacrolensError::NotFound { .. }))
        {
            return Err(MacrolensError::not_found(format!("series {series_id}")));
        }
        Err(MacrolensError::AllProvidersFailed(errors))
    }

    /// One full provider round: metadata, frequency negotiation, the
    /// observation fetch with a single rejection retry, and normalization.
    async fn fetch_from_connector(
        &self,
        connector: &dyn MacrolensConnector,
        obs: &dyn SeriesObservationsProvider,
        series_id: &str,
        req: &SeriesRequest,
    ) -> Result<SeriesPayload, MacrolensError> {
        let name = connector.name();
        let timeout = self.cfg.provider_timeout;

        let metadata = match connector.as_series_metadata_provider() {
            Some(p) => {
                match Self::provider_call_with_timeout(
                    name,
                    "series_metadata",
                    timeout,
                    p.series_metadata(series_id),
                )
                .await
                {
                    Ok(m) => Some(m),
                    Err(e @ MacrolensError::NotFound { .. }) => return Err(e),
                    Err(e) => {
                        // Metadata is advisory; observations can still be served.
                        debug!(series = series_id, error = %e, "metadata fetch failed");
                        None
                    }
                }
            }
            None => None,
        };

        let native = metadata.as_ref().and_then(|m| m.native_frequency);
        let mut decision = negotiate(native, req.frequency);

        let wire = ObservationsRequest {
            series_id: series_id.to_string(),
            start: req.start,
            end: req.end,
            frequency: decision.effective,
            units: req.units.clone(),
        };
        let rows = match Self::provider_call_with_timeout(
            name,
            "series_observations",
            timeout,
            obs.observations(&wire),
        )
        .await
        {
            Ok(rows) => rows,
            Err(e) if wire.frequency.is_some() && e.is_frequency_rejection() => {
                debug!(series = series_id, error = %e, "frequency rejected upstream; retrying at native cadence");
                decision = decision.rejected_by_provider();
                let retry = ObservationsRequest {
                    frequency: None,
                    ..wire
                };
                Self::provider_call_with_timeout(
                    name,
                    "series_observations",
                    timeout,
                    obs.observations(&retry),
                )
                .await?
            }
            Err(e) => return Err(e),
        };

        let batch = normalize(&rows, obs.missing_marker());
        let metadata = metadata.unwrap_or_else(|| SeriesMetadata {
            id: series_id.to_string(),
            title: series_id.to_string(),
            ..SeriesMetadata::default()
        });

        Ok(SeriesPayload {
            provider: name.to_string(),
            metadata,
            decision,
            batch,
        })
    }
}
