//! macrolens-ecb
//!
//! Connector that implements `MacrolensConnector` on top of the ECB SDMX
//! data portal. Serves the euro-area AAA spot yield curve (per-tenor SDMX
//! JSON, with a single bulk CSV request as fallback) and raw observations
//! for arbitrary `FLOW.KEY` series identifiers.
#![warn(missing_docs)]

mod builder;
mod sdmx;

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use macrolens_core::connector::{
    CurveProvider, MacrolensConnector, SeriesObservationsProvider,
};
use macrolens_types::{MacrolensError, ObservationsRequest, RawObservation, TenorPoint};
use tracing::debug;

pub use builder::EcbConnectorBuilder;

/// Key family of the euro-area AAA spot curve on the `YC` dataflow.
const CURVE_KEY_PREFIX: &str = "B.U2.EUR.4F.G_N_A.SV_C_YM";

/// Spot-rate key suffix per reference tenor, in maturity order.
const CURVE_TENORS: [(&str, &str); 5] = [
    ("1Y", "SR_1Y"),
    ("2Y", "SR_2Y"),
    ("5Y", "SR_5Y"),
    ("10Y", "SR_10Y"),
    ("30Y", "SR_30Y"),
];

/// Connector for the ECB SDMX data portal.
pub struct EcbConnector {
    http: reqwest::Client,
    base_url: String,
    request_delay: Duration,
}

impl EcbConnector {
    /// Stable connector name for priority configuration.
    pub const NAME: &'static str = "macrolens-ecb";

    /// Returns a builder preset with the production endpoint.
    #[must_use]
    pub fn builder() -> EcbConnectorBuilder {
        EcbConnectorBuilder::new()
    }

    /// Connector against the production endpoint with default pacing.
    #[must_use]
    pub fn new_default() -> Self {
        Self::builder().build()
    }

    pub(crate) fn from_parts(base_url: String, request_delay: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            request_delay,
        }
    }

    async fn get_text(&self, path: &str, format: &str) -> Result<String, MacrolensError> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), path);
        let resp = self
            .http
            .get(&url)
            .query(&[("format", format)])
            .send()
            .await
            .map_err(|e| MacrolensError::upstream(Self::NAME, e.to_string()))?;
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| MacrolensError::upstream(Self::NAME, e.to_string()))?;
        if status.as_u16() == 404 {
            return Err(MacrolensError::not_found(format!("series at {path}")));
        }
        if !status.is_success() {
            return Err(MacrolensError::upstream(
                Self::NAME,
                format!("HTTP {status} for {path}"),
            ));
        }
        Ok(body)
    }

    /// Latest spot rate for one curve tenor via the SDMX JSON endpoint.
    async fn tenor_point(&self, tenor: &str, suffix: &str) -> Result<TenorPoint, MacrolensError> {
        let path = format!("service/data/YC/{CURVE_KEY_PREFIX}.{suffix}?lastNObservations=1");
        let body = self.get_text(&path, "jsondata").await?;
        let value: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| MacrolensError::Data(format!("malformed SDMX body: {e}")))?;
        let rows = sdmx::observations(&value)?;
        let (date, rate) = rows
            .last()
            .ok_or_else(|| MacrolensError::not_found(format!("spot rate {suffix}")))?;
        Ok(TenorPoint {
            tenor: tenor.to_string(),
            date: *date,
            value: *rate,
        })
    }

    /// Bulk CSV fallback: one request for the whole key family, parsed into
    /// tenor points by key suffix.
    async fn curve_from_csv(&self) -> Result<BTreeMap<String, TenorPoint>, MacrolensError> {
        let keys: Vec<String> = CURVE_TENORS
            .iter()
            .map(|(_, suffix)| format!("{CURVE_KEY_PREFIX}.{suffix}"))
            .collect();
        let path = format!(
            "service/data/YC/{}?lastNObservations=1",
            keys.join("+")
        );
        let body = self.get_text(&path, "csvdata").await?;

        let mut points = BTreeMap::new();
        for (key, date, rate) in sdmx::csv_rows(&body)? {
            let Some((tenor, _)) = CURVE_TENORS
                .iter()
                .find(|(_, suffix)| key.ends_with(&format!(".{suffix}")))
            else {
                continue;
            };
            points.insert(
                (*tenor).to_string(),
                TenorPoint {
                    tenor: (*tenor).to_string(),
                    date,
                    value: rate,
                },
            );
        }
        Ok(points)
    }
}

#[async_trait]
impl MacrolensConnector for EcbConnector {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn vendor(&self) -> &'static str {
        "European Central Bank"
    }

    fn as_series_observations_provider(&self) -> Option<&dyn SeriesObservationsProvider> {
        Some(self as &dyn SeriesObservationsProvider)
    }

    fn as_curve_provider(&self) -> Option<&dyn CurveProvider> {
        Some(self as &dyn CurveProvider)
    }
}

#[async_trait]
impl SeriesObservationsProvider for EcbConnector {
    /// Fetch observations for a dot-separated `FLOW.KEY` identifier, e.g.
    /// `EXR.D.USD.EUR.SP00.A`.
    ///
    /// Frequency and units conversion parameters are ignored: in SDMX the
    /// cadence is part of the series key, not a request option.
    async fn observations(
        &self,
        req: &ObservationsRequest,
    ) -> Result<Vec<RawObservation>, MacrolensError> {
        let Some((flow, key)) = req.series_id.split_once('.') else {
            return Err(MacrolensError::InvalidArg(format!(
                "expected FLOW.KEY identifier, got {:?}",
                req.series_id
            )));
        };
        if req.frequency.is_some() || req.units.is_some() {
            debug!(series = %req.series_id, "ignoring conversion parameters on an SDMX fetch");
        }

        let mut path = format!("service/data/{flow}/{key}?detail=dataonly");
        if let Some(start) = req.start {
            path.push_str(&format!("&startPeriod={}", start.format("%Y-%m-%d")));
        }
        if let Some(end) = req.end {
            path.push_str(&format!("&endPeriod={}", end.format("%Y-%m-%d")));
        }

        let body = self.get_text(&path, "jsondata").await?;
        let value: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| MacrolensError::Data(format!("malformed SDMX body: {e}")))?;
        let rows = sdmx::observations(&value)?;
        Ok(rows
            .into_iter()
            .map(|(date, rate)| RawObservation {
                date,
                value: Some(rate.to_string()),
            })
            .collect())
    }
}

#[async_trait]
impl CurveProvider for EcbConnector {
    /// Assemble the AAA spot curve tenor by tenor over SDMX JSON, pausing
    /// between requests. Tenors that fail the JSON path are backfilled from
    /// one bulk CSV request; the snapshot errors only when both paths come
    /// up empty.
    async fn yield_curve(&self) -> Result<Vec<TenorPoint>, MacrolensError> {
        let mut resolved: BTreeMap<String, TenorPoint> = BTreeMap::new();
        for (i, (tenor, suffix)) in CURVE_TENORS.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(self.request_delay).await;
            }
            match self.tenor_point(tenor, suffix).await {
                Ok(point) => {
                    resolved.insert((*tenor).to_string(), point);
                }
                Err(e) => debug!(tenor, error = %e, "curve tenor failed over SDMX JSON"),
            }
        }

        if resolved.len() < CURVE_TENORS.len() {
            match self.curve_from_csv().await {
                Ok(points) => {
                    for (tenor, point) in points {
                        resolved.entry(tenor).or_insert(point);
                    }
                }
                Err(e) => debug!(error = %e, "bulk CSV curve fallback failed"),
            }
        }

        if resolved.is_empty() {
            return Err(MacrolensError::upstream(
                Self::NAME,
                "no curve tenor resolved".to_string(),
            ));
        }

        // Emit in maturity order rather than map order.
        Ok(CURVE_TENORS
            .iter()
            .filter_map(|(tenor, _)| resolved.remove(*tenor))
            .collect())
    }
}
