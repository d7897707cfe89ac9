//! macrolens-fred
//!
//! Connector that implements `MacrolensConnector` on top of the FRED HTTP
//! API. Exposes series metadata, observations, catalog search, tag-based
//! discovery, and a Treasury yield-curve snapshot assembled from the
//! constant-maturity series. Pure I/O: normalization and routing decisions
//! live upstream.
#![warn(missing_docs)]

mod builder;

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use macrolens_core::connector::{
    CurveProvider, MacrolensConnector, SeriesMetadataProvider, SeriesObservationsProvider,
    SeriesSearchProvider, TagDiscoveryProvider,
};
use macrolens_types::{
    Frequency, MacrolensError, ObservationsRequest, RawObservation, RelatedSeries, SeriesMetadata,
    SeriesTag, TenorPoint,
};
use tracing::debug;

pub use builder::FredConnectorBuilder;

/// Sentinel FRED uses for observations with no value.
const MISSING_MARKER: &str = ".";

/// Constant-maturity Treasury series backing the curve snapshot, in
/// maturity order.
const CURVE_SERIES: [(&str, &str); 5] = [
    ("1Y", "DGS1"),
    ("2Y", "DGS2"),
    ("5Y", "DGS5"),
    ("10Y", "DGS10"),
    ("30Y", "DGS30"),
];

/// Connector for the FRED economic data API.
pub struct FredConnector {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    curve_delay: Duration,
}

impl FredConnector {
    /// Stable connector name for priority configuration.
    pub const NAME: &'static str = "macrolens-fred";

    /// Returns an unconfigured builder.
    ///
    /// Customize with the builder methods before calling `.build()`.
    #[must_use]
    pub fn builder() -> FredConnectorBuilder {
        FredConnectorBuilder::new()
    }

    /// Shorthand for a production connector with an explicit credential.
    #[must_use]
    pub fn new_with_key(api_key: impl Into<String>) -> Self {
        Self::builder().api_key(api_key).build()
    }

    pub(crate) fn from_parts(
        base_url: String,
        api_key: Option<String>,
        curve_delay: Duration,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
            curve_delay,
        }
    }

    fn api_key(&self) -> Result<&str, MacrolensError> {
        self.api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| MacrolensError::not_configured(Self::NAME))
    }

    fn looks_like_not_found(msg: &str) -> bool {
        let m = msg.to_ascii_lowercase();
        m.contains("does not exist") || m.contains("not found") || m.contains("no matching")
    }

    fn normalize_error(e: MacrolensError, what: &str) -> MacrolensError {
        match e {
            MacrolensError::Upstream { provider, msg } => {
                if Self::looks_like_not_found(&msg) {
                    MacrolensError::not_found(what.to_string())
                } else {
                    MacrolensError::Upstream { provider, msg }
                }
            }
            other => other,
        }
    }

    /// Issue one GET against the API and return the parsed JSON body.
    ///
    /// The credential is validated before any network activity, so a missing
    /// key never produces traffic. Non-success statuses are reduced to their
    /// `error_message` field when present, verbatim, so frequency rejections
    /// remain recognizable upstream.
    async fn get_json(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<serde_json::Value, MacrolensError> {
        let key = self.api_key()?.to_string();
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), path);
        let mut query: Vec<(&str, String)> = vec![
            ("api_key", key),
            ("file_type", "json".to_string()),
        ];
        query.extend(params.iter().map(|(k, v)| (*k, v.clone())));

        let resp = self
            .http
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| MacrolensError::upstream(Self::NAME, e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| MacrolensError::upstream(Self::NAME, e.to_string()))?;

        if !status.is_success() {
            let msg = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v["error_message"].as_str().map(str::to_string))
                .unwrap_or_else(|| format!("HTTP {status}"));
            return Err(MacrolensError::upstream(Self::NAME, msg));
        }

        serde_json::from_str(&body)
            .map_err(|e| MacrolensError::Data(format!("malformed response body: {e}")))
    }

    fn parse_date(s: &str) -> Result<NaiveDate, MacrolensError> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|e| MacrolensError::Data(format!("bad observation date {s:?}: {e}")))
    }

    fn metadata_from_value(v: &serde_json::Value) -> SeriesMetadata {
        let native_frequency = v["frequency_short"]
            .as_str()
            .or_else(|| v["frequency"].as_str())
            .and_then(|s| s.parse::<Frequency>().ok());
        SeriesMetadata {
            id: v["id"].as_str().unwrap_or_default().to_string(),
            title: v["title"].as_str().unwrap_or_default().to_string(),
            native_frequency,
            units: v["units"].as_str().map(str::to_string),
            seasonal_adjustment: v["seasonal_adjustment"].as_str().map(str::to_string),
            last_updated: v["last_updated"].as_str().map(str::to_string),
            popularity: v["popularity"].as_i64(),
        }
    }

    fn tags_from_value(v: &serde_json::Value) -> Vec<SeriesTag> {
        v["tags"]
            .as_array()
            .map(|tags| {
                tags.iter()
                    .filter_map(|t| {
                        Some(SeriesTag {
                            name: t["name"].as_str()?.to_string(),
                            popularity: t["popularity"].as_i64().unwrap_or(0),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Most recent numeric observation of one series, skipping the missing
    /// marker. Used by the curve snapshot.
    async fn latest_value(&self, series_id: &str) -> Result<(NaiveDate, f64), MacrolensError> {
        let params = [
            ("series_id", series_id.to_string()),
            ("sort_order", "desc".to_string()),
            ("limit", "5".to_string()),
        ];
        let body = self.get_json("fred/series/observations", &params).await?;
        let rows = body["observations"]
            .as_array()
            .ok_or_else(|| MacrolensError::Data("missing observations array".to_string()))?;
        for row in rows {
            let value = row["value"].as_str().unwrap_or(MISSING_MARKER);
            if value == MISSING_MARKER {
                continue;
            }
            if let (Ok(date), Ok(parsed)) = (
                Self::parse_date(row["date"].as_str().unwrap_or_default()),
                value.parse::<f64>(),
            ) {
                return Ok((date, parsed));
            }
        }
        Err(MacrolensError::not_found(format!(
            "recent observation for {series_id}"
        )))
    }
}

#[async_trait]
impl MacrolensConnector for FredConnector {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn vendor(&self) -> &'static str {
        "Federal Reserve Bank of St. Louis"
    }

    fn as_series_metadata_provider(&self) -> Option<&dyn SeriesMetadataProvider> {
        Some(self as &dyn SeriesMetadataProvider)
    }

    fn as_series_observations_provider(&self) -> Option<&dyn SeriesObservationsProvider> {
        Some(self as &dyn SeriesObservationsProvider)
    }

    fn as_series_search_provider(&self) -> Option<&dyn SeriesSearchProvider> {
        Some(self as &dyn SeriesSearchProvider)
    }

    fn as_tag_discovery_provider(&self) -> Option<&dyn TagDiscoveryProvider> {
        Some(self as &dyn TagDiscoveryProvider)
    }

    fn as_curve_provider(&self) -> Option<&dyn CurveProvider> {
        Some(self as &dyn CurveProvider)
    }
}

#[async_trait]
impl SeriesMetadataProvider for FredConnector {
    async fn series_metadata(&self, series_id: &str) -> Result<SeriesMetadata, MacrolensError> {
        let params = [("series_id", series_id.to_string())];
        let body = self
            .get_json("fred/series", &params)
            .await
            .map_err(|e| Self::normalize_error(e, &format!("series {series_id}")))?;
        let first = body["seriess"]
            .as_array()
            .and_then(|s| s.first())
            .ok_or_else(|| MacrolensError::not_found(format!("series {series_id}")))?;
        Ok(Self::metadata_from_value(first))
    }
}

#[async_trait]
impl SeriesObservationsProvider for FredConnector {
    async fn observations(
        &self,
        req: &ObservationsRequest,
    ) -> Result<Vec<RawObservation>, MacrolensError> {
        let mut params = vec![("series_id", req.series_id.clone())];
        if let Some(start) = req.start {
            params.push(("observation_start", start.format("%Y-%m-%d").to_string()));
        }
        if let Some(end) = req.end {
            params.push(("observation_end", end.format("%Y-%m-%d").to_string()));
        }
        if let Some(freq) = req.frequency {
            params.push(("frequency", freq.as_code().to_string()));
        }
        if let Some(units) = &req.units {
            params.push(("units", units.clone()));
        }

        let body = self
            .get_json("fred/series/observations", &params)
            .await
            .map_err(|e| Self::normalize_error(e, &format!("series {}", req.series_id)))?;
        let rows = body["observations"]
            .as_array()
            .ok_or_else(|| MacrolensError::Data("missing observations array".to_string()))?;

        rows.iter()
            .map(|row| {
                let date = Self::parse_date(row["date"].as_str().unwrap_or_default())?;
                Ok(RawObservation {
                    date,
                    value: row["value"].as_str().map(str::to_string),
                })
            })
            .collect()
    }

    fn missing_marker(&self) -> &'static str {
        MISSING_MARKER
    }
}

#[async_trait]
impl SeriesSearchProvider for FredConnector {
    async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SeriesMetadata>, MacrolensError> {
        let params = [
            ("search_text", query.to_string()),
            ("limit", limit.to_string()),
        ];
        let body = self.get_json("fred/series/search", &params).await?;
        Ok(body["seriess"]
            .as_array()
            .map(|rows| rows.iter().map(Self::metadata_from_value).collect())
            .unwrap_or_default())
    }
}

#[async_trait]
impl TagDiscoveryProvider for FredConnector {
    async fn series_tags(&self, series_id: &str) -> Result<Vec<SeriesTag>, MacrolensError> {
        let params = [("series_id", series_id.to_string())];
        let body = self
            .get_json("fred/series/tags", &params)
            .await
            .map_err(|e| Self::normalize_error(e, &format!("tags for {series_id}")))?;
        Ok(Self::tags_from_value(&body))
    }

    async fn related_tags(&self, tag_names: &[String]) -> Result<Vec<SeriesTag>, MacrolensError> {
        let params = [("tag_names", tag_names.join(";"))];
        let body = self.get_json("fred/related_tags", &params).await?;
        Ok(Self::tags_from_value(&body))
    }

    async fn series_for_tags(
        &self,
        tag_names: &[String],
        limit: usize,
    ) -> Result<Vec<RelatedSeries>, MacrolensError> {
        let params = [
            ("tag_names", tag_names.join(";")),
            ("limit", limit.to_string()),
            ("order_by", "popularity".to_string()),
            ("sort_order", "desc".to_string()),
        ];
        let body = self.get_json("fred/tags/series", &params).await?;
        Ok(body["seriess"]
            .as_array()
            .map(|rows| {
                rows.iter()
                    .filter_map(|row| {
                        Some(RelatedSeries {
                            id: row["id"].as_str()?.to_string(),
                            title: row["title"].as_str().unwrap_or_default().to_string(),
                            popularity: row["popularity"].as_i64().unwrap_or(0),
                            frequency: row["frequency"].as_str().map(str::to_string),
                            units: row["units"].as_str().map(str::to_string),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[async_trait]
impl CurveProvider for FredConnector {
    /// Assemble the Treasury curve from the constant-maturity series, one
    /// request per tenor with a fixed pause in between. Tenors that fail to
    /// resolve are skipped; the snapshot errors only when every tenor fails.
    async fn yield_curve(&self) -> Result<Vec<TenorPoint>, MacrolensError> {
        let mut points = Vec::with_capacity(CURVE_SERIES.len());
        for (i, (tenor, series_id)) in CURVE_SERIES.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(self.curve_delay).await;
            }
            match self.latest_value(series_id).await {
                Ok((date, value)) => points.push(TenorPoint {
                    tenor: (*tenor).to_string(),
                    date,
                    value,
                }),
                Err(e @ MacrolensError::NotConfigured { .. }) => return Err(e),
                Err(e) => debug!(tenor, series_id, error = %e, "skipping curve tenor"),
            }
        }
        if points.is_empty() {
            return Err(MacrolensError::upstream(
                Self::NAME,
                "no curve tenor resolved".to_string(),
            ));
        }
        Ok(points)
    }
}
