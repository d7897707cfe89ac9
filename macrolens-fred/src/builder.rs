use std::time::Duration;

use crate::FredConnector;

const DEFAULT_BASE_URL: &str = "https://api.stlouisfed.org";
const DEFAULT_CURVE_DELAY_MS: u64 = 500;

/// Builder for [`FredConnector`].
pub struct FredConnectorBuilder {
    base_url: String,
    api_key: Option<String>,
    curve_delay: Duration,
}

impl Default for FredConnectorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FredConnectorBuilder {
    /// Start with the production endpoint, no credential, and a 500ms pause
    /// between curve-tenor requests.
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            curve_delay: Duration::from_millis(DEFAULT_CURVE_DELAY_MS),
        }
    }

    /// Set the API credential explicitly.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Read the API credential from `FRED_API_KEY`, leaving the connector
    /// unconfigured when the variable is absent.
    #[must_use]
    pub fn api_key_from_env(mut self) -> Self {
        self.api_key = std::env::var("FRED_API_KEY").ok();
        self
    }

    /// Point the connector at a different endpoint (tests, proxies).
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Pause between the sequential per-tenor curve requests.
    #[must_use]
    pub const fn curve_request_delay(mut self, delay: Duration) -> Self {
        self.curve_delay = delay;
        self
    }

    /// Finish the build.
    #[must_use]
    pub fn build(self) -> FredConnector {
        FredConnector::from_parts(self.base_url, self.api_key, self.curve_delay)
    }
}
