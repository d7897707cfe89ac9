use std::time::Duration;

use crate::EcbConnector;

const DEFAULT_BASE_URL: &str = "https://data-api.ecb.europa.eu";

/// Pause between per-tenor curve requests; the portal throttles bursts.
const DEFAULT_REQUEST_DELAY_MS: u64 = 500;

/// Builder for [`EcbConnector`].
#[derive(Debug, Clone)]
pub struct EcbConnectorBuilder {
    base_url: String,
    request_delay: Duration,
}

impl EcbConnectorBuilder {
    /// Builder preset with the production portal endpoint.
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_delay: Duration::from_millis(DEFAULT_REQUEST_DELAY_MS),
        }
    }

    /// Override the portal base URL, mainly for tests.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Pause between consecutive per-tenor curve requests.
    #[must_use]
    pub const fn request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    /// Finalize into a connector.
    #[must_use]
    pub fn build(self) -> EcbConnector {
        EcbConnector::from_parts(self.base_url, self.request_delay)
    }
}

impl Default for EcbConnectorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
