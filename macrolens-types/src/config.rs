use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Whether a failed live fetch may be answered from an expired cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DegradedPolicy {
    /// Never serve expired data; transient failures surface as errors.
    Never,
    /// Serve the last cached copy when the live fetch fails, with a warning.
    StaleIfError,
}

impl DegradedPolicy {
    /// Resolve the policy from the runtime environment.
    ///
    /// Production deployments (`MACROLENS_ENV=production`) never serve stale
    /// data; every other environment degrades gracefully.
    #[must_use]
    pub fn from_env() -> Self {
        let is_production = std::env::var("MACROLENS_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);
        if is_production {
            Self::Never
        } else {
            Self::StaleIfError
        }
    }
}

/// Engine-level configuration shared by all routers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacrolensConfig {
    /// Per-provider call timeout.
    pub provider_timeout: Duration,
    /// Freshness window for cached series payloads.
    pub series_ttl: Duration,
    /// Freshness window for cached curve snapshots.
    pub curve_ttl: Duration,
    /// Stale-serving policy applied on live-fetch failures.
    pub degraded_policy: DegradedPolicy,
}

impl Default for MacrolensConfig {
    fn default() -> Self {
        Self {
            provider_timeout: Duration::from_secs(30),
            series_ttl: Duration::from_secs(3600),
            curve_ttl: Duration::from_secs(3600),
            degraded_policy: DegradedPolicy::from_env(),
        }
    }
}
