use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the macrolens workspace.
///
/// This wraps missing-credential conditions, capability mismatches,
/// provider-tagged upstream failures, not-found conditions, and an aggregate
/// for multi-provider attempts.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MacrolensError {
    /// The target provider requires a credential that was never supplied.
    #[error("provider not configured: {provider}")]
    NotConfigured {
        /// Provider name missing its credential (e.g. "macrolens-fred").
        provider: String,
    },

    /// The requested capability is not implemented by the target connector.
    #[error("unsupported capability: {capability}")]
    NotSupported {
        /// A capability string describing what was requested (e.g. "series_observations").
        capability: String,
    },

    /// A series or resource could not be found.
    #[error("not found: {what}")]
    NotFound {
        /// Description of the missing resource, e.g. "series DGS10".
        what: String,
    },

    /// The series is known but permanently unservable.
    #[error("series not available: {series} ({reason})")]
    NotAvailable {
        /// The series identifier that was refused.
        series: String,
        /// Why the series cannot be served.
        reason: String,
    },

    /// An upstream provider returned an error or could not be reached.
    #[error("{provider} failed: {msg}")]
    Upstream {
        /// Provider name that failed.
        provider: String,
        /// Human-readable error message.
        msg: String,
    },

    /// A transient failure with no usable cached copy to fall back on.
    #[error("temporarily unavailable: {what}")]
    Unavailable {
        /// Description of what could not be served.
        what: String,
    },

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// Issues with the returned or expected data (missing fields, bad shapes).
    #[error("data issue: {0}")]
    Data(String),

    /// An individual provider call exceeded the configured timeout.
    #[error("provider timed out: {capability} via {provider}")]
    ProviderTimeout {
        /// Provider name that timed out.
        provider: String,
        /// Capability label (e.g. "series_observations", "yield_curve").
        capability: String,
    },

    /// All selected providers failed; contains the individual failures.
    #[error("all providers failed: {0:?}")]
    AllProvidersFailed(Vec<MacrolensError>),
}

impl MacrolensError {
    /// Helper: build a `NotConfigured` error for a provider name.
    pub fn not_configured(provider: impl Into<String>) -> Self {
        Self::NotConfigured {
            provider: provider.into(),
        }
    }

    /// Helper: build a `NotSupported` error for a capability string.
    pub fn not_supported(cap: impl Into<String>) -> Self {
        Self::NotSupported {
            capability: cap.into(),
        }
    }

    /// Helper: build a `NotFound` error for a description of the missing resource.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Helper: build a `NotAvailable` error for a refused series.
    pub fn not_available(series: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::NotAvailable {
            series: series.into(),
            reason: reason.into(),
        }
    }

    /// Helper: build an `Upstream` error with the provider name and message.
    pub fn upstream(provider: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Upstream {
            provider: provider.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build an `Unavailable` error for a description of what failed.
    pub fn unavailable(what: impl Into<String>) -> Self {
        Self::Unavailable { what: what.into() }
    }

    /// Helper: build a `ProviderTimeout` error.
    pub fn provider_timeout(provider: impl Into<String>, capability: impl Into<String>) -> Self {
        Self::ProviderTimeout {
            provider: provider.into(),
            capability: capability.into(),
        }
    }

    /// Stable machine-readable code for the error envelope.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotConfigured { .. } => "MISSING_API_KEY",
            Self::NotSupported { .. } => "NOT_SUPPORTED",
            Self::NotFound { .. } => "SERIES_NOT_FOUND",
            Self::NotAvailable { .. } => "SERIES_NOT_AVAILABLE",
            Self::Upstream { .. } => "UPSTREAM_ERROR",
            Self::Unavailable { .. } => "SERVICE_UNAVAILABLE",
            Self::InvalidArg(_) => "INVALID_ARGUMENT",
            Self::Data(_) => "DATA_ERROR",
            Self::ProviderTimeout { .. } => "PROVIDER_TIMEOUT",
            Self::AllProvidersFailed(_) => "ALL_PROVIDERS_FAILED",
        }
    }

    /// Returns true if this upstream failure is a frequency-parameter rejection.
    ///
    /// Some providers refuse a conversion frequency they cannot serve for a
    /// given series. Routers retry those requests once with the parameter
    /// stripped instead of surfacing the error.
    #[must_use]
    pub fn is_frequency_rejection(&self) -> bool {
        match self {
            Self::Upstream { msg, .. } => msg.to_ascii_lowercase().contains("frequency"),
            _ => false,
        }
    }

    /// Returns true if a failure is definitive and must not trigger a
    /// cache fallback or a retry against another candidate identifier.
    #[must_use]
    pub const fn is_definitive(&self) -> bool {
        matches!(
            self,
            Self::NotConfigured { .. }
                | Self::NotSupported { .. }
                | Self::NotFound { .. }
                | Self::NotAvailable { .. }
                | Self::InvalidArg(_)
        )
    }

    /// Flatten nested `AllProvidersFailed` structures into a plain vector.
    ///
    /// This preserves other error variants as-is and unwraps recursively.
    #[must_use]
    pub fn flatten(self) -> Vec<Self> {
        match self {
            Self::AllProvidersFailed(list) => list.into_iter().flat_map(Self::flatten).collect(),
            other => vec![other],
        }
    }
}
