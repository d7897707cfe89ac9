//! Frequency negotiation between a requested cadence and what a series
//! natively offers.

use macrolens_types::Frequency;
use serde::{Deserialize, Serialize};

/// Why the served frequency differs from the requested one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubstitutionReason {
    /// The series is natively coarser than requested; upsampling is never done.
    NativeCoarser,
    /// The provider rejected the frequency parameter at fetch time.
    ProviderRejected,
}

/// The outcome of frequency negotiation for one fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyDecision {
    /// Frequency to send upstream; `None` omits the parameter and keeps the
    /// native cadence.
    pub effective: Option<Frequency>,
    /// True when the decision differs from what the caller asked for.
    pub substituted: bool,
    /// Why a substitution happened, when it did.
    pub reason: Option<SubstitutionReason>,
}

impl FrequencyDecision {
    /// A decision that honors the request as-is.
    #[must_use]
    pub const fn honored(effective: Option<Frequency>) -> Self {
        Self {
            effective,
            substituted: false,
            reason: None,
        }
    }

    /// Mark this decision as downgraded after a provider rejection.
    #[must_use]
    pub const fn rejected_by_provider(self) -> Self {
        Self {
            effective: None,
            substituted: true,
            reason: Some(SubstitutionReason::ProviderRejected),
        }
    }
}

/// Negotiate the frequency to request upstream.
///
/// Rules, in order:
/// - no requested frequency: keep the native cadence, no substitution;
/// - requested matches native: honor it;
/// - native is coarser than requested: downgrade to native (a series cannot
///   be upsampled);
/// - requested is coarser than native: honor it, providers aggregate
///   server-side.
///
/// A series without reported native cadence is trusted to serve whatever was
/// requested; a provider rejection at fetch time is handled by the router,
/// not here.
#[must_use]
pub fn negotiate(native: Option<Frequency>, requested: Option<Frequency>) -> FrequencyDecision {
    let Some(requested) = requested else {
        return FrequencyDecision::honored(None);
    };
    match native {
        Some(native) if native.is_coarser_than(requested) => FrequencyDecision {
            effective: Some(native),
            substituted: true,
            reason: Some(SubstitutionReason::NativeCoarser),
        },
        _ => FrequencyDecision::honored(Some(requested)),
    }
}
