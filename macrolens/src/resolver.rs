//! Series identity resolution: alias translation, availability gating, and
//! fallback chains for discontinued identifiers.

use macrolens_types::{Availability, ResolvedIdentity};

/// Legacy identifiers mapped to their current canonical successors.
const ALIASES: [(&str, &str); 5] = [
    // Trade-weighted dollar index, replaced in 2019.
    ("TWEXB", "DTWEXBGS"),
    // Target rate became a target range in December 2008.
    ("DFEDTAR", "DFEDTARU"),
    // Shorthand identifiers accepted for convenience.
    ("CPI", "CPIAUCSL"),
    ("M2", "M2SL"),
    ("UNEMPLOYMENT", "UNRATE"),
];

/// Candidate chains for series whose history spans a rename. The first entry
/// is the canonical identifier; later entries are tried when it is missing.
const FALLBACK_CHAINS: [(&str, &[&str]); 2] = [
    ("DFEDTARU", &["DFEDTARU", "DFEDTAR"]),
    ("DTWEXBGS", &["DTWEXBGS", "TWEXB"]),
];

/// Serviceability overrides for identifiers that cannot be served normally.
fn availability_of(canonical: &str) -> Availability {
    match canonical {
        "WILL5000IND" => Availability::NotAvailable {
            reason: "removed from the provider catalog; no successor series exists".to_string(),
        },
        "DGS30" => Availability::Limited {
            caveat: "30-year issuance was suspended from 2002 to 2006; the series has a gap"
                .to_string(),
        },
        _ => Availability::Available,
    }
}

/// Resolve a requested identifier to its canonical form, fallback chain, and
/// serviceability.
///
/// Resolution is a pure table lookup: it never touches the network, so a
/// permanently unservable series is refused before any provider call.
#[must_use]
pub fn resolve(requested: &str) -> ResolvedIdentity {
    let requested_id = requested.trim().to_ascii_uppercase();
    let canonical_id = ALIASES
        .iter()
        .find(|(alias, _)| *alias == requested_id)
        .map_or_else(|| requested_id.clone(), |(_, canonical)| (*canonical).to_string());

    let fallback_chain: Vec<String> = FALLBACK_CHAINS
        .iter()
        .find(|(id, _)| *id == canonical_id)
        .map_or_else(
            || vec![canonical_id.clone()],
            |(_, chain)| chain.iter().map(|c| (*c).to_string()).collect(),
        );

    let availability = availability_of(&canonical_id);

    ResolvedIdentity {
        requested_id,
        canonical_id,
        fallback_chain,
        availability,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_translate_and_case_folds() {
        let identity = resolve("twexb");
        assert_eq!(identity.requested_id, "TWEXB");
        assert_eq!(identity.canonical_id, "DTWEXBGS");
        assert_eq!(identity.fallback_chain, vec!["DTWEXBGS", "TWEXB"]);
    }

    #[test]
    fn unknown_identifiers_pass_through() {
        let identity = resolve("GDPC1");
        assert_eq!(identity.canonical_id, "GDPC1");
        assert_eq!(identity.fallback_chain, vec!["GDPC1"]);
        assert_eq!(identity.availability, Availability::Available);
    }

    #[test]
    fn discontinued_series_are_refused() {
        let identity = resolve("WILL5000IND");
        assert!(matches!(
            identity.availability,
            Availability::NotAvailable { .. }
        ));
    }

    #[test]
    fn target_rate_alias_lands_on_the_upper_bound_chain() {
        let identity = resolve("DFEDTAR");
        assert_eq!(identity.canonical_id, "DFEDTARU");
        assert_eq!(identity.fallback_chain, vec!["DFEDTARU", "DFEDTAR"]);
    }
}
