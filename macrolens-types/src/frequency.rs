use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::MacrolensError;

/// Observation cadence of an economic series, ordered from finest to coarsest.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// One observation per business day.
    Daily,
    /// One observation per week.
    Weekly,
    /// One observation every two weeks.
    Biweekly,
    /// One observation per month.
    Monthly,
    /// One observation per quarter.
    Quarterly,
    /// One observation per half year.
    Semiannual,
    /// One observation per year.
    Annual,
}

impl Frequency {
    /// Short provider code ("d", "w", "bw", "m", "q", "sa", "a").
    #[must_use]
    pub const fn as_code(self) -> &'static str {
        match self {
            Self::Daily => "d",
            Self::Weekly => "w",
            Self::Biweekly => "bw",
            Self::Monthly => "m",
            Self::Quarterly => "q",
            Self::Semiannual => "sa",
            Self::Annual => "a",
        }
    }

    /// Human-readable label as providers print it in metadata.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Biweekly => "Biweekly",
            Self::Monthly => "Monthly",
            Self::Quarterly => "Quarterly",
            Self::Semiannual => "Semiannual",
            Self::Annual => "Annual",
        }
    }

    /// Returns true when `self` has fewer observations per year than `other`.
    #[must_use]
    pub fn is_coarser_than(self, other: Self) -> bool {
        self > other
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

impl FromStr for Frequency {
    type Err = MacrolensError;

    /// Accepts both short codes and the labels providers embed in metadata,
    /// case-insensitively ("Monthly" and "m" parse to the same value).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "d" | "daily" => Ok(Self::Daily),
            "w" | "weekly" => Ok(Self::Weekly),
            "bw" | "biweekly" => Ok(Self::Biweekly),
            "m" | "monthly" => Ok(Self::Monthly),
            "q" | "quarterly" => Ok(Self::Quarterly),
            "sa" | "semiannual" => Ok(Self::Semiannual),
            "a" | "annual" | "yearly" => Ok(Self::Annual),
            other => Err(MacrolensError::InvalidArg(format!(
                "unknown frequency: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_and_codes_parse_to_the_same_value() {
        assert_eq!("Monthly".parse::<Frequency>().unwrap(), Frequency::Monthly);
        assert_eq!("m".parse::<Frequency>().unwrap(), Frequency::Monthly);
        assert_eq!("D".parse::<Frequency>().unwrap(), Frequency::Daily);
    }

    #[test]
    fn ordering_reflects_coarseness() {
        assert!(Frequency::Monthly.is_coarser_than(Frequency::Daily));
        assert!(!Frequency::Daily.is_coarser_than(Frequency::Annual));
    }

    #[test]
    fn unknown_frequency_is_rejected() {
        assert!("fortnightly-ish".parse::<Frequency>().is_err());
    }
}
