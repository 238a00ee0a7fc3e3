use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::modules::vendors::models::VendorProfile;

/// Which of the vendor's rates was applied to a commission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RateSource {
    Base,
    Override,
}

impl fmt::Display for RateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateSource::Base => write!(f, "BASE"),
            RateSource::Override => write!(f, "OVERRIDE"),
        }
    }
}

impl std::str::FromStr for RateSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BASE" => Ok(RateSource::Base),
            "OVERRIDE" => Ok(RateSource::Override),
            _ => Err(format!("Invalid rate source: {}", s)),
        }
    }
}

impl TryFrom<String> for RateSource {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Commission percentage in effect for a vendor at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveRate {
    pub rate: Decimal,
    pub source: RateSource,
}

/// Resolves base vs temporary commission rates
///
/// Derived from stored columns only: an expired override stays in the row and
/// simply stops applying.
pub struct RateResolver;

impl RateResolver {
    pub fn resolve(vendor: &VendorProfile, now: DateTime<Utc>) -> EffectiveRate {
        Self::resolve_rates(
            vendor.commission_rate,
            vendor.temporary_commission_rate,
            vendor.temporary_commission_ends_at,
            now,
        )
    }

    pub fn resolve_rates(
        base_rate: Decimal,
        temporary_rate: Option<Decimal>,
        temporary_ends_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> EffectiveRate {
        match (temporary_rate, temporary_ends_at) {
            (Some(rate), Some(ends_at)) if ends_at > now => EffectiveRate {
                rate,
                source: RateSource::Override,
            },
            _ => EffectiveRate {
                rate: base_rate,
                source: RateSource::Base,
            },
        }
    }
}
