use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

use crate::core::{CountryCode, Currency};
use crate::modules::vendors::services::RateSource;

/// Settlement state of a commission row
///
/// The pricing engine only ever writes `Pending`; payout marks rows `Settled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum CommissionStatus {
    #[default]
    Pending,
    Settled,
}

impl fmt::Display for CommissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommissionStatus::Pending => write!(f, "PENDING"),
            CommissionStatus::Settled => write!(f, "SETTLED"),
        }
    }
}

impl std::str::FromStr for CommissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(CommissionStatus::Pending),
            "SETTLED" => Ok(CommissionStatus::Settled),
            _ => Err(format!("Invalid commission status: {}", s)),
        }
    }
}

impl TryFrom<String> for CommissionStatus {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Idempotency key of a commission row: `{order_id}-{vendor_key}`
pub fn commission_key(order_id: &str, vendor_key: &str) -> String {
    format!("{}-{}", order_id, vendor_key)
}

/// Computed commission for one (order, vendor) pair, before persistence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommissionBreakdown {
    pub commission_key: String,
    pub order_id: String,
    pub vendor_profile_id: String,
    pub vendor_key: String,
    pub rate: Decimal,
    pub rate_source: RateSource,
    pub order_gross_total: Decimal,
    pub order_net_total: Decimal,
    pub order_vat_total: Decimal,
    pub order_vat_rate: Decimal,
    pub destination_country: CountryCode,
    pub is_oss: bool,
    pub commission_net: Decimal,
    pub commission_vat: Decimal,
    pub commission_amount: Decimal,
    pub currency: Currency,
    /// Negative sale totals (refunds) are kept as-is and surfaced to operators
    pub needs_review: bool,
}

/// Persisted commission row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Commission {
    pub id: String,
    pub commission_key: String,
    pub order_id: String,
    pub vendor_profile_id: String,
    pub vendor_key: String,

    /// Commission percentage actually applied
    pub rate: Decimal,

    #[sqlx(try_from = "String")]
    pub rate_source: RateSource,

    pub order_gross_total: Decimal,
    pub order_net_total: Decimal,
    pub order_vat_total: Decimal,
    pub order_vat_rate: Decimal,
    pub destination_country: CountryCode,
    pub is_oss: bool,
    pub commission_net: Decimal,
    pub commission_vat: Decimal,
    pub commission_amount: Decimal,

    #[sqlx(try_from = "String")]
    pub currency: Currency,

    #[sqlx(try_from = "String")]
    pub status: CommissionStatus,

    pub needs_review: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
