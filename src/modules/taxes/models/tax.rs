use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How VAT applies to the platform's commission fee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VatTreatment {
    /// Vendor registered in the platform's home country: standard rate
    Domestic,
    /// Vendor abroad with a verified VAT number: 0%, vendor self-assesses
    ReverseCharge,
    /// Vendor abroad without a verified VAT number: standard rate, like B2C
    ForeignUnverified,
}

impl VatTreatment {
    /// VAT percentage charged on the commission for this treatment
    pub fn rate(&self, standard_vat_rate: Decimal) -> Decimal {
        match self {
            VatTreatment::ReverseCharge => Decimal::ZERO,
            VatTreatment::Domestic | VatTreatment::ForeignUnverified => standard_vat_rate,
        }
    }
}

/// Commission fee split into net and VAT, rounded to the order currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionCharge {
    pub net: Decimal,
    /// Applied VAT percentage
    pub vat_rate: Decimal,
    pub vat: Decimal,
    /// net + vat, the amount charged to the vendor
    pub amount: Decimal,
    pub treatment: VatTreatment,
}
