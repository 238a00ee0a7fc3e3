use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::core::{AppError, Result};
use crate::modules::orders::models::OrderLine;

/// Scale of the stored sales-VAT percentage
const VAT_RATE_SCALE: u32 = 4;

/// Totals are stored as DECIMAL(19, 4): at most 15 integer digits
const MAX_TOTAL: Decimal = dec!(1000000000000000);

/// Stored as DECIMAL(9, 4)
const MAX_VAT_RATE: Decimal = dec!(100000);

/// Customer-facing sale totals for one vendor group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleTotals {
    pub gross_total: Decimal,
    pub net_total: Decimal,
    /// gross - net
    pub vat_total: Decimal,
    /// vat / net × 100, zero when net is not positive
    pub vat_rate: Decimal,
}

impl SaleTotals {
    /// Refunds arrive as negative totals and are flagged for review
    pub fn is_negative(&self) -> bool {
        self.gross_total < Decimal::ZERO
    }
}

/// Sums line amounts for a vendor group
pub struct FinancialAggregator;

impl FinancialAggregator {
    /// Fails with a validation error when a total leaves the storable range
    pub fn aggregate(lines: &[OrderLine]) -> Result<SaleTotals> {
        let gross_total = Self::total(lines.iter().map(OrderLine::gross), "Gross total")?;
        let net_total = Self::total(lines.iter().map(OrderLine::net), "Net total")?;
        let vat_total = Self::bounded(gross_total.checked_sub(net_total), "VAT total")?;

        let vat_rate = if net_total > Decimal::ZERO {
            vat_total
                .checked_div(net_total)
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                .map(|rate| rate.round_dp(VAT_RATE_SCALE))
                .filter(|rate| rate.abs() < MAX_VAT_RATE)
                .ok_or_else(|| AppError::amount_out_of_range("VAT rate"))?
        } else {
            Decimal::ZERO
        };

        Ok(SaleTotals {
            gross_total,
            net_total,
            vat_total,
            vat_rate,
        })
    }

    fn total(amounts: impl Iterator<Item = Decimal>, field: &str) -> Result<Decimal> {
        let mut total = Decimal::ZERO;
        for amount in amounts {
            total = Self::bounded(total.checked_add(amount), field)?;
        }
        Ok(total)
    }

    fn bounded(value: Option<Decimal>, field: &str) -> Result<Decimal> {
        value
            .filter(|v| v.abs() < MAX_TOTAL)
            .ok_or_else(|| AppError::amount_out_of_range(field))
    }
}
