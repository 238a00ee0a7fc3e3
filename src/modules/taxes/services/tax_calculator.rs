use rust_decimal::Decimal;

use crate::core::{AppError, CountryCode, Currency, Result};
use crate::modules::taxes::models::{CommissionCharge, VatTreatment};

/// Everything the commission fee and its VAT depend on
#[derive(Debug, Clone, Copy)]
pub struct CommissionTaxInput<'a> {
    /// Effective commission percentage
    pub effective_rate: Decimal,
    /// Customer-facing gross total of the vendor's lines (the commission basis)
    pub order_gross_total: Decimal,
    pub vendor_country: &'a CountryCode,
    pub vendor_has_verified_vat: bool,
    pub home_country: &'a CountryCode,
    /// Standard VAT percentage in the home country
    pub standard_vat_rate: Decimal,
    pub currency: Currency,
}

/// Computes the platform's commission fee and the VAT owed on it
pub struct TaxCalculator;

impl TaxCalculator {
    /// Decision table for VAT on the commission:
    /// home-country vendor -> standard rate; foreign vendor with verified VAT
    /// number -> reverse charge; foreign vendor without -> standard rate.
    pub fn vat_treatment(
        vendor_country: &CountryCode,
        home_country: &CountryCode,
        vendor_has_verified_vat: bool,
    ) -> VatTreatment {
        if vendor_country == home_country {
            VatTreatment::Domestic
        } else if vendor_has_verified_vat {
            VatTreatment::ReverseCharge
        } else {
            VatTreatment::ForeignUnverified
        }
    }

    /// commission_net = gross × rate / 100, commission_vat = net × vat rate,
    /// both rounded to the currency scale so the amount is exactly net + vat.
    /// Zero and negative bases flow through unchanged; an amount too large for
    /// Decimal is a validation error.
    pub fn calculate(input: &CommissionTaxInput<'_>) -> Result<CommissionCharge> {
        let treatment = Self::vat_treatment(
            input.vendor_country,
            input.home_country,
            input.vendor_has_verified_vat,
        );
        let vat_rate = treatment.rate(input.standard_vat_rate);

        let net = Self::percent_of(input.order_gross_total, input.effective_rate)
            .map(|net| input.currency.round(net))
            .ok_or_else(|| AppError::amount_out_of_range("Commission"))?;
        let vat = Self::percent_of(net, vat_rate)
            .map(|vat| input.currency.round(vat))
            .ok_or_else(|| AppError::amount_out_of_range("Commission VAT"))?;
        let amount = net
            .checked_add(vat)
            .ok_or_else(|| AppError::amount_out_of_range("Commission amount"))?;

        Ok(CommissionCharge {
            net,
            vat_rate,
            vat,
            amount,
            treatment,
        })
    }

    fn percent_of(base: Decimal, rate: Decimal) -> Option<Decimal> {
        base.checked_mul(rate)?.checked_div(Decimal::ONE_HUNDRED)
    }
}
