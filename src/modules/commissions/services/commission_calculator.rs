use chrono::{DateTime, Utc};

use crate::core::{CountryCode, Currency, Result};
use crate::modules::commissions::models::{commission_key, CommissionBreakdown};
use crate::modules::commissions::services::financial_aggregator::FinancialAggregator;
use crate::modules::orders::models::OrderLine;
use crate::modules::settings::models::SystemSettings;
use crate::modules::taxes::services::{CommissionTaxInput, OssClassifier, TaxCalculator};
use crate::modules::vendors::models::VendorProfile;
use crate::modules::vendors::services::RateResolver;

/// Order-level facts shared by every vendor group of one order
#[derive(Debug, Clone)]
pub struct OrderContext<'a> {
    pub order_id: &'a str,
    pub currency: Currency,
    /// Shipping country, else billing country, when the order carries one
    pub destination: Option<CountryCode>,
    pub settings: &'a SystemSettings,
    pub now: DateTime<Utc>,
}

/// Prices one vendor group: no I/O, same inputs always give the same row
pub struct CommissionCalculator;

impl CommissionCalculator {
    pub fn calculate(
        context: &OrderContext<'_>,
        vendor: &VendorProfile,
        lines: &[OrderLine],
    ) -> Result<CommissionBreakdown> {
        let settings = context.settings;
        let home_country = settings.home_country();

        let effective = RateResolver::resolve(vendor, context.now);
        let totals = FinancialAggregator::aggregate(lines)?;

        // Auto-provisioned vendors have no country yet; treat them as domestic
        let vendor_country = vendor.country_code.as_ref().unwrap_or(home_country);

        let destination = OssClassifier::destination(context.destination.clone(), home_country);
        let is_oss = OssClassifier::is_oss(settings.oss_enabled, &destination, vendor_country);

        let charge = TaxCalculator::calculate(&CommissionTaxInput {
            effective_rate: effective.rate,
            order_gross_total: totals.gross_total,
            vendor_country,
            vendor_has_verified_vat: vendor.has_verified_vat_number(),
            home_country,
            standard_vat_rate: settings.standard_vat_rate,
            currency: context.currency,
        })?;

        Ok(CommissionBreakdown {
            commission_key: commission_key(context.order_id, &vendor.vendor_key),
            order_id: context.order_id.to_string(),
            vendor_profile_id: vendor.id.clone(),
            vendor_key: vendor.vendor_key.clone(),
            rate: effective.rate,
            rate_source: effective.source,
            order_gross_total: totals.gross_total,
            order_net_total: totals.net_total,
            order_vat_total: totals.vat_total,
            order_vat_rate: totals.vat_rate,
            destination_country: destination,
            is_oss,
            commission_net: charge.net,
            commission_vat: charge.vat,
            commission_amount: charge.amount,
            currency: context.currency,
            needs_review: totals.is_negative(),
        })
    }
}
