use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::MySqlPool;
use tracing::{debug, info, warn};

use crate::core::{AppError, Result};
use crate::modules::commissions::models::{Commission, CommissionStatus};
use crate::modules::commissions::repositories::CommissionRepository;
use crate::modules::commissions::services::commission_calculator::{
    CommissionCalculator, OrderContext,
};
use crate::modules::orders::models::{Order, OrderLine};
use crate::modules::orders::services::LineAttributor;
use crate::modules::settings::repositories::SettingsRepository;
use crate::modules::vendors::models::{VendorProfile, MAX_VENDOR_KEY_LENGTH};
use crate::modules::vendors::repositories::VendorRepository;

/// Result for one vendor group, handed to the invoice generator
#[derive(Debug, Clone, Serialize)]
pub struct VendorCommission {
    pub vendor: VendorProfile,
    /// True when this order provisioned the vendor
    pub vendor_created: bool,
    pub lines: Vec<OrderLine>,
    pub commission_amount: Decimal,
    pub commission: Commission,
}

/// Prices a paid order and records one commission per vendor
///
/// All groups of an order share one transaction: either every vendor row and
/// commission row is written, or none is.
#[derive(Clone)]
pub struct CommissionService {
    pool: MySqlPool,
    settings_repo: SettingsRepository,
    vendor_repo: VendorRepository,
    commission_repo: CommissionRepository,
    attributor: LineAttributor,
}

impl CommissionService {
    pub fn new(pool: MySqlPool, attributor: LineAttributor) -> Self {
        Self {
            settings_repo: SettingsRepository::new(pool.clone()),
            vendor_repo: VendorRepository::new(pool.clone()),
            commission_repo: CommissionRepository::new(pool.clone()),
            pool,
            attributor,
        }
    }

    /// Record commissions for a paid order as of now
    pub async fn record_order(&self, order: &Order) -> Result<Vec<VendorCommission>> {
        self.record_order_at(order, Utc::now()).await
    }

    /// Record commissions for a paid order, resolving overrides against `now`
    pub async fn record_order_at(
        &self,
        order: &Order,
        now: DateTime<Utc>,
    ) -> Result<Vec<VendorCommission>> {
        order.validate()?;
        let currency = order.currency()?;
        let groups = self.attributor.attribute(&order.lines);

        if let Some(group) = groups
            .iter()
            .find(|g| g.vendor_key.chars().count() > MAX_VENDOR_KEY_LENGTH)
        {
            return Err(AppError::validation(format!(
                "Vendor attribute value exceeds {} characters: '{}'",
                MAX_VENDOR_KEY_LENGTH, group.vendor_key
            )));
        }

        let mut tx = self.pool.begin().await?;

        let settings = self.settings_repo.load_with_tx(&mut tx).await?;
        let context = OrderContext {
            order_id: &order.id,
            currency,
            destination: order.destination_country(),
            settings: &settings,
            now,
        };

        let mut results = Vec::with_capacity(groups.len());

        for group in groups {
            let resolution = self
                .vendor_repo
                .find_or_create_with_tx(
                    &mut tx,
                    &group.vendor_key,
                    settings.default_commission_rate,
                    now,
                )
                .await?;

            let vendor_created = resolution.was_created();
            if vendor_created {
                info!(
                    vendor_key = %group.vendor_key,
                    commission_rate = %settings.default_commission_rate,
                    "Provisioned vendor profile"
                );
            }
            let vendor = resolution.into_profile();

            let breakdown = CommissionCalculator::calculate(&context, &vendor, &group.lines)?;

            if breakdown.needs_review {
                warn!(
                    order_id = %order.id,
                    vendor_key = %vendor.vendor_key,
                    order_gross_total = %breakdown.order_gross_total,
                    "Negative sale total, commission flagged for review"
                );
            }

            let commission = self.commission_repo.upsert_with_tx(&mut tx, &breakdown).await?;

            if commission.status == CommissionStatus::Settled {
                debug!(
                    commission_key = %commission.commission_key,
                    status = %commission.status,
                    "Commission already settled, stored figures kept"
                );
            }

            debug!(
                order_id = %order.id,
                vendor_key = %vendor.vendor_key,
                rate = %breakdown.rate,
                rate_source = %breakdown.rate_source,
                commission_net = %breakdown.commission_net,
                commission_vat = %breakdown.commission_vat,
                is_oss = breakdown.is_oss,
                "Commission computed"
            );

            results.push(VendorCommission {
                vendor,
                vendor_created,
                lines: group.lines,
                commission_amount: commission.commission_amount,
                commission,
            });
        }

        tx.commit().await?;

        info!(
            order_id = %order.id,
            vendors = results.len(),
            currency = %currency,
            "Order commissions recorded"
        );

        Ok(results)
    }
}
