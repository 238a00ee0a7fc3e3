use sqlx::{MySql, MySqlPool, Transaction};
use uuid::Uuid;

use crate::core::{AppError, Result};
use crate::modules::commissions::models::{Commission, CommissionBreakdown};

const COMMISSION_COLUMNS: &str = r#"
    id, commission_key, order_id, vendor_profile_id, vendor_key,
    rate, rate_source, order_gross_total, order_net_total, order_vat_total,
    order_vat_rate, destination_country, is_oss, commission_net, commission_vat,
    commission_amount, currency, status, needs_review, created_at, updated_at
"#;

/// Repository for commission rows
#[derive(Clone)]
pub struct CommissionRepository {
    pool: MySqlPool,
}

impl CommissionRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Insert or refresh the row for `breakdown.commission_key` inside the
    /// pricing transaction
    ///
    /// # Notes
    /// Redelivery overwrites every computed column, so replays converge on the
    /// same row. Rows already marked SETTLED keep their figures; `id`,
    /// `created_at` and `status` are never touched on conflict. The stored row
    /// is read back with `FOR UPDATE` so a row committed by a concurrent
    /// delivery is seen even when this upsert changed nothing.
    pub async fn upsert_with_tx(
        &self,
        tx: &mut Transaction<'_, MySql>,
        breakdown: &CommissionBreakdown,
    ) -> Result<Commission> {
        sqlx::query(
            r#"
            INSERT INTO commissions (
                id, commission_key, order_id, vendor_profile_id, vendor_key,
                rate, rate_source, order_gross_total, order_net_total, order_vat_total,
                order_vat_rate, destination_country, is_oss, commission_net,
                commission_vat, commission_amount, currency, status, needs_review
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 'PENDING', ?)
            ON DUPLICATE KEY UPDATE
                vendor_profile_id = IF(status = 'PENDING', VALUES(vendor_profile_id), vendor_profile_id),
                rate = IF(status = 'PENDING', VALUES(rate), rate),
                rate_source = IF(status = 'PENDING', VALUES(rate_source), rate_source),
                order_gross_total = IF(status = 'PENDING', VALUES(order_gross_total), order_gross_total),
                order_net_total = IF(status = 'PENDING', VALUES(order_net_total), order_net_total),
                order_vat_total = IF(status = 'PENDING', VALUES(order_vat_total), order_vat_total),
                order_vat_rate = IF(status = 'PENDING', VALUES(order_vat_rate), order_vat_rate),
                destination_country = IF(status = 'PENDING', VALUES(destination_country), destination_country),
                is_oss = IF(status = 'PENDING', VALUES(is_oss), is_oss),
                commission_net = IF(status = 'PENDING', VALUES(commission_net), commission_net),
                commission_vat = IF(status = 'PENDING', VALUES(commission_vat), commission_vat),
                commission_amount = IF(status = 'PENDING', VALUES(commission_amount), commission_amount),
                currency = IF(status = 'PENDING', VALUES(currency), currency),
                needs_review = IF(status = 'PENDING', VALUES(needs_review), needs_review)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&breakdown.commission_key)
        .bind(&breakdown.order_id)
        .bind(&breakdown.vendor_profile_id)
        .bind(&breakdown.vendor_key)
        .bind(breakdown.rate)
        .bind(breakdown.rate_source.to_string())
        .bind(breakdown.order_gross_total)
        .bind(breakdown.order_net_total)
        .bind(breakdown.order_vat_total)
        .bind(breakdown.order_vat_rate)
        .bind(&breakdown.destination_country)
        .bind(breakdown.is_oss)
        .bind(breakdown.commission_net)
        .bind(breakdown.commission_vat)
        .bind(breakdown.commission_amount)
        .bind(breakdown.currency.to_string())
        .bind(breakdown.needs_review)
        .execute(&mut **tx)
        .await?;

        let query = format!(
            "SELECT {} FROM commissions WHERE commission_key = ? FOR UPDATE",
            COMMISSION_COLUMNS
        );

        sqlx::query_as::<_, Commission>(&query)
            .bind(&breakdown.commission_key)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| {
                AppError::internal(format!(
                    "Commission '{}' was upserted but not found",
                    breakdown.commission_key
                ))
            })
    }

    /// All vendor rows of one order, by vendor key
    pub async fn find_by_order(&self, order_id: &str) -> Result<Vec<Commission>> {
        let query = format!(
            "SELECT {} FROM commissions WHERE order_id = ? ORDER BY vendor_key ASC",
            COMMISSION_COLUMNS
        );

        let commissions = sqlx::query_as::<_, Commission>(&query)
            .bind(order_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(commissions)
    }

    /// Commissions of a vendor, newest first
    pub async fn list_for_vendor(&self, vendor_profile_id: &str) -> Result<Vec<Commission>> {
        let query = format!(
            "SELECT {} FROM commissions WHERE vendor_profile_id = ? \
             ORDER BY created_at DESC, commission_key ASC",
            COMMISSION_COLUMNS
        );

        let commissions = sqlx::query_as::<_, Commission>(&query)
            .bind(vendor_profile_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(commissions)
    }
}
