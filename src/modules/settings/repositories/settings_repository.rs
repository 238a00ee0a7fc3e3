use sqlx::{MySql, MySqlPool, Transaction};

use crate::core::{AppError, Result};
use crate::modules::settings::models::{
    SystemSettings, UpdateSettingsRequest, DEFAULT_COMMISSION_RATE, DEFAULT_HOME_COUNTRY,
    DEFAULT_STANDARD_VAT_RATE, GLOBAL_SETTINGS_ID,
};

/// Repository for the singleton settings row
///
/// The row is created on first access with the documented defaults, so a fresh
/// database never fails a pricing transaction for lack of settings.
#[derive(Clone)]
pub struct SettingsRepository {
    pool: MySqlPool,
}

impl SettingsRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Load settings outside a pricing transaction (admin reads)
    pub async fn load(&self) -> Result<SystemSettings> {
        Self::ensure_exists(&self.pool).await?;
        Self::fetch(&self.pool, "").await
    }

    /// Load settings inside the pricing transaction
    ///
    /// The upsert only runs on a fresh database; an existing row is read
    /// without taking its lock so pricing transactions do not queue on it.
    pub async fn load_with_tx(&self, tx: &mut Transaction<'_, MySql>) -> Result<SystemSettings> {
        if let Some(settings) = Self::fetch_optional(&mut **tx, "").await? {
            return Ok(settings);
        }

        Self::ensure_exists(&mut **tx).await?;
        // The snapshot predates a row committed by a concurrent first load
        Self::fetch(&mut **tx, "FOR SHARE").await
    }

    /// Apply a partial update and return the new settings
    pub async fn update(&self, request: &UpdateSettingsRequest) -> Result<SystemSettings> {
        Self::ensure_exists(&self.pool).await?;

        let vat_number = request.vat_number.as_deref().map(str::trim);

        sqlx::query(
            r#"
            UPDATE system_settings
            SET default_commission_rate = COALESCE(?, default_commission_rate),
                oss_enabled = COALESCE(?, oss_enabled),
                company_name = COALESCE(?, company_name),
                address_country = COALESCE(?, address_country),
                vat_number = CASE WHEN ? IS NULL THEN vat_number ELSE NULLIF(?, '') END,
                standard_vat_rate = COALESCE(?, standard_vat_rate)
            WHERE id = ?
            "#,
        )
        .bind(request.default_commission_rate)
        .bind(request.oss_enabled)
        .bind(request.company_name.as_deref().map(str::trim))
        .bind(&request.address_country)
        .bind(vat_number)
        .bind(vat_number)
        .bind(request.standard_vat_rate)
        .bind(GLOBAL_SETTINGS_ID)
        .execute(&self.pool)
        .await?;

        Self::fetch(&self.pool, "").await
    }

    async fn ensure_exists<'e, E>(executor: E) -> Result<()>
    where
        E: sqlx::Executor<'e, Database = MySql>,
    {
        sqlx::query(
            r#"
            INSERT INTO system_settings (
                id, default_commission_rate, oss_enabled, company_name,
                address_country, standard_vat_rate
            )
            VALUES (?, ?, FALSE, '', ?, ?)
            ON DUPLICATE KEY UPDATE id = id
            "#,
        )
        .bind(GLOBAL_SETTINGS_ID)
        .bind(DEFAULT_COMMISSION_RATE)
        .bind(DEFAULT_HOME_COUNTRY)
        .bind(DEFAULT_STANDARD_VAT_RATE)
        .execute(executor)
        .await?;

        Ok(())
    }

    async fn fetch<'e, E>(executor: E, lock: &str) -> Result<SystemSettings>
    where
        E: sqlx::Executor<'e, Database = MySql>,
    {
        Self::fetch_optional(executor, lock)
            .await?
            .ok_or_else(|| AppError::internal("Settings row missing after upsert"))
    }

    async fn fetch_optional<'e, E>(executor: E, lock: &str) -> Result<Option<SystemSettings>>
    where
        E: sqlx::Executor<'e, Database = MySql>,
    {
        let query = format!(
            r#"
            SELECT
                id, default_commission_rate, oss_enabled, company_name,
                address_country, vat_number, standard_vat_rate, created_at, updated_at
            FROM system_settings
            WHERE id = ?
            {}
            "#,
            lock
        );

        let settings = sqlx::query_as::<_, SystemSettings>(&query)
            .bind(GLOBAL_SETTINGS_ID)
            .fetch_optional(executor)
            .await?;

        Ok(settings)
    }
}
