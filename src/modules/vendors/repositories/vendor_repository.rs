// Vendor profile persistence
//
// Every write is a single INSERT/UPDATE statement so concurrent writers are
// serialized by InnoDB row locks; nothing here reads a row and writes it back.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{MySql, MySqlPool, Transaction};

use crate::core::{AppError, Result};
use crate::modules::vendors::models::{
    RegisterVendorRequest, UpdateVendorRequest, VendorProfile, VendorResolution,
};

const VENDOR_COLUMNS: &str = r#"
    id, vendor_key, display_name, commission_rate,
    temporary_commission_rate, temporary_commission_ends_at,
    country_code, vat_number, is_vat_verified, created_at, updated_at
"#;

/// Repository for vendor profiles
#[derive(Clone)]
pub struct VendorRepository {
    pool: MySqlPool,
}

impl VendorRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Find vendor by its upstream key
    pub async fn find_by_key(&self, vendor_key: &str) -> Result<Option<VendorProfile>> {
        let query = format!(
            "SELECT {} FROM vendor_profiles WHERE vendor_key = ?",
            VENDOR_COLUMNS
        );
        let vendor = sqlx::query_as::<_, VendorProfile>(&query)
            .bind(vendor_key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vendor)
    }

    /// Find the vendor for an order group, provisioning it with the default rate
    /// when the key has never been seen
    ///
    /// # Notes
    /// Relies on the unique `vendor_key` index: the insert is a no-op for an
    /// existing row, and the freshly generated id tells the two outcomes apart.
    /// The row is re-read with a locking read: a no-op upsert of a row committed
    /// by a concurrent delivery is not visible to this transaction's snapshot.
    pub async fn find_or_create_with_tx(
        &self,
        tx: &mut Transaction<'_, MySql>,
        vendor_key: &str,
        default_rate: Decimal,
        now: DateTime<Utc>,
    ) -> Result<VendorResolution> {
        let candidate = VendorProfile::provisioned(vendor_key, default_rate, now);

        sqlx::query(
            r#"
            INSERT INTO vendor_profiles (
                id, vendor_key, display_name, commission_rate,
                is_vat_verified, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, FALSE, ?, ?)
            ON DUPLICATE KEY UPDATE vendor_key = vendor_key
            "#,
        )
        .bind(&candidate.id)
        .bind(&candidate.vendor_key)
        .bind(&candidate.display_name)
        .bind(candidate.commission_rate)
        .bind(candidate.created_at)
        .bind(candidate.updated_at)
        .execute(&mut **tx)
        .await?;

        let query = format!(
            "SELECT {} FROM vendor_profiles WHERE vendor_key = ? FOR UPDATE",
            VENDOR_COLUMNS
        );
        let profile = sqlx::query_as::<_, VendorProfile>(&query)
            .bind(vendor_key)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| {
                AppError::internal(format!(
                    "Vendor '{}' was upserted but not found",
                    vendor_key
                ))
            })?;

        if profile.id == candidate.id {
            Ok(VendorResolution::Created(profile))
        } else {
            Ok(VendorResolution::Found(profile))
        }
    }

    /// Register a vendor explicitly; duplicate keys are a validation error
    pub async fn create(
        &self,
        request: &RegisterVendorRequest,
        commission_rate: Decimal,
    ) -> Result<VendorProfile> {
        let mut profile =
            VendorProfile::provisioned(request.vendor_key.trim(), commission_rate, Utc::now());
        profile.display_name = request.display_name.trim().to_string();
        profile.country_code = request.country_code.clone();
        profile.vat_number = request
            .vat_number
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);
        profile.is_vat_verified = request.is_vat_verified;

        sqlx::query(
            r#"
            INSERT INTO vendor_profiles (
                id, vendor_key, display_name, commission_rate,
                country_code, vat_number, is_vat_verified, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&profile.id)
        .bind(&profile.vendor_key)
        .bind(&profile.display_name)
        .bind(profile.commission_rate)
        .bind(&profile.country_code)
        .bind(&profile.vat_number)
        .bind(profile.is_vat_verified)
        .bind(profile.created_at)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let err = AppError::Database(e);
            if err.is_unique_violation() {
                AppError::validation(format!("Vendor '{}' already exists", profile.vendor_key))
            } else {
                err
            }
        })?;

        self.require(&profile.vendor_key).await
    }

    /// List all vendors ordered by display name
    pub async fn list(&self) -> Result<Vec<VendorProfile>> {
        let query = format!(
            "SELECT {} FROM vendor_profiles ORDER BY display_name ASC",
            VENDOR_COLUMNS
        );
        let vendors = sqlx::query_as::<_, VendorProfile>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(vendors)
    }

    /// Apply a partial profile update
    pub async fn update(
        &self,
        vendor_key: &str,
        request: &UpdateVendorRequest,
    ) -> Result<VendorProfile> {
        let display_name = request.display_name.as_deref().map(str::trim);
        let vat_number = request.vat_number.as_deref().map(str::trim);

        sqlx::query(
            r#"
            UPDATE vendor_profiles
            SET display_name = COALESCE(?, display_name),
                commission_rate = COALESCE(?, commission_rate),
                country_code = COALESCE(?, country_code),
                vat_number = CASE WHEN ? IS NULL THEN vat_number ELSE NULLIF(?, '') END,
                is_vat_verified = COALESCE(?, is_vat_verified)
            WHERE vendor_key = ?
            "#,
        )
        .bind(display_name)
        .bind(request.commission_rate)
        .bind(&request.country_code)
        .bind(vat_number)
        .bind(vat_number)
        .bind(request.is_vat_verified)
        .bind(vendor_key)
        .execute(&self.pool)
        .await?;

        self.require(vendor_key).await
    }

    /// Set a temporary commission override
    pub async fn set_override(
        &self,
        vendor_key: &str,
        rate: Decimal,
        ends_at: DateTime<Utc>,
    ) -> Result<VendorProfile> {
        sqlx::query(
            r#"
            UPDATE vendor_profiles
            SET temporary_commission_rate = ?, temporary_commission_ends_at = ?
            WHERE vendor_key = ?
            "#,
        )
        .bind(rate)
        .bind(ends_at)
        .bind(vendor_key)
        .execute(&self.pool)
        .await?;

        self.require(vendor_key).await
    }

    /// Remove the temporary override (both columns together)
    pub async fn clear_override(&self, vendor_key: &str) -> Result<VendorProfile> {
        sqlx::query(
            r#"
            UPDATE vendor_profiles
            SET temporary_commission_rate = NULL, temporary_commission_ends_at = NULL
            WHERE vendor_key = ?
            "#,
        )
        .bind(vendor_key)
        .execute(&self.pool)
        .await?;

        self.require(vendor_key).await
    }

    async fn require(&self, vendor_key: &str) -> Result<VendorProfile> {
        self.find_by_key(vendor_key)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Vendor '{}' not found", vendor_key)))
    }
}

// Repository behaviour against a real database is covered in
// tests/integration/commission_pipeline_test.rs and vendor_admin_test.rs
