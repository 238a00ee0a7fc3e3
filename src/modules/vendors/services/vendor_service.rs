use chrono::Utc;
use serde::Serialize;
use sqlx::MySqlPool;
use tracing::info;

use crate::core::{AppError, Result};
use crate::modules::commissions::models::Commission;
use crate::modules::commissions::repositories::CommissionRepository;
use crate::modules::settings::repositories::SettingsRepository;
use crate::modules::vendors::models::{
    RegisterVendorRequest, SetOverrideRequest, UpdateVendorRequest, VendorProfile,
};
use crate::modules::vendors::repositories::VendorRepository;
use crate::modules::vendors::services::rate_resolver::{EffectiveRate, RateResolver};

/// Vendor profile with the rate in effect right now and its commission history
#[derive(Debug, Clone, Serialize)]
pub struct VendorDetail {
    #[serde(flatten)]
    pub profile: VendorProfile,
    pub effective_rate: EffectiveRate,
    pub commissions: Vec<Commission>,
}

/// Vendor administration
///
/// Rate changes only affect orders priced afterwards; recorded commissions
/// keep the rate they were computed with.
#[derive(Clone)]
pub struct VendorService {
    vendor_repo: VendorRepository,
    settings_repo: SettingsRepository,
    commission_repo: CommissionRepository,
}

impl VendorService {
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            vendor_repo: VendorRepository::new(pool.clone()),
            settings_repo: SettingsRepository::new(pool.clone()),
            commission_repo: CommissionRepository::new(pool),
        }
    }

    pub async fn list(&self) -> Result<Vec<VendorProfile>> {
        self.vendor_repo.list().await
    }

    pub async fn get_detail(&self, vendor_key: &str) -> Result<VendorDetail> {
        let profile = self.require(vendor_key).await?;
        let commissions = self.commission_repo.list_for_vendor(&profile.id).await?;

        Ok(VendorDetail {
            effective_rate: RateResolver::resolve(&profile, Utc::now()),
            profile,
            commissions,
        })
    }

    /// Register a vendor ahead of its first order
    pub async fn register(&self, request: RegisterVendorRequest) -> Result<VendorProfile> {
        request.validate()?;

        let commission_rate = match request.commission_rate {
            Some(rate) => rate,
            None => self.settings_repo.load().await?.default_commission_rate,
        };

        let profile = self.vendor_repo.create(&request, commission_rate).await?;

        info!(
            vendor_key = %profile.vendor_key,
            commission_rate = %profile.commission_rate,
            "Vendor registered"
        );

        Ok(profile)
    }

    pub async fn update(
        &self,
        vendor_key: &str,
        request: UpdateVendorRequest,
    ) -> Result<VendorProfile> {
        request.validate()?;
        let profile = self.vendor_repo.update(vendor_key, &request).await?;

        info!(
            vendor_key = %profile.vendor_key,
            commission_rate = %profile.commission_rate,
            is_vat_verified = profile.is_vat_verified,
            "Vendor profile updated"
        );

        Ok(profile)
    }

    pub async fn set_override(
        &self,
        vendor_key: &str,
        request: SetOverrideRequest,
    ) -> Result<VendorProfile> {
        request.validate(Utc::now())?;
        let profile = self
            .vendor_repo
            .set_override(vendor_key, request.rate, request.ends_at)
            .await?;

        info!(
            vendor_key = %profile.vendor_key,
            rate = %request.rate,
            ends_at = %request.ends_at,
            "Temporary commission override set"
        );

        Ok(profile)
    }

    pub async fn remove_override(&self, vendor_key: &str) -> Result<VendorProfile> {
        let profile = self.vendor_repo.clear_override(vendor_key).await?;
        info!(vendor_key = %profile.vendor_key, "Temporary commission override removed");
        Ok(profile)
    }

    async fn require(&self, vendor_key: &str) -> Result<VendorProfile> {
        self.vendor_repo
            .find_by_key(vendor_key)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Vendor '{}' not found", vendor_key)))
    }
}
