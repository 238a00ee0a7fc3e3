use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::{validate_percentage, AppError, CountryCode, Result};

/// Width of the `vendor_key` column; upstream attribute slugs are at most this long
pub const MAX_VENDOR_KEY_LENGTH: usize = 255;

/// A vendor (brand) whose order lines the platform takes commission on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct VendorProfile {
    pub id: String,

    /// Attribute value tagging the vendor's products upstream (brand slug/id)
    pub vendor_key: String,

    pub display_name: String,

    /// Base commission percentage
    pub commission_rate: Decimal,

    /// Temporary override percentage; inert once `temporary_commission_ends_at` has passed
    pub temporary_commission_rate: Option<Decimal>,

    pub temporary_commission_ends_at: Option<DateTime<Utc>>,

    /// Registered country; unknown for auto-provisioned vendors
    pub country_code: Option<CountryCode>,

    pub vat_number: Option<String>,

    pub is_vat_verified: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VendorProfile {
    /// Profile for a vendor key seen for the first time on an order
    pub fn provisioned(vendor_key: &str, default_rate: Decimal, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            vendor_key: vendor_key.to_string(),
            display_name: display_name_from_key(vendor_key),
            commission_rate: default_rate,
            temporary_commission_rate: None,
            temporary_commission_ends_at: None,
            country_code: None,
            vat_number: None,
            is_vat_verified: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Verified VAT number on file (reverse charge eligible when abroad)
    pub fn has_verified_vat_number(&self) -> bool {
        self.is_vat_verified
            && self
                .vat_number
                .as_deref()
                .map(|n| !n.trim().is_empty())
                .unwrap_or(false)
    }
}

/// Human-readable name for an auto-provisioned vendor: "acme-home-goods" -> "acme home goods"
pub fn display_name_from_key(vendor_key: &str) -> String {
    vendor_key.replace('-', " ")
}

/// Outcome of the find-or-create step for an order's vendor group
#[derive(Debug, Clone, PartialEq)]
pub enum VendorResolution {
    Found(VendorProfile),
    Created(VendorProfile),
}

impl VendorResolution {
    pub fn into_profile(self) -> VendorProfile {
        match self {
            VendorResolution::Found(p) | VendorResolution::Created(p) => p,
        }
    }

    pub fn was_created(&self) -> bool {
        matches!(self, VendorResolution::Created(_))
    }
}

/// POST /api/vendors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterVendorRequest {
    pub vendor_key: String,
    pub display_name: String,
    /// Falls back to the platform default rate
    pub commission_rate: Option<Decimal>,
    pub country_code: Option<CountryCode>,
    pub vat_number: Option<String>,
    #[serde(default)]
    pub is_vat_verified: bool,
}

impl RegisterVendorRequest {
    pub fn validate(&self) -> Result<()> {
        let key = self.vendor_key.trim();
        if key.is_empty() {
            return Err(AppError::validation("vendor_key is required"));
        }
        if key.chars().count() > MAX_VENDOR_KEY_LENGTH {
            return Err(AppError::validation(format!(
                "vendor_key cannot exceed {} characters",
                MAX_VENDOR_KEY_LENGTH
            )));
        }
        if self.display_name.trim().is_empty() {
            return Err(AppError::validation("display_name is required"));
        }
        if let Some(rate) = self.commission_rate {
            validate_percentage("commission_rate", rate)?;
        }
        Ok(())
    }
}

/// PATCH /api/vendors/{key}; absent fields are left untouched, an empty
/// `vat_number` clears it
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateVendorRequest {
    pub display_name: Option<String>,
    pub commission_rate: Option<Decimal>,
    pub country_code: Option<CountryCode>,
    pub vat_number: Option<String>,
    pub is_vat_verified: Option<bool>,
}

impl UpdateVendorRequest {
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.display_name {
            if name.trim().is_empty() {
                return Err(AppError::validation("display_name cannot be empty"));
            }
        }
        if let Some(rate) = self.commission_rate {
            validate_percentage("commission_rate", rate)?;
        }
        Ok(())
    }
}

/// PUT /api/vendors/{key}/override
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetOverrideRequest {
    pub rate: Decimal,
    pub ends_at: DateTime<Utc>,
}

impl SetOverrideRequest {
    pub fn validate(&self, now: DateTime<Utc>) -> Result<()> {
        validate_percentage("rate", self.rate)?;
        if self.ends_at <= now {
            return Err(AppError::validation("ends_at must be in the future"));
        }
        Ok(())
    }
}
