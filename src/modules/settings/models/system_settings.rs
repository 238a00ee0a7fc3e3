use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::{validate_percentage, AppError, CountryCode, Result};

/// Primary key of the singleton settings row
pub const GLOBAL_SETTINGS_ID: &str = "global";

pub const DEFAULT_COMMISSION_RATE: Decimal = dec!(10.00);
pub const DEFAULT_STANDARD_VAT_RATE: Decimal = dec!(21.00);
pub const DEFAULT_HOME_COUNTRY: &str = "NL";

/// Platform-wide settings, read once at the start of each pricing transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SystemSettings {
    pub id: String,

    /// Commission percentage given to auto-provisioned vendors
    pub default_commission_rate: Decimal,

    /// OSS reporting is opt-in
    pub oss_enabled: bool,

    pub company_name: String,

    /// Platform home country; VAT on commissions is owed here
    pub address_country: CountryCode,

    pub vat_number: Option<String>,

    /// Standard VAT percentage charged on commission fees
    pub standard_vat_rate: Decimal,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SystemSettings {
    pub fn home_country(&self) -> &CountryCode {
        &self.address_country
    }
}

impl Default for SystemSettings {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: GLOBAL_SETTINGS_ID.to_string(),
            default_commission_rate: DEFAULT_COMMISSION_RATE,
            oss_enabled: false,
            company_name: String::new(),
            address_country: CountryCode::from_static(DEFAULT_HOME_COUNTRY),
            vat_number: None,
            standard_vat_rate: DEFAULT_STANDARD_VAT_RATE,
            created_at: now,
            updated_at: now,
        }
    }
}

/// PUT /api/settings; absent fields keep their current value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSettingsRequest {
    pub default_commission_rate: Option<Decimal>,
    pub oss_enabled: Option<bool>,
    pub company_name: Option<String>,
    pub address_country: Option<CountryCode>,
    /// Empty string clears the VAT number
    pub vat_number: Option<String>,
    pub standard_vat_rate: Option<Decimal>,
}

impl UpdateSettingsRequest {
    pub fn validate(&self) -> Result<()> {
        if let Some(rate) = self.default_commission_rate {
            validate_percentage("default_commission_rate", rate)?;
        }
        if let Some(rate) = self.standard_vat_rate {
            validate_percentage("standard_vat_rate", rate)?;
        }
        if let Some(name) = &self.company_name {
            if name.len() > 255 {
                return Err(AppError::validation(
                    "company_name cannot exceed 255 characters",
                ));
            }
        }
        Ok(())
    }
}
