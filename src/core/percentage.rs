use rust_decimal::Decimal;

use crate::core::{AppError, Result};

const MAX_PERCENTAGE_SCALE: u32 = 2;

/// Validate a percentage field (commission or VAT rate): 0..=100, max 2 decimal places
pub fn validate_percentage(field: &str, value: Decimal) -> Result<()> {
    if value < Decimal::ZERO {
        return Err(AppError::validation(format!("{} cannot be negative", field)));
    }

    if value > Decimal::ONE_HUNDRED {
        return Err(AppError::validation(format!("{} cannot exceed 100", field)));
    }

    if value.normalize().scale() > MAX_PERCENTAGE_SCALE {
        return Err(AppError::validation(format!(
            "{} cannot have more than {} decimal places",
            field, MAX_PERCENTAGE_SCALE
        )));
    }

    Ok(())
}
