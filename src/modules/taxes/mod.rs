pub mod models;
pub mod services;

pub use models::{CommissionCharge, VatTreatment};
pub use services::{CommissionTaxInput, OssClassifier, TaxCalculator};
