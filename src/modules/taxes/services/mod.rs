pub mod oss_classifier;
pub mod tax_calculator;

pub use oss_classifier::OssClassifier;
pub use tax_calculator::{CommissionTaxInput, TaxCalculator};
