pub mod country;
pub mod currency;
pub mod error;
pub mod percentage;

pub use country::CountryCode;
pub use currency::Currency;
pub use error::{AppError, Result};
pub use percentage::validate_percentage;
