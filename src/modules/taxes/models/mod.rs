pub mod tax;

pub use tax::{CommissionCharge, VatTreatment};
