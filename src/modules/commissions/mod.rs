pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Commission, CommissionBreakdown, CommissionStatus};
pub use repositories::CommissionRepository;
pub use services::{
    CommissionCalculator, CommissionService, InvoiceDispatcher, LoggingInvoiceDispatcher,
    VendorCommission,
};
