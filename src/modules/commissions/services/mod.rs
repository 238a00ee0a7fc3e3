pub mod commission_calculator;
pub mod commission_service;
pub mod financial_aggregator;
pub mod invoice_dispatcher;

pub use commission_calculator::{CommissionCalculator, OrderContext};
pub use commission_service::{CommissionService, VendorCommission};
pub use financial_aggregator::{FinancialAggregator, SaleTotals};
pub use invoice_dispatcher::{InvoiceDispatcher, LoggingInvoiceDispatcher};
