use async_trait::async_trait;
use tracing::info;

use crate::core::Result;
use crate::modules::commissions::services::commission_service::VendorCommission;

/// Hand-off point to the invoice generator
///
/// Called after the pricing transaction has committed, so implementations may
/// perform network calls.
#[async_trait]
pub trait InvoiceDispatcher: Send + Sync {
    async fn dispatch(&self, order_id: &str, results: &[VendorCommission]) -> Result<()>;
}

/// Dispatcher that only records the hand-off in the log
#[derive(Debug, Clone, Default)]
pub struct LoggingInvoiceDispatcher;

#[async_trait]
impl InvoiceDispatcher for LoggingInvoiceDispatcher {
    async fn dispatch(&self, order_id: &str, results: &[VendorCommission]) -> Result<()> {
        for result in results {
            info!(
                order_id = %order_id,
                vendor_key = %result.vendor.vendor_key,
                lines = result.lines.len(),
                commission_amount = %result.commission.currency.format_amount(result.commission_amount),
                "Vendor invoice ready"
            );
        }
        Ok(())
    }
}
