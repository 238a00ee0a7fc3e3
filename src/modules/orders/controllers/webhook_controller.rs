use std::sync::Arc;

use actix_web::{web, HttpRequest, HttpResponse};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::core::{AppError, Currency, Result};
use crate::modules::commissions::services::{
    CommissionService, InvoiceDispatcher, VendorCommission,
};
use crate::modules::orders::models::OrderPaidEvent;
use crate::modules::orders::services::{verify_signature, SIGNATURE_HEADER};

/// Shared state of the order webhook
#[derive(Clone)]
pub struct WebhookState {
    pub service: Arc<CommissionService>,
    pub secret: String,
    pub dispatcher: Arc<dyn InvoiceDispatcher>,
}

/// Per-vendor entry of the webhook response
#[derive(Debug, Serialize)]
pub struct VendorCommissionSummary {
    pub vendor_key: String,
    pub vendor_created: bool,
    pub commission_key: String,
    pub lines: usize,
    pub commission_amount: Decimal,
    pub currency: Currency,
    pub needs_review: bool,
}

impl From<&VendorCommission> for VendorCommissionSummary {
    fn from(result: &VendorCommission) -> Self {
        Self {
            vendor_key: result.vendor.vendor_key.clone(),
            vendor_created: result.vendor_created,
            commission_key: result.commission.commission_key.clone(),
            lines: result.lines.len(),
            commission_amount: result.commission_amount,
            currency: result.commission.currency,
            needs_review: result.commission.needs_review,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OrderPaidResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    pub commissions: Vec<VendorCommissionSummary>,
}

/// Handle the order-paid webhook
/// POST /webhooks/order-paid
///
/// The signature covers the raw body, so the payload is parsed only after it
/// has been verified. Any persistence failure is returned as 500 and the
/// upstream redelivers; replays converge on the same rows.
pub async fn order_paid(
    state: web::Data<WebhookState>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let signature = req
        .headers()
        .get(SIGNATURE_HEADER)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::validation(format!("Missing {} header", SIGNATURE_HEADER)))?;

    if let Err(e) = verify_signature(&state.secret, &body, signature) {
        warn!(error = %e, "Rejected order webhook");
        return Err(e);
    }

    let event: OrderPaidEvent = serde_json::from_slice(&body)?;

    let Some(order) = event.order else {
        info!("Order webhook without order, ignored");
        return Ok(HttpResponse::Ok().json(OrderPaidResponse {
            status: "ignored",
            order_id: None,
            commissions: Vec::new(),
        }));
    };

    let results = state.service.record_order(&order).await.map_err(|e| {
        error!(order_id = %order.id, error = %e, "Failed to record order commissions");
        e
    })?;

    // Commissions are committed at this point; a failed hand-off must not
    // trigger a redelivery that would duplicate invoices that did go out.
    if let Err(e) = state.dispatcher.dispatch(&order.id, &results).await {
        error!(order_id = %order.id, error = %e, "Invoice dispatch failed");
    }

    Ok(HttpResponse::Ok().json(OrderPaidResponse {
        status: "processed",
        order_id: Some(order.id.clone()),
        commissions: results.iter().map(VendorCommissionSummary::from).collect(),
    }))
}

/// Configure webhook routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/webhooks").route("/order-paid", web::post().to(order_paid)));
}
