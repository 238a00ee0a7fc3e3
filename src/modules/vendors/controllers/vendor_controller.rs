use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::Result;
use crate::modules::vendors::models::{
    RegisterVendorRequest, SetOverrideRequest, UpdateVendorRequest,
};
use crate::modules::vendors::services::VendorService;

/// List vendors
/// GET /vendors
pub async fn list_vendors(service: web::Data<Arc<VendorService>>) -> Result<HttpResponse> {
    let vendors = service.list().await?;
    Ok(HttpResponse::Ok().json(vendors))
}

/// Register a vendor
/// POST /vendors
pub async fn register_vendor(
    service: web::Data<Arc<VendorService>>,
    request: web::Json<RegisterVendorRequest>,
) -> Result<HttpResponse> {
    let vendor = service.register(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(vendor))
}

/// Vendor profile with commission history
/// GET /vendors/{key}
pub async fn get_vendor(
    service: web::Data<Arc<VendorService>>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let detail = service.get_detail(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(detail))
}

/// PATCH /vendors/{key}
pub async fn update_vendor(
    service: web::Data<Arc<VendorService>>,
    path: web::Path<String>,
    request: web::Json<UpdateVendorRequest>,
) -> Result<HttpResponse> {
    let vendor = service
        .update(&path.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(vendor))
}

/// PUT /vendors/{key}/override
pub async fn set_override(
    service: web::Data<Arc<VendorService>>,
    path: web::Path<String>,
    request: web::Json<SetOverrideRequest>,
) -> Result<HttpResponse> {
    let vendor = service
        .set_override(&path.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(vendor))
}

/// DELETE /vendors/{key}/override
pub async fn remove_override(
    service: web::Data<Arc<VendorService>>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let vendor = service.remove_override(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(vendor))
}

/// Configure vendor routes (mounted under the admin scope)
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/vendors")
            .route("", web::get().to(list_vendors))
            .route("", web::post().to(register_vendor))
            .route("/{key}", web::get().to(get_vendor))
            .route("/{key}", web::patch().to(update_vendor))
            .route("/{key}/override", web::put().to(set_override))
            .route("/{key}/override", web::delete().to(remove_override)),
    );
}
