//! Platform settings endpoints
//!
//! Changes apply to orders priced after the update; recorded commissions keep
//! the values they were computed with.

use actix_web::{web, HttpResponse};
use tracing::info;

use crate::core::Result;
use crate::modules::settings::models::UpdateSettingsRequest;
use crate::modules::settings::repositories::SettingsRepository;

/// GET /api/settings
pub async fn get_settings(repository: web::Data<SettingsRepository>) -> Result<HttpResponse> {
    let settings = repository.load().await?;
    Ok(HttpResponse::Ok().json(settings))
}

/// PUT /api/settings
pub async fn update_settings(
    repository: web::Data<SettingsRepository>,
    body: web::Json<UpdateSettingsRequest>,
) -> Result<HttpResponse> {
    let request = body.into_inner();
    request.validate()?;

    let settings = repository.update(&request).await?;

    info!(
        default_commission_rate = %settings.default_commission_rate,
        oss_enabled = settings.oss_enabled,
        home_country = %settings.address_country,
        "Platform settings updated"
    );

    Ok(HttpResponse::Ok().json(settings))
}

/// Configure settings routes (mounted under the admin scope)
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/settings")
            .route(web::get().to(get_settings))
            .route(web::put().to(update_settings)),
    );
}
