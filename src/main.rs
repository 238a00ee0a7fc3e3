use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use marketplace_commission::config::{Config, DatabaseConfig, LogFormat};
use marketplace_commission::middleware::{AdminAuth, RequestId};
use marketplace_commission::modules::commissions::services::{
    CommissionService, LoggingInvoiceDispatcher,
};
use marketplace_commission::modules::orders::controllers::WebhookState;
use marketplace_commission::modules::orders::services::LineAttributor;
use marketplace_commission::modules::settings::repositories::SettingsRepository;
use marketplace_commission::modules::vendors::services::VendorService;
use marketplace_commission::modules::{health, orders, settings, vendors};

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "marketplace_commission={},actix_web=info",
            config.app.log_level
        ))
    });

    let registry = tracing_subscriber::registry().with(filter);
    match config.app.log_format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(fmt::layer()).init(),
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    config
        .validate()
        .context("Configuration validation failed")?;

    init_tracing(&config);

    tracing::info!(
        env = %config.app.env,
        bind_address = %config.server.bind_address(),
        "Starting marketplace commission engine"
    );

    let db_pool = config
        .database
        .create_pool()
        .await
        .context("Failed to create database pool")?;

    DatabaseConfig::run_migrations(&db_pool)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!(
        pool_size = config.database.pool_size,
        max_connections = config.database.max_connections,
        "Database ready"
    );

    let attributor = LineAttributor::new(config.webhook.vendor_attribute_id.clone());
    let webhook_state = web::Data::new(WebhookState {
        service: Arc::new(CommissionService::new(db_pool.clone(), attributor)),
        secret: config.webhook.secret.clone(),
        dispatcher: Arc::new(LoggingInvoiceDispatcher),
    });
    let vendor_service = web::Data::new(Arc::new(VendorService::new(db_pool.clone())));
    let settings_repository = web::Data::new(SettingsRepository::new(db_pool.clone()));
    let pool_data = web::Data::new(db_pool);
    let admin_auth = AdminAuth::new(&config.security.admin_api_secret);

    let bind_address = config.server.bind_address();
    let server = HttpServer::new(move || {
        App::new()
            .wrap(RequestId)
            .wrap(TracingLogger::default())
            .app_data(pool_data.clone())
            .app_data(webhook_state.clone())
            .app_data(vendor_service.clone())
            .app_data(settings_repository.clone())
            .configure(health::configure)
            .configure(orders::controllers::configure)
            .service(
                web::scope("/api")
                    .wrap(admin_auth.clone())
                    .configure(vendors::controllers::configure)
                    .configure(settings::controllers::configure),
            )
    })
    .workers(config.server.workers)
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await?;
    Ok(())
}
