use crate::core::{AppError, Result};
use serde::Deserialize;
use std::env;

pub mod database;
pub mod server;

pub use database::DatabaseConfig;
pub use server::ServerConfig;

/// Upstream attribute id that carries the brand on catalog products
pub const DEFAULT_VENDOR_ATTRIBUTE_ID: &str = "QXR0cmlidXRlOjQ0";

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub webhook: WebhookConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Invalid log format: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookConfig {
    /// Shared secret for the order-paid HMAC signature
    pub secret: String,
    /// Product attribute id whose first value slug is the vendor key
    pub vendor_attribute_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    pub admin_api_secret: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = Config {
            app: AppConfig {
                env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "debug".to_string()),
                log_format: env::var("LOG_FORMAT")
                    .unwrap_or_else(|_| "pretty".to_string())
                    .parse()
                    .map_err(AppError::Configuration)?,
            },
            database: DatabaseConfig::from_env()?,
            server: ServerConfig::from_env()?,
            webhook: WebhookConfig {
                secret: env::var("WEBHOOK_SECRET")
                    .map_err(|_| AppError::Configuration("WEBHOOK_SECRET not set".to_string()))?,
                vendor_attribute_id: env::var("VENDOR_ATTRIBUTE_ID")
                    .unwrap_or_else(|_| DEFAULT_VENDOR_ATTRIBUTE_ID.to_string()),
            },
            security: SecurityConfig {
                admin_api_secret: env::var("ADMIN_API_SECRET").map_err(|_| {
                    AppError::Configuration("ADMIN_API_SECRET not set".to_string())
                })?,
            },
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.webhook.secret.trim().is_empty() {
            return Err(AppError::Configuration(
                "WEBHOOK_SECRET must not be empty".to_string(),
            ));
        }

        if self.security.admin_api_secret.len() < 16 {
            return Err(AppError::Configuration(
                "ADMIN_API_SECRET must be at least 16 characters".to_string(),
            ));
        }

        if self.webhook.vendor_attribute_id.trim().is_empty() {
            return Err(AppError::Configuration(
                "VENDOR_ATTRIBUTE_ID must not be empty".to_string(),
            ));
        }

        if self.database.pool_size > self.database.max_connections {
            return Err(AppError::Configuration(
                "DATABASE_POOL_SIZE cannot exceed DATABASE_MAX_CONNECTIONS".to_string(),
            ));
        }

        Ok(())
    }
}
