pub mod controllers;
pub mod models;
pub mod repositories;

pub use models::{SystemSettings, UpdateSettingsRequest};
pub use repositories::SettingsRepository;
