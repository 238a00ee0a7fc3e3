pub mod system_settings;

pub use system_settings::{
    SystemSettings, UpdateSettingsRequest, DEFAULT_COMMISSION_RATE, DEFAULT_HOME_COUNTRY,
    DEFAULT_STANDARD_VAT_RATE, GLOBAL_SETTINGS_ID,
};
