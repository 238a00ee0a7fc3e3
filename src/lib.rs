//! Marketplace commission engine
//!
//! Splits paid orders by vendor, prices the platform's commission and the VAT
//! owed on it, and records one commission row per (order, vendor).

pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;

// Re-export commonly used types
pub use modules::commissions;
pub use modules::orders;
pub use modules::settings;
pub use modules::taxes;
pub use modules::vendors;
