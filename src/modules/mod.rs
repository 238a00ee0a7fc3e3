pub mod commissions;
pub mod health;
pub mod orders;
pub mod settings;
pub mod taxes;
pub mod vendors;
