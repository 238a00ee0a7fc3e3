pub mod controllers;
pub mod models;
pub mod services;

pub use models::{Order, OrderLine, OrderPaidEvent};
pub use services::{LineAttributor, VendorGroup, UNBRANDED_VENDOR_KEY};
