pub mod vendor_controller;

pub use vendor_controller::configure;
