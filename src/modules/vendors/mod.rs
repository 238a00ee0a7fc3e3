pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{VendorProfile, VendorResolution};
pub use repositories::VendorRepository;
pub use services::{EffectiveRate, RateResolver, RateSource, VendorService};
