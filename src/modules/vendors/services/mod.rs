pub mod rate_resolver;
pub mod vendor_service;

pub use rate_resolver::{EffectiveRate, RateResolver, RateSource};
pub use vendor_service::{VendorDetail, VendorService};
