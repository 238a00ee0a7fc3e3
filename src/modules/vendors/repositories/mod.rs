pub mod vendor_repository;

pub use vendor_repository::VendorRepository;
