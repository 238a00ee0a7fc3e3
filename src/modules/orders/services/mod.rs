pub mod line_attributor;
pub mod signature;

pub use line_attributor::{LineAttributor, VendorGroup, UNBRANDED_VENDOR_KEY};
pub use signature::{sign_payload, verify_signature, SIGNATURE_HEADER};
