pub mod vendor_profile;

pub use vendor_profile::{
    display_name_from_key, RegisterVendorRequest, SetOverrideRequest, UpdateVendorRequest,
    VendorProfile, VendorResolution, MAX_VENDOR_KEY_LENGTH,
};
