use crate::core::CountryCode;

/// One-Stop-Shop classification of a vendor's sale
pub struct OssClassifier;

impl OssClassifier {
    /// Destination used for classification; orders without a usable address
    /// are treated as domestic sales in the platform's home country
    pub fn destination(order_destination: Option<CountryCode>, home_country: &CountryCode) -> CountryCode {
        order_destination.unwrap_or_else(|| home_country.clone())
    }

    /// Cross-border sale subject to OSS reporting. Always false while the
    /// platform has not opted in.
    pub fn is_oss(oss_enabled: bool, destination: &CountryCode, vendor_country: &CountryCode) -> bool {
        oss_enabled && destination != vendor_country
    }
}
