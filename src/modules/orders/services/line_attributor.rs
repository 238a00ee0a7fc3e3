use std::collections::BTreeMap;

use crate::modules::orders::models::OrderLine;

/// Group key for lines whose product carries no vendor attribute
pub const UNBRANDED_VENDOR_KEY: &str = "unbranded";

/// Order lines attributed to one vendor, in original order
#[derive(Debug, Clone, PartialEq)]
pub struct VendorGroup {
    pub vendor_key: String,
    pub lines: Vec<OrderLine>,
}

/// Partitions order lines by the vendor attribute on their product
#[derive(Debug, Clone)]
pub struct LineAttributor {
    attribute_id: String,
}

impl LineAttributor {
    pub fn new(attribute_id: impl Into<String>) -> Self {
        Self {
            attribute_id: attribute_id.into(),
        }
    }

    /// Vendor key for a single line, falling back to the unbranded sentinel
    pub fn vendor_key<'a>(&self, line: &'a OrderLine) -> &'a str {
        line.attribute_value(&self.attribute_id)
            .unwrap_or(UNBRANDED_VENDOR_KEY)
    }

    /// Every line lands in exactly one group; groups come back sorted by key so
    /// concurrent deliveries of one order touch vendor rows in the same order.
    pub fn attribute(&self, lines: &[OrderLine]) -> Vec<VendorGroup> {
        let mut groups: BTreeMap<String, Vec<OrderLine>> = BTreeMap::new();

        for line in lines {
            groups
                .entry(self.vendor_key(line).to_string())
                .or_default()
                .push(line.clone());
        }

        groups
            .into_iter()
            .map(|(vendor_key, lines)| VendorGroup { vendor_key, lines })
            .collect()
    }
}
