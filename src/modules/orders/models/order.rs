// Order-paid payload as delivered by the commerce platform.
//
// Only the fields the commission engine reads are modelled; everything else in
// the upstream document is ignored by serde. Amounts arrive as JSON numbers and
// are decoded straight into Decimal.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{AppError, CountryCode, Currency, Result};

/// Width of the stored `order_id` column
pub const MAX_ORDER_ID_LENGTH: usize = 255;

/// Envelope of the `ORDER_PAID` webhook
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPaidEvent {
    pub order: Option<Order>,
}

/// A paid order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,

    #[serde(default)]
    pub lines: Vec<OrderLine>,

    #[serde(default)]
    pub shipping_address: Option<Address>,

    #[serde(default)]
    pub billing_address: Option<Address>,

    #[serde(default)]
    pub total: Option<TaxedMoney>,
}

impl Order {
    /// Order currency taken from the gross total, EUR when the platform omits it
    pub fn currency(&self) -> Result<Currency> {
        match self.total.as_ref().map(|t| t.gross.currency.trim()) {
            Some(code) if !code.is_empty() => code.parse().map_err(AppError::Validation),
            _ => Ok(Currency::default()),
        }
    }

    /// Destination country: shipping address first, then billing
    pub fn destination_country(&self) -> Option<CountryCode> {
        self.shipping_address
            .as_ref()
            .and_then(Address::country_code)
            .or_else(|| self.billing_address.as_ref().and_then(Address::country_code))
    }

    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(AppError::validation("Order id cannot be empty"));
        }
        if self.id.chars().count() > MAX_ORDER_ID_LENGTH {
            return Err(AppError::validation(format!(
                "Order id cannot exceed {} characters",
                MAX_ORDER_ID_LENGTH
            )));
        }
        self.currency()?;
        Ok(())
    }
}

/// One order line with the product attributes needed for vendor attribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub product_name: Option<String>,

    #[serde(default)]
    pub variant: Option<ProductVariant>,

    #[serde(default)]
    pub total_price: Option<TaxedMoney>,
}

impl OrderLine {
    /// Line gross total (zero when the platform sent no price)
    pub fn gross(&self) -> Decimal {
        self.total_price
            .as_ref()
            .map(|p| p.gross.amount)
            .unwrap_or(Decimal::ZERO)
    }

    /// Line net total (zero when the platform sent no price)
    pub fn net(&self) -> Decimal {
        self.total_price
            .as_ref()
            .map(|p| p.net.amount)
            .unwrap_or(Decimal::ZERO)
    }

    /// Slug of the first value of the given product attribute, if present and non-empty
    pub fn attribute_value(&self, attribute_id: &str) -> Option<&str> {
        self.variant
            .as_ref()?
            .product
            .attributes
            .iter()
            .find(|a| a.attribute.id == attribute_id)?
            .values
            .first()
            .map(|v| v.slug.trim())
            .filter(|slug| !slug.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductVariant {
    pub product: Product,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub attributes: Vec<AssignedAttribute>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignedAttribute {
    pub attribute: AttributeRef,
    #[serde(default)]
    pub values: Vec<AttributeValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeRef {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeValue {
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Money {
    pub amount: Decimal,
    #[serde(default)]
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxedMoney {
    pub gross: Money,
    pub net: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub country: Option<AddressCountry>,
}

impl Address {
    /// Parsed country; malformed codes are treated as missing
    pub fn country_code(&self) -> Option<CountryCode> {
        let raw = self.country.as_ref()?.code.as_str();
        match CountryCode::new(raw) {
            Ok(code) => Some(code),
            Err(e) => {
                tracing::warn!(country = raw, error = %e, "Ignoring malformed address country");
                None
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressCountry {
    pub code: String,
}
