pub mod order;

pub use order::{
    Address, AddressCountry, AssignedAttribute, AttributeRef, AttributeValue, Money, Order,
    OrderLine, OrderPaidEvent, Product, ProductVariant, TaxedMoney,
};
