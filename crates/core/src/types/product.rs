//! Catalog product.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Category, CurrencyCode, Price, ProductId};

/// A product as listed in the catalog.
///
/// The wire format matches the order service's product documents: the unit
/// price is a JSON number and the category is its lowercase tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Unit price in USD. Never negative.
    #[serde(
        serialize_with = "rust_decimal::serde::float::serialize",
        deserialize_with = "super::price::deserialize_amount"
    )]
    pub price: Decimal,
    pub category: Category,
    #[serde(default)]
    pub description: String,
    /// Image URL.
    #[serde(default)]
    pub image: String,
    /// Units in stock. Informational only; the cart does not cap against it.
    #[serde(default, rename = "countInStock", alias = "stock")]
    pub stock: u32,
}

impl Product {
    /// Unit price with currency.
    #[must_use]
    pub const fn unit_price(&self) -> Price {
        Price::new(self.price, CurrencyCode::USD)
    }

    /// Whether the product's name or description contains `needle`.
    ///
    /// `needle` must already be lowercased.
    #[must_use]
    pub fn matches_search(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }
}
