//! In-memory shopping cart.
//!
//! [`Cart`] is the authoritative line-item collection. All operations are
//! synchronous and total: unknown product IDs and zero quantities are no-ops,
//! never errors, so stale references from a display never fault the cart.
//!
//! # Invariants
//!
//! - At most one [`CartLineItem`] per [`ProductId`].
//! - Every line item has a quantity of at least 1.
//! - Line items keep insertion order.
//! - [`Cart::total`] and [`Cart::item_count`] are recomputed on every call.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Category, CurrencyCode, Price, Product, ProductId};

/// A product/quantity pairing inside a cart.
///
/// Carries the product's display fields so a cart can be rendered without a
/// catalog lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    #[serde(rename = "id")]
    pub product_id: ProductId,
    pub name: String,
    /// Unit price at the time the product was added. Never negative.
    #[serde(deserialize_with = "crate::types::price::deserialize_amount")]
    pub price: Decimal,
    pub category: Category,
    #[serde(default)]
    pub image: String,
    pub quantity: u32,
}

impl CartLineItem {
    fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            price: product.price,
            category: product.category,
            image: product.image.clone(),
            quantity,
        }
    }

    /// Unit price with currency.
    #[must_use]
    pub const fn unit_price(&self) -> Price {
        Price::new(self.price, CurrencyCode::USD)
    }

    /// Unit price multiplied by quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price().times(self.quantity)
    }

    /// Whether the price is non-negative and the line total fits a [`Decimal`].
    fn is_priced(&self) -> bool {
        Price::try_new(self.price, CurrencyCode::USD).is_ok()
            && self.unit_price().checked_times(self.quantity).is_some()
    }
}

/// The full serialized state of a cart.
///
/// Serializes as a bare JSON array of line items, which is the format kept
/// under the cart's storage key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartSnapshot(pub Vec<CartLineItem>);

impl CartSnapshot {
    /// Line items in display order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.0
    }
}

/// Ordered collection of line items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Rebuild a cart from a stored snapshot.
    ///
    /// Stored data is not trusted to uphold the cart invariants: duplicate
    /// product IDs are merged into the first occurrence, and lines with a
    /// zero quantity, a negative price or an unrepresentable line total are
    /// dropped.
    #[must_use]
    pub fn from_snapshot(snapshot: CartSnapshot) -> Self {
        let mut cart = Self::new();
        for item in snapshot.0 {
            if item.quantity == 0 || !item.is_priced() {
                continue;
            }
            match cart.position(item.product_id) {
                Some(index) => {
                    if let Some(existing) = cart.items.get_mut(index) {
                        existing.quantity = existing.quantity.saturating_add(item.quantity);
                    }
                }
                None => cart.items.push(item),
            }
        }
        cart
    }

    /// Copy of the current state for persistence or submission.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot(self.items.clone())
    }

    /// Add `quantity` units of `product`.
    ///
    /// Increments the existing line item for the product, or appends a new
    /// one. There is no cap against the product's stock count.
    ///
    /// Returns `false` (and changes nothing) when `quantity` is zero.
    pub fn add(&mut self, product: &Product, quantity: u32) -> bool {
        if quantity == 0 {
            return false;
        }
        match self.items.iter_mut().find(|i| i.product_id == product.id) {
            Some(item) => item.quantity = item.quantity.saturating_add(quantity),
            None => self
                .items
                .push(CartLineItem::from_product(product, quantity)),
        }
        true
    }

    /// Take one unit of a product out of the cart.
    ///
    /// Decrements by exactly one, removing the line when its quantity was 1.
    /// Returns `false` when the product is not in the cart.
    pub fn remove_one(&mut self, product_id: ProductId) -> bool {
        let Some(index) = self.position(product_id) else {
            return false;
        };
        match self.items.get_mut(index) {
            Some(item) if item.quantity > 1 => item.quantity -= 1,
            _ => {
                self.items.remove(index);
            }
        }
        true
    }

    /// Set a line item's quantity directly.
    ///
    /// A quantity of zero removes the line. Returns `false` when the product
    /// is not in the cart or the quantity is unchanged.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: u32) -> bool {
        let Some(index) = self.position(product_id) else {
            return false;
        };
        if quantity == 0 {
            self.items.remove(index);
            return true;
        }
        match self.items.get_mut(index) {
            Some(item) if item.quantity != quantity => {
                item.quantity = quantity;
                true
            }
            _ => false,
        }
    }

    /// Drop a product's line item regardless of its quantity.
    ///
    /// Returns the removed line, or `None` if the product was absent.
    pub fn remove_line(&mut self, product_id: ProductId) -> Option<CartLineItem> {
        let index = self.position(product_id)?;
        Some(self.items.remove(index))
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of unit price times quantity over all line items.
    ///
    /// Saturates at [`Decimal::MAX`] instead of overflowing.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(CartLineItem::line_total).sum()
    }

    /// Sum of quantities (the cart badge count).
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLineItem] {
        &self.items
    }

    /// The line item for a product, if present.
    #[must_use]
    pub fn get(&self, product_id: ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|i| i.product_id == product_id)
    }

    /// Number of distinct products in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.items.iter().position(|i| i.product_id == product_id)
    }
}

impl From<CartSnapshot> for Cart {
    fn from(snapshot: CartSnapshot) -> Self {
        Self::from_snapshot(snapshot)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn product(id: i32, cents: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Decimal::new(cents, 2),
            category: Category::Menstrual,
            description: String::new(),
            image: String::new(),
            stock: 10,
        }
    }

    /// Recompute the total from scratch for comparison.
    fn expected_total(cart: &Cart) -> Decimal {
        cart.lines()
            .iter()
            .map(|i| i.price * Decimal::from(i.quantity))
            .sum()
    }

    #[test]
    fn test_add_twice_then_other_product() {
        let pads = product(1, 1299);
        let cup = product(2, 2499);
        let mut cart = Cart::new();

        cart.add(&pads, 1);
        cart.add(&pads, 1);
        cart.add(&cup, 1);

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.get(pads.id).unwrap().quantity, 2);
        assert_eq!(cart.get(cup.id).unwrap().quantity, 1);
        assert_eq!(cart.total().amount, Decimal::new(5097, 2));
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_add_sums_quantities() {
        let p = product(5, 2999);
        let mut cart = Cart::new();
        for q in [1, 4, 2, 7] {
            assert!(cart.add(&p, q));
        }
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(p.id).unwrap().quantity, 14);
    }

    #[test]
    fn test_add_zero_is_rejected() {
        let p = product(5, 2999);
        let mut cart = Cart::new();
        assert!(!cart.add(&p, 0));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_saturates() {
        let p = product(5, 100);
        let mut cart = Cart::new();
        cart.add(&p, u32::MAX);
        cart.add(&p, 5);
        assert_eq!(cart.get(p.id).unwrap().quantity, u32::MAX);
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let mut cart = Cart::new();
        cart.add(&product(3, 100), 1);
        cart.add(&product(1, 100), 1);
        cart.add(&product(3, 100), 1);
        cart.add(&product(2, 100), 1);

        let ids: Vec<i32> = cart.lines().iter().map(|i| i.product_id.as_i32()).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_remove_one_decrements_then_removes() {
        let p = product(1, 1299);
        let mut cart = Cart::new();
        cart.add(&p, 2);

        assert!(cart.remove_one(p.id));
        assert_eq!(cart.get(p.id).unwrap().quantity, 1);

        assert!(cart.remove_one(p.id));
        assert!(cart.get(p.id).is_none());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_one_absent_is_noop() {
        let mut cart = Cart::new();
        cart.add(&product(1, 1299), 3);
        let before = cart.clone();

        assert!(!cart.remove_one(ProductId::new(99)));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_set_quantity() {
        let p = product(1, 1299);
        let mut cart = Cart::new();
        cart.add(&p, 1);

        assert!(cart.set_quantity(p.id, 6));
        assert_eq!(cart.get(p.id).unwrap().quantity, 6);

        assert!(!cart.set_quantity(p.id, 6));
        assert!(!cart.set_quantity(ProductId::new(42), 3));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_set_quantity_zero_removes() {
        let p = product(1, 1299);
        let mut cart = Cart::new();
        cart.add(&p, 4);

        assert!(cart.set_quantity(p.id, 0));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_line_drops_whole_line() {
        let p = product(1, 1299);
        let mut cart = Cart::new();
        cart.add(&p, 4);

        let removed = cart.remove_line(p.id).unwrap();
        assert_eq!(removed.quantity, 4);
        assert!(cart.remove_line(p.id).is_none());
    }

    #[test]
    fn test_clear_zeroes_total_and_count() {
        let mut cart = Cart::new();
        cart.add(&product(1, 1299), 2);
        cart.add(&product(2, 2499), 1);

        cart.clear();
        assert_eq!(cart.total().amount, Decimal::ZERO);
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn test_total_tracks_mixed_operations() {
        let products: Vec<Product> = (1..=5).map(|i| product(i, 999 + i64::from(i))).collect();
        let mut cart = Cart::new();

        for (step, p) in products.iter().cycle().take(40).enumerate() {
            let step = u32::try_from(step).unwrap();
            match step % 4 {
                0 | 1 => {
                    cart.add(p, step % 3 + 1);
                }
                2 => {
                    cart.remove_one(p.id);
                }
                _ => {
                    cart.set_quantity(p.id, step % 5);
                }
            }
            assert_eq!(cart.total().amount, expected_total(&cart));
            assert!(cart.lines().iter().all(|i| i.quantity > 0));
        }
    }

    #[test]
    fn test_snapshot_json_is_array() {
        let mut cart = Cart::new();
        cart.add(&product(1, 1299), 2);

        let json = serde_json::to_value(cart.snapshot()).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["id"], 1);
        assert_eq!(json[0]["quantity"], 2);
    }

    #[test]
    fn test_from_snapshot_drops_unpriceable_lines() {
        let ok = product(1, 1299);
        let mut negative = CartLineItem::from_product(&product(2, 2499), 1);
        negative.price = Decimal::new(-1299, 2);
        let huge = CartLineItem::from_product(&product(3, 0), 2);
        let huge = CartLineItem {
            price: Decimal::MAX,
            ..huge
        };

        let cart = Cart::from_snapshot(CartSnapshot(vec![
            negative,
            CartLineItem::from_product(&ok, 2),
            huge,
        ]));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total().amount, Decimal::new(2598, 2));
    }

    #[test]
    fn test_total_saturates_instead_of_overflowing() {
        let mut expensive = product(1, 0);
        expensive.price = Decimal::MAX;
        let mut cart = Cart::new();
        cart.add(&expensive, 3);
        cart.add(&product(2, 1299), 1);

        assert_eq!(cart.total().amount, Decimal::MAX);
        assert_eq!(cart.get(expensive.id).unwrap().line_total().amount, Decimal::MAX);
    }

    #[test]
    fn test_snapshot_with_negative_price_does_not_parse() {
        let raw = r#"[{"id":1,"name":"Pads","price":"-12.99","category":"menstrual","quantity":2}]"#;
        assert!(serde_json::from_str::<CartSnapshot>(raw).is_err());
    }

    #[test]
    fn test_from_snapshot_repairs_invariants() {
        let p = product(1, 1299);
        let q = product(2, 2499);
        let snapshot = CartSnapshot(vec![
            CartLineItem::from_product(&p, 2),
            CartLineItem::from_product(&q, 0),
            CartLineItem::from_product(&p, 3),
        ]);

        let cart = Cart::from_snapshot(snapshot);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(p.id).unwrap().quantity, 5);
    }
}
