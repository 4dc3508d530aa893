//! Read-only cart projections for display.

use nearwomen_core::{Cart, CartLineItem, Category, ProductId};
use serde::Serialize;

/// Cart item display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartItemView {
    pub product_id: ProductId,
    pub name: String,
    pub category: Category,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
    pub image: Option<String>,
}

/// Cart display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub item_count: u64,
}

impl CartView {
    /// Create an empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: "$0.00".to_string(),
            item_count: 0,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.lines().iter().map(CartItemView::from).collect(),
            total: cart.total().to_string(),
            item_count: cart.item_count(),
        }
    }
}

impl From<&CartLineItem> for CartItemView {
    fn from(line: &CartLineItem) -> Self {
        Self {
            product_id: line.product_id,
            name: line.name.clone(),
            category: line.category,
            quantity: line.quantity,
            price: line.unit_price().to_string(),
            line_price: line.line_total().to_string(),
            image: (!line.image.is_empty()).then(|| line.image.clone()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use nearwomen_core::Product;
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_view_formats_prices() {
        let mut cart = Cart::new();
        cart.add(
            &Product {
                id: ProductId::new(11),
                name: "Safety Whistle Set".to_string(),
                price: Decimal::new(1299, 2),
                category: Category::Safety,
                description: String::new(),
                image: String::new(),
                stock: 45,
            },
            3,
        );

        let view = CartView::from(&cart);
        assert_eq!(view.item_count, 3);
        assert_eq!(view.total, "$38.97");
        assert_eq!(view.items[0].price, "$12.99");
        assert_eq!(view.items[0].line_price, "$38.97");
        assert!(view.items[0].image.is_none());
    }

    #[test]
    fn test_empty_view_matches_empty_cart() {
        assert_eq!(CartView::from(&Cart::new()), CartView::empty());
    }
}
