//! `nw cart ...`

use nearwomen_core::ProductId;
use nearwomen_storefront::cart::{CartBackend, CartView};
use nearwomen_storefront::error::{StorefrontError, add_breadcrumb};
use nearwomen_storefront::state::AppState;

use super::resolve_product;

/// Print the cart.
pub async fn show(state: &AppState) -> Result<(), StorefrontError> {
    let cart = state.cart().await;
    print_cart(&CartView::from(cart.cart()));
    Ok(())
}

/// Add `quantity` units of a product.
pub async fn add(state: &AppState, id: i32, quantity: u32) -> Result<(), StorefrontError> {
    let product = resolve_product(state, ProductId::new(id)).await?;
    let mut cart = state.cart().await;
    cart.add_to_cart(&product, quantity).await?;

    let id = product.id.to_string();
    add_breadcrumb("cart", "Added to cart", Some(&[("product_id", id.as_str())]));
    print_line(&format!("Added {quantity} x {}", product.name));
    print_summary(&**cart);
    Ok(())
}

/// Take one unit of a product out.
pub async fn remove(state: &AppState, id: i32) -> Result<(), StorefrontError> {
    let id = ProductId::new(id);
    let mut cart = state.cart().await;
    if cart.cart().get(id).is_none() {
        print_line(&format!("Product {id} is not in your cart"));
        return Ok(());
    }
    cart.remove_from_cart(id).await?;

    let product_id = id.to_string();
    add_breadcrumb(
        "cart",
        "Removed from cart",
        Some(&[("product_id", product_id.as_str())]),
    );
    print_summary(&**cart);
    Ok(())
}

/// Set the quantity of a line. Negative input counts as zero.
pub async fn update(state: &AppState, id: i32, quantity: i64) -> Result<(), StorefrontError> {
    let id = ProductId::new(id);
    let quantity = clamp_quantity(quantity);
    let mut cart = state.cart().await;
    if cart.cart().get(id).is_none() {
        print_line(&format!("Product {id} is not in your cart"));
        return Ok(());
    }
    cart.update_quantity(id, quantity).await?;

    let (product_id, count) = (id.to_string(), quantity.to_string());
    add_breadcrumb(
        "cart",
        "Updated quantity",
        Some(&[("product_id", product_id.as_str()), ("quantity", count.as_str())]),
    );
    print_summary(&**cart);
    Ok(())
}

/// Remove a line whatever its quantity.
pub async fn drop_line(state: &AppState, id: i32) -> Result<(), StorefrontError> {
    let id = ProductId::new(id);
    let mut cart = state.cart().await;
    cart.remove_line(id).await?;
    print_summary(&**cart);
    Ok(())
}

/// Empty the cart.
pub async fn clear(state: &AppState) -> Result<(), StorefrontError> {
    let mut cart = state.cart().await;
    cart.clear_cart().await?;
    add_breadcrumb("cart", "Cleared cart", None);
    print_line("Cart cleared");
    Ok(())
}

fn clamp_quantity(quantity: i64) -> u32 {
    u32::try_from(quantity.max(0)).unwrap_or(u32::MAX)
}

fn print_summary(cart: &dyn CartBackend) {
    let count = cart.cart_item_count();
    let noun = if count == 1 { "item" } else { "items" };
    print_line(&format!("Cart: {count} {noun}, {}", cart.cart_total()));
}

fn print_cart(view: &CartView) {
    if view.is_empty() {
        print_line("Your cart is empty");
        return;
    }
    for item in &view.items {
        print_line(&format!(
            "  #{:<3} {:<34} {:>4} x {:>8} {:>9}",
            item.product_id, item.name, item.quantity, item.price, item.line_price
        ));
    }
    print_line(&format!("  {:<56}{:>9}", "Total", view.total));
    print_line(&format!("  {} items", view.item_count));
}

#[allow(clippy::print_stdout)]
fn print_line(line: &str) {
    println!("{line}");
}
