//! `nw products`

use std::sync::Arc;

use nearwomen_core::{Category, Product};
use nearwomen_storefront::catalog::{Catalog, ProductFilter};
use nearwomen_storefront::error::StorefrontError;
use nearwomen_storefront::state::AppState;

/// List products matching the filter.
pub async fn list(
    state: &AppState,
    category: Option<Category>,
    search: Option<String>,
    remote: bool,
) -> Result<(), StorefrontError> {
    let mut filter = ProductFilter { category, search };

    let term = filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from);

    let catalog = match (remote, term) {
        (false, _) => state.catalog().clone(),
        // Let the service search; only the category is filtered here
        (true, Some(term)) => {
            let found = state.api().search_products(&term).await?;
            filter.search = None;
            Catalog::from_products(Arc::new(found))
        }
        (true, None) => state.remote_catalog().await?,
    };

    let products = catalog.filter(&filter);
    print_heading(category);
    if products.is_empty() {
        print_line("  No products found");
    }
    for product in products {
        print_product(product);
    }
    Ok(())
}

fn print_heading(category: Option<Category>) {
    let label = category.map_or("All Products", Category::display_name);
    print_line(label);
}

fn print_product(product: &Product) {
    let stock = if product.stock == 0 {
        "out of stock".to_string()
    } else {
        format!("{} in stock", product.stock)
    };
    print_line(&format!(
        "  #{:<3} {:<34} {:>8}  {}",
        product.id,
        product.name,
        product.unit_price().to_string(),
        stock
    ));
}

#[allow(clippy::print_stdout)]
fn print_line(line: &str) {
    println!("{line}");
}
