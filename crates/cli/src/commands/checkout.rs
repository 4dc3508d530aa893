//! `nw checkout`

use clap::Args;
use nearwomen_core::UserId;
use nearwomen_storefront::checkout::ShippingDetails;
use nearwomen_storefront::error::{StorefrontError, set_sentry_user};
use nearwomen_storefront::state::AppState;

/// Shipping details and buyer for an order.
#[derive(Args)]
pub struct CheckoutArgs {
    /// Buyer's user ID on the order service
    #[arg(long)]
    user: String,

    /// Street address
    #[arg(long)]
    address: String,

    /// Apartment, suite, etc.
    #[arg(long)]
    address2: Option<String>,

    #[arg(long)]
    city: String,

    #[arg(long)]
    postal_code: String,

    #[arg(long)]
    country: String,

    #[arg(long)]
    phone: String,
}

impl CheckoutArgs {
    fn shipping(&self) -> ShippingDetails {
        ShippingDetails {
            address1: self.address.clone(),
            address2: self.address2.clone(),
            city: self.city.clone(),
            zip: self.postal_code.clone(),
            country: self.country.clone(),
            phone: self.phone.clone(),
        }
    }
}

/// Submit the cart as an order.
pub async fn run(state: &AppState, args: CheckoutArgs) -> Result<(), StorefrontError> {
    let buyer = UserId::new(args.user.trim());
    set_sentry_user(&buyer);

    let receipt = state.checkout(&buyer, &args.shipping()).await?;

    print_line(&format!("Order {} placed", receipt.id));
    print_line(&format!("  Status: {}", receipt.status));
    print_line(&format!("  Total:  ${:.2}", receipt.total_price));
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_line(line: &str) {
    println!("{line}");
}
