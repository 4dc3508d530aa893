//! Checkout: turn the current cart into an order.
//!
//! The cart is cleared only after the order service accepts the order. A
//! rejected or failed submission leaves the cart exactly as it was so the
//! buyer can retry by hand; nothing here retries automatically.

use async_trait::async_trait;
use nearwomen_core::{Cart, OrderStatus, UserId};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info, instrument, warn};

use crate::api::{ApiClient, ApiError, OrderLine, OrderReceipt, OrderRequest};
use crate::cart::CartBackend;

/// Anything that can place an order.
#[async_trait]
pub trait OrderSubmitter: Send + Sync {
    async fn submit_order(&self, order: &OrderRequest) -> Result<OrderReceipt, ApiError>;
}

#[async_trait]
impl OrderSubmitter for ApiClient {
    async fn submit_order(&self, order: &OrderRequest) -> Result<OrderReceipt, ApiError> {
        self.create_order(order).await
    }
}

/// Errors that stop a checkout. The cart is unchanged in every case.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Nothing to order.
    #[error("Cart is empty")]
    EmptyCart,

    /// A required shipping field is blank.
    #[error("Missing shipping field: {0}")]
    MissingField(&'static str),

    /// The order service did not accept the order.
    #[error("Order submission failed: {0}")]
    Submission(#[from] ApiError),
}

impl CheckoutError {
    /// Dismissible message for the buyer. Never includes internal details.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyCart => "Your cart is empty".to_string(),
            Self::MissingField(field) => format!("Please enter your {field}"),
            Self::Submission(ApiError::Unauthorized) => {
                "Please sign in to place your order".to_string()
            }
            Self::Submission(e) if e.is_network() => {
                "Could not reach the store. Check your connection and try again.".to_string()
            }
            Self::Submission(e @ ApiError::Api { .. }) => e.service_message().to_string(),
            Self::Submission(_) => "Something went wrong. Please try again.".to_string(),
        }
    }
}

/// Where and how to ship an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingDetails {
    pub address1: String,
    pub address2: Option<String>,
    pub city: String,
    pub zip: String,
    pub country: String,
    pub phone: String,
}

impl ShippingDetails {
    /// Check that every required field has content.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::MissingField` naming the first blank field.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        let required = [
            ("address", &self.address1),
            ("city", &self.city),
            ("postal code", &self.zip),
            ("country", &self.country),
            ("phone number", &self.phone),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(CheckoutError::MissingField(field));
            }
        }
        Ok(())
    }
}

/// Build the order request for a cart.
///
/// # Errors
///
/// Returns `CheckoutError::EmptyCart` or `CheckoutError::MissingField`.
pub fn build_order(
    cart: &Cart,
    buyer: &UserId,
    shipping: &ShippingDetails,
) -> Result<OrderRequest, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    shipping.validate()?;

    Ok(OrderRequest {
        order_items: cart
            .lines()
            .iter()
            .map(|line| OrderLine {
                product: line.product_id,
                quantity: line.quantity,
            })
            .collect(),
        shipping_address1: shipping.address1.trim().to_string(),
        shipping_address2: shipping
            .address2
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from),
        city: shipping.city.trim().to_string(),
        zip: shipping.zip.trim().to_string(),
        country: shipping.country.trim().to_string(),
        phone: shipping.phone.trim().to_string(),
        status: OrderStatus::Pending,
        total_price: cart.total().amount,
        user: buyer.clone(),
    })
}

/// Places orders for a cart through an [`OrderSubmitter`].
#[derive(Debug, Clone)]
pub struct Checkout<S> {
    submitter: S,
}

impl<S: OrderSubmitter> Checkout<S> {
    #[must_use]
    pub const fn new(submitter: S) -> Self {
        Self { submitter }
    }

    /// Submit the cart as an order and clear it on success.
    ///
    /// If the order is accepted but the cleared cart cannot be persisted, the
    /// checkout still succeeds; the failure is logged.
    ///
    /// # Errors
    ///
    /// Returns a `CheckoutError` when the cart is empty, shipping details are
    /// incomplete, or the order service rejects the order.
    #[instrument(skip_all, fields(buyer = %buyer))]
    pub async fn submit<B>(
        &self,
        cart: &mut B,
        buyer: &UserId,
        shipping: &ShippingDetails,
    ) -> Result<OrderReceipt, CheckoutError>
    where
        B: CartBackend + ?Sized,
    {
        let order = build_order(cart.cart(), buyer, shipping)?;

        let receipt = match self.submitter.submit_order(&order).await {
            Ok(receipt) => receipt,
            Err(e) => {
                let err = CheckoutError::Submission(e);
                let event_id = sentry::capture_error(&err);
                error!(error = %err, sentry_event_id = %event_id, "Checkout failed");
                return Err(err);
            }
        };

        info!(
            order_id = %receipt.id,
            total = %order.total_price,
            lines = order.order_items.len(),
            "Order placed"
        );

        if let Err(e) = cart.clear_cart().await {
            warn!(order_id = %receipt.id, error = %e, "Order placed but cart could not be cleared");
        }

        Ok(receipt)
    }
}
