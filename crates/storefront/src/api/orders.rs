//! Order creation.

use chrono::{DateTime, Utc};
use nearwomen_core::{OrderId, OrderStatus, ProductId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{ApiClient, ApiError};

/// One `{product, quantity}` pair of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product: ProductId,
    pub quantity: u32,
}

/// Request body for `POST orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub order_items: Vec<OrderLine>,
    pub shipping_address1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address2: Option<String>,
    pub city: String,
    pub zip: String,
    pub country: String,
    pub phone: String,
    pub status: OrderStatus,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    pub user: UserId,
}

/// Order as acknowledged by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
    #[serde(alias = "_id")]
    pub id: OrderId,
    #[serde(default)]
    pub status: OrderStatus,
    pub total_price: Decimal,
    #[serde(default)]
    pub date_ordered: Option<DateTime<Utc>>,
}

impl ApiClient {
    /// Submit an order.
    ///
    /// Every call carries a fresh `Idempotency-Key`; a caller that retries a
    /// failed submission starts a new attempt.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service rejects the order.
    #[instrument(skip(self, order), fields(lines = order.order_items.len(), total = %order.total_price))]
    pub async fn create_order(&self, order: &OrderRequest) -> Result<OrderReceipt, ApiError> {
        let url = self.endpoint("orders")?;
        let idempotency_key = Uuid::new_v4();

        let receipt: OrderReceipt = self
            .send_json(
                self.http()
                    .post(url)
                    .header("Idempotency-Key", idempotency_key.to_string())
                    .json(order),
            )
            .await?;

        info!(order_id = %receipt.id, "Order created");
        Ok(receipt)
    }
}
