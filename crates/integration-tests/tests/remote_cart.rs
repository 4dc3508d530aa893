//! Server-backed cart against the mock order service.
//!
//! Run with: cargo test -p nearwomen-integration-tests --test remote_cart

#![allow(clippy::indexing_slicing)]

use nearwomen_core::ProductId;
use nearwomen_integration_tests::{MockOrderService, seed_product};
use nearwomen_storefront::api::ApiError;
use nearwomen_storefront::cart::{CartBackend, CartError, RemoteCartStore};
use nearwomen_storefront::config::{CartBackendKind, CartConfig};
use nearwomen_storefront::state::open_cart;
use rust_decimal::Decimal;

async fn connect(service: &MockOrderService) -> RemoteCartStore {
    RemoteCartStore::connect(service.client())
        .await
        .expect("connect")
}

#[tokio::test]
async fn test_connect_mirrors_existing_cart() {
    let service = MockOrderService::start().await;
    service.state().cart.add(&seed_product(7), 2);

    let cart = connect(&service).await;
    assert_eq!(cart.cart_item_count(), 2);
    assert_eq!(cart.lines()[0].product_id, ProductId::new(7));
}

#[tokio::test]
async fn test_operations_follow_server_state() {
    let service = MockOrderService::start().await;
    let mut cart = connect(&service).await;

    cart.add_to_cart(&seed_product(1), 1).await.expect("add");
    cart.add_to_cart(&seed_product(1), 1).await.expect("add");
    cart.add_to_cart(&seed_product(2), 1).await.expect("add");
    assert_eq!(cart.cart_total().amount, Decimal::new(5097, 2));
    assert_eq!(service.state().cart.item_count(), 3);

    cart.remove_from_cart(ProductId::new(1)).await.expect("remove");
    assert_eq!(cart.cart().get(ProductId::new(1)).map(|l| l.quantity), Some(1));

    cart.remove_from_cart(ProductId::new(1)).await.expect("remove");
    assert!(cart.cart().get(ProductId::new(1)).is_none());
    assert!(service.state().cart.get(ProductId::new(1)).is_none());

    cart.update_quantity(ProductId::new(2), 4).await.expect("update");
    assert_eq!(service.state().cart.item_count(), 4);

    cart.update_quantity(ProductId::new(2), 0).await.expect("update");
    assert!(cart.lines().is_empty());
    assert!(service.state().cart.is_empty());
}

#[tokio::test]
async fn test_remove_line_and_clear() {
    let service = MockOrderService::start().await;
    let mut cart = connect(&service).await;
    cart.add_to_cart(&seed_product(3), 5).await.expect("add");
    cart.add_to_cart(&seed_product(4), 1).await.expect("add");

    cart.remove_line(ProductId::new(3)).await.expect("drop");
    assert_eq!(cart.lines().len(), 1);

    cart.clear_cart().await.expect("clear");
    assert!(cart.lines().is_empty());
    assert!(service.state().cart.is_empty());
}

#[tokio::test]
async fn test_absent_product_is_noop() {
    let service = MockOrderService::start().await;
    let mut cart = connect(&service).await;

    cart.remove_from_cart(ProductId::new(99)).await.expect("noop");
    cart.update_quantity(ProductId::new(99), 2).await.expect("noop");
    cart.remove_line(ProductId::new(99)).await.expect("noop");
    assert!(cart.lines().is_empty());
}

#[tokio::test]
async fn test_failed_call_keeps_mirror() {
    let service = MockOrderService::start().await;
    let mut cart = connect(&service).await;
    cart.add_to_cart(&seed_product(5), 1).await.expect("add");

    service.state().required_token = Some("secret-token".to_string());
    let err = cart
        .add_to_cart(&seed_product(6), 1)
        .await
        .expect_err("unauthorized");

    assert!(matches!(err, CartError::Api(ApiError::Unauthorized)));
    assert_eq!(cart.lines().len(), 1);
    assert_eq!(cart.lines()[0].product_id, ProductId::new(5));
}

#[tokio::test]
async fn test_failed_clear_keeps_mirror() {
    let service = MockOrderService::start().await;
    let mut cart = connect(&service).await;
    cart.add_to_cart(&seed_product(5), 2).await.expect("add");
    cart.add_to_cart(&seed_product(6), 1).await.expect("add");

    service.state().required_token = Some("secret-token".to_string());
    let err = cart.clear_cart().await.expect_err("unauthorized");

    assert!(matches!(err, CartError::Api(ApiError::Unauthorized)));
    assert_eq!(cart.lines().len(), 2);
    assert_eq!(cart.cart_item_count(), 3);
    assert_eq!(service.state().cart.item_count(), 3);
}

#[tokio::test]
async fn test_refresh_picks_up_changes_made_elsewhere() {
    let service = MockOrderService::start().await;
    let mut cart = connect(&service).await;

    service.state().cart.add(&seed_product(10), 1);
    assert!(cart.lines().is_empty());

    cart.refresh().await.expect("refresh");
    assert_eq!(cart.cart_item_count(), 1);
}

#[tokio::test]
async fn test_remote_backend_selected_by_config() {
    let service = MockOrderService::start().await;
    service.state().cart.add(&seed_product(11), 3);

    let config = CartConfig {
        backend: CartBackendKind::Remote,
        ..CartConfig::default()
    };
    let backend = open_cart(&config, &service.client())
        .await
        .expect("open remote cart");

    assert_eq!(backend.cart_item_count(), 3);
    assert_eq!(backend.cart_total().to_string(), "$38.97");
}
