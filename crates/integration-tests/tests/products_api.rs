//! Product endpoints against the mock order service.
//!
//! Run with: cargo test -p nearwomen-integration-tests --test products_api

use nearwomen_core::{Category, ProductId};
use nearwomen_integration_tests::{MockOrderService, MockState, seed_product};
use nearwomen_storefront::api::ApiError;
use nearwomen_storefront::catalog::{Catalog, ProductFilter};
use rust_decimal::Decimal;

#[tokio::test]
async fn test_product_list_is_cached() {
    let service = MockOrderService::start().await;
    let client = service.client();

    let first = client.list_products().await.expect("list");
    let second = client.list_products().await.expect("list");
    assert_eq!(first.len(), 16);
    assert_eq!(first, second);
    assert_eq!(service.state().product_list_requests, 1);

    client.invalidate_products().await;
    client.list_products().await.expect("list");
    assert_eq!(service.state().product_list_requests, 2);
}

#[tokio::test]
async fn test_remote_listing_filters_like_builtin() {
    let service = MockOrderService::start().await;
    let catalog = Catalog::from_products(service.client().list_products().await.expect("list"));

    let filter = ProductFilter {
        category: Some(Category::Wellness),
        search: Some("MAT".to_string()),
    };
    let ids: Vec<i32> = catalog.filter(&filter).iter().map(|p| p.id.as_i32()).collect();
    assert_eq!(ids, vec![13, 14, 15]);
}

#[tokio::test]
async fn test_get_and_search() {
    let service = MockOrderService::start().await;
    let client = service.client();

    let cup = client.get_product(ProductId::new(2)).await.expect("get");
    assert_eq!(cup.name, "Menstrual Cup");

    let missing = client.get_product(ProductId::new(404)).await;
    assert!(matches!(missing, Err(ApiError::Api { status: 404, .. })));

    let found = client.search_products("safety kit").await.expect("search");
    assert_eq!(found.len(), 1);
    assert_eq!(found.first().map(|p| p.id), Some(ProductId::new(12)));
}

#[tokio::test]
async fn test_negative_price_is_rejected() {
    let mut discounted = seed_product(4);
    discounted.price = Decimal::new(-500, 2);
    let service = MockOrderService::start_with(MockState {
        catalog: vec![seed_product(1), discounted],
        ..MockState::default()
    })
    .await;
    let client = service.client();

    let listing = client.list_products().await;
    assert!(matches!(listing, Err(ApiError::Parse(_))));

    let single = client.get_product(ProductId::new(4)).await;
    assert!(matches!(single, Err(ApiError::Parse(_))));
    assert!(client.get_product(ProductId::new(1)).await.is_ok());
}
