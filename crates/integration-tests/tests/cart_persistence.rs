//! Local cart stores over file storage.
//!
//! Run with: cargo test -p nearwomen-integration-tests --test cart_persistence

#![allow(clippy::indexing_slicing)]

use nearwomen_core::ProductId;
use nearwomen_integration_tests::seed_product;
use nearwomen_storefront::cart::{CartBackend, CartPersistence, CartView, LocalCartStore};
use nearwomen_storefront::storage::{FileStore, KeyValueStore};
use rust_decimal::Decimal;
use tempfile::TempDir;

const KEY: &str = "cart_items";

async fn open(dir: &TempDir) -> LocalCartStore<FileStore> {
    LocalCartStore::open(CartPersistence::new(FileStore::new(dir.path()), KEY)).await
}

#[tokio::test]
async fn test_cart_survives_restart() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");

    {
        let mut cart = open(&dir).await;
        cart.add_to_cart(&seed_product(1), 1).await.expect("add");
        cart.add_to_cart(&seed_product(1), 1).await.expect("add");
        cart.add_to_cart(&seed_product(2), 1).await.expect("add");
    }

    let cart = open(&dir).await;
    let lines = cart.lines();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].product_id, ProductId::new(1));
    assert_eq!(lines[0].quantity, 2);
    assert_eq!(lines[1].product_id, ProductId::new(2));
    assert_eq!(cart.cart_total().amount, Decimal::new(5097, 2));
    assert_eq!(cart.cart_item_count(), 3);
}

#[tokio::test]
async fn test_decrement_and_remove_are_persisted() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");

    {
        let mut cart = open(&dir).await;
        cart.add_to_cart(&seed_product(9), 2).await.expect("add");
        cart.add_to_cart(&seed_product(13), 1).await.expect("add");
        cart.remove_from_cart(ProductId::new(9)).await.expect("remove");
        cart.remove_from_cart(ProductId::new(13)).await.expect("remove");
    }

    let cart = open(&dir).await;
    let view = CartView::from(cart.cart());
    assert_eq!(view.items.len(), 1);
    assert_eq!(view.items[0].name, "Personal Alarm Keychain");
    assert_eq!(view.items[0].quantity, 1);
    assert_eq!(view.total, "$19.99");
}

#[tokio::test]
async fn test_snapshot_file_is_a_json_array_of_lines() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let mut cart = open(&dir).await;
    cart.add_to_cart(&seed_product(6), 3).await.expect("add");

    let raw = std::fs::read_to_string(dir.path().join("cart_items.json")).expect("snapshot");
    let value: serde_json::Value = serde_json::from_str(&raw).expect("valid JSON");
    let line = &value[0];
    assert_eq!(line["id"], 6);
    assert_eq!(line["name"], "Women's Multivitamin Pack");
    assert_eq!(line["category"], "food");
    assert_eq!(line["quantity"], 3);
}

#[tokio::test]
async fn test_corrupt_snapshot_starts_empty_and_is_replaced() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let store = FileStore::new(dir.path());
    store.set(KEY, "[{\"id\": 1, \"name\":").await.expect("write");

    let mut cart = open(&dir).await;
    assert!(cart.lines().is_empty());

    cart.add_to_cart(&seed_product(4), 1).await.expect("add");
    let reopened = open(&dir).await;
    assert_eq!(reopened.cart_item_count(), 1);
}

#[tokio::test]
async fn test_clear_leaves_empty_snapshot() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let mut cart = open(&dir).await;
    cart.add_to_cart(&seed_product(16), 1).await.expect("add");
    cart.clear_cart().await.expect("clear");

    let store = FileStore::new(dir.path());
    assert_eq!(store.get(KEY).await.expect("read").as_deref(), Some("[]"));
    assert!(open(&dir).await.lines().is_empty());
}
