//! Integration tests for the NearWomen storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p nearwomen-integration-tests
//! ```
//!
//! No external services are needed: [`MockOrderService`] serves the order
//! service's product, order and cart endpoints from an in-process `axum`
//! router on an ephemeral port.
//!
//! # Test Categories
//!
//! - `cart_persistence` - local cart stores over file storage
//! - `checkout_api` - order submission against the mock service
//! - `remote_cart` - server-backed cart
//! - `products_api` - product listing, caching and search

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use nearwomen_core::{Cart, Product, ProductId};
use nearwomen_storefront::api::ApiClient;
use nearwomen_storefront::catalog::Catalog;
use nearwomen_storefront::config::ApiConfig;
use secrecy::SecretString;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// What the mock service has seen and how it should answer.
#[derive(Debug, Default)]
pub struct MockState {
    /// Products served by the product endpoints.
    pub catalog: Vec<Product>,
    /// Server-side cart.
    pub cart: Cart,
    /// Order bodies received, in order.
    pub orders: Vec<Value>,
    /// `Idempotency-Key` header of each order request.
    pub idempotency_keys: Vec<String>,
    /// When set, `POST orders` fails with this status and message.
    pub order_failure: Option<(StatusCode, String)>,
    /// When set, cart and order calls require `Authorization: Bearer <token>`.
    pub required_token: Option<String>,
    /// Number of `GET products` requests served.
    pub product_list_requests: usize,
}

type Shared = Arc<Mutex<MockState>>;

/// In-process stand-in for the order service.
#[derive(Debug)]
pub struct MockOrderService {
    state: Shared,
    addr: SocketAddr,
}

impl MockOrderService {
    /// Start with the built-in catalog and an empty cart.
    pub async fn start() -> Self {
        Self::start_with(MockState {
            catalog: Catalog::builtin().products().to_vec(),
            ..MockState::default()
        })
        .await
    }

    /// Start with the given state.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start_with(state: MockState) -> Self {
        let state = Arc::new(Mutex::new(state));
        let app = Router::new().nest("/api", routes()).with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock service");
        let addr = listener.local_addr().expect("Mock service has no address");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { state, addr }
    }

    /// Base URL of the mock API.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// Client pointed at the mock service.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    pub fn client(&self) -> ApiClient {
        ApiClient::new(&self.api_config(None)).expect("Failed to build API client")
    }

    /// Client that sends `token` as its bearer token.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    pub fn client_with_token(&self, token: &str) -> ApiClient {
        ApiClient::new(&self.api_config(Some(token))).expect("Failed to build API client")
    }

    /// API configuration pointed at the mock service.
    ///
    /// # Panics
    ///
    /// Panics if the base URL is rejected.
    #[must_use]
    pub fn api_config(&self, token: Option<&str>) -> ApiConfig {
        let mut config = ApiConfig::for_url(&self.base_url()).expect("Mock base URL is invalid");
        config.token = token.map(|t| SecretString::from(t.to_string()));
        config
    }

    /// Lock the mock's state for inspection or setup.
    pub fn state(&self) -> MutexGuard<'_, MockState> {
        lock(&self.state)
    }
}

/// A product from the built-in catalog.
///
/// # Panics
///
/// Panics if `id` is not a built-in product.
#[must_use]
pub fn seed_product(id: i32) -> Product {
    Catalog::builtin()
        .find(ProductId::new(id))
        .cloned()
        .expect("No such seed product")
}

fn lock(state: &Shared) -> MutexGuard<'_, MockState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn routes() -> Router<Shared> {
    Router::new()
        .route("/products", get(list_products))
        .route("/products/search/{term}", get(search_products))
        .route("/products/{id}", get(get_product))
        .route("/orders", post(create_order))
        .route("/cart", get(get_cart).delete(clear_cart))
        .route("/cart/items", post(add_item))
        .route("/cart/items/{id}", put(update_item).delete(delete_item))
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "success": false, "message": message }))).into_response()
}

fn authorize(state: &MockState, headers: &HeaderMap) -> Result<(), Response> {
    let Some(token) = &state.required_token else {
        return Ok(());
    };
    let expected = format!("Bearer {token}");
    let given = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    if given == Some(expected.as_str()) {
        Ok(())
    } else {
        Err(error(StatusCode::UNAUTHORIZED, "The user is not authorized"))
    }
}

fn cart_response(state: &MockState) -> Response {
    Json(state.cart.snapshot()).into_response()
}

async fn list_products(State(state): State<Shared>) -> Response {
    let mut state = lock(&state);
    state.product_list_requests += 1;
    Json(state.catalog.clone()).into_response()
}

async fn get_product(State(state): State<Shared>, Path(id): Path<i32>) -> Response {
    let state = lock(&state);
    state
        .catalog
        .iter()
        .find(|p| p.id == ProductId::new(id))
        .map_or_else(
            || error(StatusCode::NOT_FOUND, "Product not found"),
            |p| Json(p.clone()).into_response(),
        )
}

async fn search_products(State(state): State<Shared>, Path(term): Path<String>) -> Response {
    let state = lock(&state);
    let needle = term.to_lowercase();
    let found: Vec<Product> = state
        .catalog
        .iter()
        .filter(|p| p.name.to_lowercase().contains(&needle))
        .cloned()
        .collect();
    Json(found).into_response()
}

async fn create_order(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut state = lock(&state);
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    let key = headers
        .get("Idempotency-Key")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    state.idempotency_keys.push(key);
    state.orders.push(body.clone());

    if let Some((status, message)) = &state.order_failure {
        return error(*status, message);
    }

    let receipt = json!({
        "id": format!("ord-{}", state.orders.len()),
        "status": "pending",
        "totalPrice": body["totalPrice"],
        "dateOrdered": "2026-10-19T09:30:00Z",
    });
    (StatusCode::CREATED, Json(receipt)).into_response()
}

#[derive(Debug, Deserialize)]
struct AddItem {
    product: ProductId,
    quantity: u32,
}

#[derive(Debug, Deserialize)]
struct UpdateItem {
    quantity: u32,
}

async fn get_cart(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let state = lock(&state);
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }
    cart_response(&state)
}

async fn add_item(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<AddItem>,
) -> Response {
    let mut state = lock(&state);
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }
    let Some(product) = state.catalog.iter().find(|p| p.id == body.product).cloned() else {
        return error(StatusCode::NOT_FOUND, "Product not found");
    };
    state.cart.add(&product, body.quantity);
    cart_response(&state)
}

async fn update_item(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i32>,
    Json(body): Json<UpdateItem>,
) -> Response {
    let mut state = lock(&state);
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }
    let id = ProductId::new(id);
    if state.cart.get(id).is_none() {
        return error(StatusCode::NOT_FOUND, "Item not in cart");
    }
    state.cart.set_quantity(id, body.quantity);
    cart_response(&state)
}

async fn delete_item(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Response {
    let mut state = lock(&state);
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }
    state.cart.remove_line(ProductId::new(id));
    cart_response(&state)
}

async fn clear_cart(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = lock(&state);
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }
    state.cart.clear();
    StatusCode::NO_CONTENT.into_response()
}
