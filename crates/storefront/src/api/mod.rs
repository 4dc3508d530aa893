//! Order service API client.
//!
//! # Architecture
//!
//! - JSON over HTTP with `reqwest`, one shared connection pool per client
//! - Optional bearer token attached to every request
//! - Product listings cached in-process via `moka` (5 minute TTL)
//! - Cart and order calls are never cached (mutable state)
//!
//! # Endpoints
//!
//! | Area | Calls |
//! |------|-------|
//! | [`orders`] | `POST orders` |
//! | [`products`] | `GET products`, `GET products/{id}`, `GET products/search/{term}` |
//! | [`cart`] | `GET cart`, `POST cart/items`, `PUT cart/items/{id}`, `DELETE cart/items/{id}`, `DELETE cart` |
//!
//! # Example
//!
//! ```rust,ignore
//! use nearwomen_storefront::api::ApiClient;
//!
//! let client = ApiClient::new(&config.api)?;
//! let products = client.list_products().await?;
//! ```

pub mod cart;
pub mod orders;
pub mod products;

pub use orders::{OrderLine, OrderReceipt, OrderRequest};

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use nearwomen_core::Product;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, StatusCode};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::config::ApiConfig;

/// Fallback message when the service does not say what went wrong.
const GENERIC_ERROR_MESSAGE: &str = "Something went wrong";

/// Errors that can occur when calling the order service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Service returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Service rejected the credentials (HTTP 401).
    #[error("Unauthorized")]
    Unauthorized,

    /// Response body could not be decoded.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Client could not be constructed.
    #[error("Client configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Whether the request timed out or could not connect.
    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_timeout() || e.is_connect())
    }

    /// Message from the service, suitable for showing to a user.
    #[must_use]
    pub fn service_message(&self) -> &str {
        match self {
            Self::Api { message, .. } if !message.is_empty() => message,
            _ => GENERIC_ERROR_MESSAGE,
        }
    }
}

/// Client for the order service.
///
/// Cheaply cloneable; clones share the connection pool and product cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    products: Cache<String, Arc<Vec<Product>>>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = &config.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|e| ApiError::Config(format!("Invalid API token format: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        let products = Cache::builder()
            .max_capacity(64)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.clone(),
                products,
            }),
        })
    }

    /// Base URL every endpoint is resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Resolve an endpoint path against the base URL.
    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path.trim_start_matches('/'))?)
    }

    fn http(&self) -> &reqwest::Client {
        &self.inner.client
    }

    /// Send a request and decode a JSON body.
    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(status_error(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse order service response"
            );
            ApiError::Parse(e.to_string())
        })
    }

    /// Send a request whose response body is ignored.
    async fn send_empty(&self, request: RequestBuilder) -> Result<(), ApiError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }
        Ok(())
    }
}

/// Map a non-success response to an error.
///
/// The service reports failures as `{"message": "..."}`; anything else is
/// passed through as text.
fn status_error(status: StatusCode, body: &str) -> ApiError {
    if status == StatusCode::UNAUTHORIZED {
        return ApiError::Unauthorized;
    }

    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or_else(|| body.chars().take(200).collect());

    tracing::warn!(status = %status, message = %message, "Order service returned non-success status");

    ApiError::Api {
        status: status.as_u16(),
        message,
    }
}
