//! Unified error handling with Sentry integration.
//!
//! Each module has its own error enum; [`StorefrontError`] wraps them for
//! callers that drive several modules at once (the CLI, app setup).

use thiserror::Error;

use crate::api::ApiError;
use crate::cart::CartError;
use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::storage::StorageError;

const GENERIC_MESSAGE: &str = "Something went wrong. Please try again.";

/// Crate-level error type.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Storage backend failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Cart operation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Order service call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Checkout did not complete.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Referenced product does not exist.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl StorefrontError {
    /// Message safe to show the shopper.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Checkout(e) => e.user_message(),
            Self::Api(ApiError::Unauthorized) => "Please sign in and try again".to_string(),
            Self::Api(e) if e.is_network() => {
                "Could not reach the store. Check your connection and try again.".to_string()
            }
            Self::Api(e @ ApiError::Api { .. }) => e.service_message().to_string(),
            Self::Cart(CartError::Persistence(_)) | Self::Storage(_) => {
                "Your cart was updated but could not be saved on this device".to_string()
            }
            Self::NotFound(what) => format!("{what} not found"),
            Self::Config(_) | Self::Cart(_) | Self::Api(_) => GENERIC_MESSAGE.to_string(),
        }
    }

    /// Log the error and send it to Sentry if it points at a fault rather
    /// than bad input. Returns the message for the shopper.
    pub fn report(&self) -> String {
        if matches!(
            self,
            Self::Storage(_) | Self::Cart(_) | Self::Api(_) | Self::Config(_)
        ) {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Storefront error"
            );
        } else {
            tracing::warn!(error = %self, "Storefront error");
        }
        self.user_message()
    }
}

/// Result type alias for `StorefrontError`.
pub type Result<T> = std::result::Result<T, StorefrontError>;

/// Set the Sentry user context.
///
/// Call this once the buyer is known so checkout errors carry their ID.
pub fn set_sentry_user(user_id: &impl ToString) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            ..Default::default()
        }));
    });
}

/// Add a breadcrumb for shopper actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of cart
/// changes leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "12")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = StorefrontError::NotFound("Product 99".to_string());
        assert_eq!(err.to_string(), "Not found: Product 99");

        let err = StorefrontError::from(ConfigError::MissingEnvVar(
            "NEARWOMEN_DATABASE_URL".to_string(),
        ));
        assert!(err.to_string().starts_with("Configuration error:"));
    }

    #[test]
    fn test_user_messages_hide_internals() {
        let storage = StorefrontError::from(CartError::Persistence(StorageError::Unavailable(
            "disk full at /var/lib".to_string(),
        )));
        assert!(!storage.user_message().contains("/var/lib"));

        let api = StorefrontError::from(ApiError::Parse("expected `[`".to_string()));
        assert_eq!(api.user_message(), GENERIC_MESSAGE);

        let service = StorefrontError::from(ApiError::Api {
            status: 400,
            message: "Product out of stock".to_string(),
        });
        assert_eq!(service.user_message(), "Product out of stock");
    }

    #[test]
    fn test_checkout_messages_pass_through() {
        let err = StorefrontError::from(CheckoutError::EmptyCart);
        assert_eq!(err.user_message(), "Your cart is empty");
        assert_eq!(err.report(), "Your cart is empty");
    }
}
