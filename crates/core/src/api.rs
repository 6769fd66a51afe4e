//! JSON bodies exchanged between the storefront server and its clients.
//!
//! The server deserializes requests and serializes responses with these types,
//! and the client does the reverse, so both sides stay in lockstep.
//!
//! ```text
//! GET  /api/items     -> [Product]
//! POST /api/login     LoginRequest    -> LoginResponse
//! POST /api/logout                    -> MessageResponse
//! GET  /api/session                   -> SessionResponse
//! POST /api/checkout  CheckoutRequest -> CheckoutResponse
//! any failure                         -> ErrorResponse
//! ```

use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{OrderId, Price, ProductId, Username};

/// A product row from the inventory, as listed by `GET /api/items`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub price: Price,
    pub quantity_in_stock: i32,
    pub created_at: DateTime<Utc>,
    pub image: Option<String>,
    pub category: Option<String>,
}

impl Product {
    /// Whether at least one unit is currently in stock.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.quantity_in_stock > 0
    }
}

/// Body of `POST /api/login`.
///
/// Missing fields deserialize as empty strings and simply fail to match.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub username: Username,
}

/// The identity bound to the caller's session (`GET /api/session`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionResponse {
    pub username: Username,
}

/// One entry of the cart sent to checkout.
///
/// Clients usually send a full copy of the product; only `product_id` is
/// used. `price` is accepted for compatibility but the server re-prices
/// every entry from the inventory.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CartEntry {
    #[serde(default)]
    pub product_id: Option<ProductId>,
    #[serde(
        default,
        deserialize_with = "lenient_price",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Price>,
}

/// Read a client-side price, dropping anything that is not a valid price
/// instead of failing the whole body.
fn lenient_price<'de, D>(deserializer: D) -> Result<Option<Price>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value::<Option<Price>>(value).ok().flatten())
}

impl CartEntry {
    /// Cart entry for a product id with no client-side price.
    #[must_use]
    pub const fn new(product_id: ProductId) -> Self {
        Self {
            product_id: Some(product_id),
            price: None,
        }
    }
}

/// The `user` object of a checkout body.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserRef {
    #[serde(default)]
    pub username: Option<String>,
}

/// Body of `POST /api/checkout`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub cart: Option<Vec<CartEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserRef>,
}

/// One recorded line of a completed checkout, priced from the inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutLine {
    pub product_id: ProductId,
    pub price: Price,
}

/// Successful checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutResponse {
    pub message: String,
    pub order_id: OrderId,
    pub total_price: Price,
    pub items: Vec<CheckoutLine>,
}

/// A response that only carries a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Body of every non-2xx response.
///
/// For client errors `error` says what to fix ("Cart is empty"). Server
/// failures only carry a stable code (`query_error`, `internal_error`).
/// Authentication failures omit it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_checkout_request_accepts_full_product_copies() {
        let body = json!({
            "cart": [
                {"product_id": 1, "name": "Mug", "price": "9.99", "quantity_in_stock": 3},
                {"product_id": 2, "price": 5.00}
            ],
            "user": {"username": "alice"}
        });

        let req: CheckoutRequest = serde_json::from_value(body).unwrap();
        let cart = req.cart.unwrap();
        assert_eq!(cart.len(), 2);
        assert_eq!(cart[0].product_id, Some(ProductId::new(1)));
        assert_eq!(cart[1].price, Some(Price::from_cents(500)));
        assert_eq!(req.user.unwrap().username.as_deref(), Some("alice"));
    }

    #[test]
    fn test_cart_entry_invalid_price_is_dropped() {
        let body = json!({
            "cart": [
                {"product_id": 1, "price": -1},
                {"product_id": 2, "price": "abc"},
                {"product_id": 3, "price": null},
                {"product_id": 4, "price": {"amount": 1}}
            ]
        });

        let req: CheckoutRequest = serde_json::from_value(body).unwrap();
        let cart = req.cart.unwrap();
        assert_eq!(cart.len(), 4);
        assert!(cart.iter().all(|entry| entry.price.is_none()));
        assert_eq!(cart[3].product_id, Some(ProductId::new(4)));
    }

    #[test]
    fn test_checkout_request_missing_fields() {
        let req: CheckoutRequest = serde_json::from_value(json!({})).unwrap();
        assert!(req.cart.is_none());
        assert!(req.user.is_none());

        let req: CheckoutRequest =
            serde_json::from_value(json!({"cart": [{"name": "no id"}]})).unwrap();
        assert_eq!(req.cart.unwrap()[0].product_id, None);
    }

    #[test]
    fn test_login_request_debug_redacts_password() {
        let req = LoginRequest {
            username: "alice".to_string(),
            password: "hunter2-secret".to_string(),
        };
        let debug = format!("{req:?}");
        assert!(debug.contains("alice"));
        assert!(!debug.contains("hunter2-secret"));
    }

    #[test]
    fn test_error_response_omits_missing_kind() {
        let body = ErrorResponse {
            message: "Invalid username or password".to_string(),
            error: None,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"message": "Invalid username or password"})
        );
    }

    #[test]
    fn test_product_prices_serialize_as_strings() {
        let product = Product {
            product_id: ProductId::new(1),
            name: "Mug".to_string(),
            description: None,
            price: Price::from_cents(999),
            quantity_in_stock: 0,
            created_at: DateTime::<Utc>::default(),
            image: None,
            category: Some("kitchen".to_string()),
        };
        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["price"], json!("9.99"));
        assert!(!product.in_stock());
    }
}
