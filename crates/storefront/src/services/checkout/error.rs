//! Checkout error types.

use rust_decimal::Decimal;
use thiserror::Error;

use shopfront_core::{Price, ProductId};

use crate::db::RepositoryError;

/// Errors that can occur while turning a cart into an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The body named a user but left the username empty.
    #[error("Username is missing")]
    MissingUsername,

    /// The body names a different user than the session.
    #[error("Username does not match the logged-in user")]
    IdentityMismatch,

    /// No cart, or a cart with no entries.
    #[error("Cart is empty")]
    EmptyCart,

    /// A cart entry has no usable product id.
    #[error("Product ID is missing (cart entry {index})")]
    MissingProductId { index: usize },

    /// A cart entry names a product that is not in the inventory.
    #[error("Product {0} does not exist")]
    UnknownProduct(ProductId),

    /// The order total does not fit the `orders.total_price` column.
    #[error("Order total {total} exceeds the maximum of {max}")]
    TotalTooLarge { total: Price, max: Decimal },

    /// A product was sold out and the stock policy rejects backorders.
    #[error("Product {0} is out of stock")]
    OutOfStock(ProductId),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for CheckoutError {
    fn from(e: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(e))
    }
}

impl CheckoutError {
    /// Whether the caller can fix the request and try again.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        !matches!(self, Self::Repository(_))
    }
}
