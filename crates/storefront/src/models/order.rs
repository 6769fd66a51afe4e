//! Order and ledger domain types.

use chrono::{DateTime, Utc};

use shopfront_core::{OrderId, Price, ProductId, TransactionId, Username};

/// A completed checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: OrderId,
    pub username: Username,
    pub created_at: DateTime<Utc>,
    /// Sum of the line totals of all transaction rows of this order.
    pub total_price: Price,
}

/// One purchase ledger row (one per cart item).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    pub id: TransactionId,
    pub order_id: OrderId,
    pub username: Username,
    pub transaction_date: DateTime<Utc>,
    /// Line total: unit price times quantity.
    pub total_price: Price,
    pub quantity: i32,
    pub product_id: ProductId,
}
