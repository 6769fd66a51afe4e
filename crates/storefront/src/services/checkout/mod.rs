//! Checkout service.
//!
//! Converts a cart into one `orders` row plus one `transactions` row per cart
//! entry, decrementing stock as it goes. Everything happens inside a single
//! database transaction: either the whole cart is recorded or nothing is.
//!
//! # Flow
//!
//! 1. Lock the distinct cart products (`SELECT ... FOR UPDATE`, id order)
//! 2. Price every entry from the inventory; request prices are ignored
//! 3. Insert the order with the summed total
//! 4. For each entry in cart order: insert the ledger row, then take one
//!    unit out of stock (guarded so it never goes below zero)
//! 5. Commit
//!
//! Any error before step 5 drops the transaction, which rolls it back and
//! returns the connection to the pool.

mod error;

pub use error::CheckoutError;

use std::collections::HashMap;

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{info, instrument, warn};

use shopfront_core::api::{CheckoutLine, CheckoutRequest};
use shopfront_core::{OrderId, Price, ProductId, Username};

use crate::config::StockPolicy;
use crate::db::inventory;
use crate::db::orders::{self, NewTransaction};
use crate::models::{CurrentUser, StockLevel};

/// Ledger quantity of every checkout line.
const LINE_QUANTITY: i32 = 1;

/// Largest order total `orders.total_price` (`NUMERIC(14, 2)`) can hold.
fn max_order_total() -> Decimal {
    Decimal::new(99_999_999_999_999, 2)
}

/// A committed checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedCheckout {
    pub order_id: OrderId,
    pub total_price: Price,
    /// One line per cart entry, in cart order.
    pub lines: Vec<CheckoutLine>,
    /// Products that were recorded while already sold out.
    pub backordered: Vec<ProductId>,
}

/// Checkout service.
pub struct CheckoutService<'a> {
    pool: &'a PgPool,
    policy: StockPolicy,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, policy: StockPolicy) -> Self {
        Self { pool, policy }
    }

    /// Record a purchase of `items` (one unit per entry) for `username`.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` if `items` is empty.
    /// Returns `CheckoutError::UnknownProduct` if an item is not in the inventory.
    /// Returns `CheckoutError::OutOfStock` if an item is sold out under
    /// [`StockPolicy::Reject`].
    /// Returns `CheckoutError::Repository` if any statement fails.
    #[instrument(skip(self, items), fields(items = items.len(), policy = %self.policy))]
    pub async fn checkout(
        &self,
        username: &Username,
        items: &[ProductId],
    ) -> Result<CompletedCheckout, CheckoutError> {
        if items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let mut tx = self.pool.begin().await?;

        let mut distinct = items.to_vec();
        distinct.sort_unstable();
        distinct.dedup();
        let stock = inventory::lock_for_checkout(&mut *tx, &distinct).await?;

        let (lines, total_price) = price_cart(items, &stock)?;

        let now = Utc::now();
        let order_id = orders::insert_order(&mut *tx, username, now, total_price).await?;

        let mut backordered = Vec::new();
        for line in &lines {
            orders::insert_transaction(
                &mut *tx,
                &NewTransaction {
                    order_id,
                    username,
                    transaction_date: now,
                    total_price: line.price,
                    quantity: LINE_QUANTITY,
                    product_id: line.product_id,
                },
            )
            .await?;

            if !inventory::decrement_stock(&mut *tx, line.product_id).await? {
                match self.policy {
                    StockPolicy::Reject => {
                        return Err(CheckoutError::OutOfStock(line.product_id));
                    }
                    StockPolicy::AllowBackorder => {
                        warn!(product_id = %line.product_id, "Recorded sale of sold-out product");
                        backordered.push(line.product_id);
                    }
                }
            }
        }

        tx.commit().await?;

        info!(
            order_id = %order_id,
            total = %total_price,
            lines = lines.len(),
            "Checkout committed"
        );

        Ok(CompletedCheckout {
            order_id,
            total_price,
            lines,
            backordered,
        })
    }
}

/// Check a checkout body against the session user and extract the cart's
/// product ids in cart order.
///
/// # Errors
///
/// Returns `CheckoutError::MissingUsername` if `user` is present with an empty username.
/// Returns `CheckoutError::IdentityMismatch` if `user` names someone other than `session_user`.
/// Returns `CheckoutError::EmptyCart` if the cart is missing or empty.
/// Returns `CheckoutError::MissingProductId` if an entry has no positive product id.
pub fn validate_request(
    request: &CheckoutRequest,
    session_user: &CurrentUser,
) -> Result<Vec<ProductId>, CheckoutError> {
    if let Some(user) = &request.user {
        let name = user.username.as_deref().unwrap_or_default();
        if name.is_empty() {
            return Err(CheckoutError::MissingUsername);
        }
        if session_user.username.as_str() != name {
            return Err(CheckoutError::IdentityMismatch);
        }
    }

    let cart = request
        .cart
        .as_deref()
        .filter(|cart| !cart.is_empty())
        .ok_or(CheckoutError::EmptyCart)?;

    cart.iter()
        .enumerate()
        .map(|(index, entry)| {
            entry
                .product_id
                .filter(|id| id.as_i32() > 0)
                .ok_or(CheckoutError::MissingProductId { index })
        })
        .collect()
}

/// Price each cart entry from the locked inventory rows and sum the order total.
///
/// Duplicated products count once per entry.
///
/// # Errors
///
/// Returns `CheckoutError::UnknownProduct` for the first entry with no inventory row.
/// Returns `CheckoutError::TotalTooLarge` if the total does not fit an order row.
pub fn price_cart(
    items: &[ProductId],
    stock: &HashMap<ProductId, StockLevel>,
) -> Result<(Vec<CheckoutLine>, Price), CheckoutError> {
    let lines = items
        .iter()
        .map(|&product_id| {
            stock
                .get(&product_id)
                .map(|level| CheckoutLine {
                    product_id,
                    price: level.price,
                })
                .ok_or(CheckoutError::UnknownProduct(product_id))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let total: Price = lines.iter().map(|line| line.price).sum();
    let max = max_order_total();
    if total.amount() > max {
        return Err(CheckoutError::TotalTooLarge { total, max });
    }

    Ok((lines, total))
}
