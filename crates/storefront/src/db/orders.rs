//! Database operations for orders and the purchase ledger.
//!
//! Rows are written only by checkout, inside its transaction, and are never
//! updated or deleted afterwards.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use tracing::{debug, instrument};

use shopfront_core::{OrderId, Price, ProductId, TransactionId, Username};

use super::RepositoryError;
use crate::models::{Order, TransactionRecord};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    order_id: i32,
    username: String,
    created_at: DateTime<Utc>,
    total_price: Decimal,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: OrderId::new(row.order_id),
            username: parse_username(&row.username)?,
            created_at: row.created_at,
            total_price: parse_price(row.total_price)?,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TransactionRow {
    transaction_id: i32,
    order_id: i32,
    username: String,
    transaction_date: DateTime<Utc>,
    total_price: Decimal,
    quantity: i32,
    product_id: i32,
}

impl TryFrom<TransactionRow> for TransactionRecord {
    type Error = RepositoryError;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: TransactionId::new(row.transaction_id),
            order_id: OrderId::new(row.order_id),
            username: parse_username(&row.username)?,
            transaction_date: row.transaction_date,
            total_price: parse_price(row.total_price)?,
            quantity: row.quantity,
            product_id: ProductId::new(row.product_id),
        })
    }
}

fn parse_username(raw: &str) -> Result<Username, RepositoryError> {
    Username::parse(raw)
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid username: {e}")))
}

fn parse_price(raw: Decimal) -> Result<Price, RepositoryError> {
    Price::new(raw).map_err(|e| RepositoryError::DataCorruption(e.to_string()))
}

/// A ledger row to insert.
#[derive(Debug, Clone)]
pub struct NewTransaction<'a> {
    pub order_id: OrderId,
    pub username: &'a Username,
    pub transaction_date: DateTime<Utc>,
    pub total_price: Price,
    pub quantity: i32,
    pub product_id: ProductId,
}

// =============================================================================
// Checkout Statements
// =============================================================================

/// Insert the order header and return its ID.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the insert fails.
#[instrument(skip(conn))]
pub async fn insert_order(
    conn: &mut PgConnection,
    username: &Username,
    created_at: DateTime<Utc>,
    total_price: Price,
) -> Result<OrderId, RepositoryError> {
    let (id,): (i32,) = sqlx::query_as(
        r"
        INSERT INTO storefront.orders (username, created_at, total_price)
        VALUES ($1, $2, $3)
        RETURNING order_id
        ",
    )
    .bind(username)
    .bind(created_at)
    .bind(total_price)
    .fetch_one(&mut *conn)
    .await?;

    debug!(order_id = id, "Inserted order");
    Ok(OrderId::new(id))
}

/// Insert one ledger row and return its ID.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the insert fails.
pub async fn insert_transaction(
    conn: &mut PgConnection,
    row: &NewTransaction<'_>,
) -> Result<TransactionId, RepositoryError> {
    let (id,): (i32,) = sqlx::query_as(
        r"
        INSERT INTO storefront.transactions
            (order_id, username, transaction_date, total_price, quantity, product_id)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING transaction_id
        ",
    )
    .bind(row.order_id)
    .bind(row.username)
    .bind(row.transaction_date)
    .bind(row.total_price)
    .bind(row.quantity)
    .bind(row.product_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(TransactionId::new(id))
}

// =============================================================================
// Repository
// =============================================================================

/// Read access to orders and their ledger rows.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT order_id, username, created_at, total_price
            FROM storefront.orders
            WHERE order_id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Order::try_from).transpose()
    }

    /// List the ledger rows of an order in insertion (cart) order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn transactions_for_order(
        &self,
        id: OrderId,
    ) -> Result<Vec<TransactionRecord>, RepositoryError> {
        let rows = sqlx::query_as::<_, TransactionRow>(
            r"
            SELECT transaction_id, order_id, username, transaction_date,
                   total_price, quantity, product_id
            FROM storefront.transactions
            WHERE order_id = $1
            ORDER BY transaction_id ASC
            ",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TransactionRecord::try_from).collect()
    }
}
