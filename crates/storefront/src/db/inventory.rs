//! Database operations for the product inventory.
//!
//! Reads go through [`InventoryRepository`]. The two checkout statements,
//! [`lock_for_checkout`] and [`decrement_stock`], take a bare connection so
//! they can run inside the caller's transaction.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use tracing::{debug, instrument};

use shopfront_core::api::Product;
use shopfront_core::{Price, ProductId};

use super::RepositoryError;
use crate::models::{NewProduct, StockLevel};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    product_id: i32,
    name: String,
    description: Option<String>,
    price: Decimal,
    quantity_in_stock: i32,
    created_at: DateTime<Utc>,
    image: Option<String>,
    category: Option<String>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let price = Price::new(row.price).map_err(|e| {
            RepositoryError::DataCorruption(format!("product {}: {e}", row.product_id))
        })?;

        Ok(Self {
            product_id: ProductId::new(row.product_id),
            name: row.name,
            description: row.description,
            price,
            quantity_in_stock: row.quantity_in_stock,
            created_at: row.created_at,
            image: row.image,
            category: row.category,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct StockRow {
    product_id: i32,
    price: Decimal,
    quantity_in_stock: i32,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for inventory reads and catalog maintenance.
pub struct InventoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> InventoryRepository<'a> {
    /// Create a new inventory repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List the whole inventory, ordered by product ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored price is negative.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT product_id, name, description, price, quantity_in_stock,
                   created_at, image, category
            FROM storefront.inventory
            ORDER BY product_id ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        debug!(count = rows.len(), "Fetched inventory");
        rows.into_iter().map(Product::try_from).collect()
    }

    /// Insert a product, or update the product with the same name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails (including a
    /// negative stock count rejected by the table constraint).
    #[instrument(skip(self, product), fields(name = %product.name))]
    pub async fn upsert(&self, product: &NewProduct) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            INSERT INTO storefront.inventory
                (name, description, price, quantity_in_stock, image, category)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (name) DO UPDATE SET
                description = EXCLUDED.description,
                price = EXCLUDED.price,
                quantity_in_stock = EXCLUDED.quantity_in_stock,
                image = EXCLUDED.image,
                category = EXCLUDED.category
            RETURNING product_id, name, description, price, quantity_in_stock,
                      created_at, image, category
            ",
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.quantity_in_stock)
        .bind(&product.image)
        .bind(&product.category)
        .fetch_one(self.pool)
        .await?;

        Product::try_from(row)
    }
}

// =============================================================================
// Checkout Statements
// =============================================================================

/// Read price and stock for `ids`, locking the rows until the transaction ends.
///
/// Products that do not exist are simply absent from the returned map.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
#[instrument(skip(conn))]
pub async fn lock_for_checkout(
    conn: &mut PgConnection,
    ids: &[ProductId],
) -> Result<HashMap<ProductId, StockLevel>, RepositoryError> {
    let raw_ids: Vec<i32> = ids.iter().map(ProductId::as_i32).collect();

    let rows = sqlx::query_as::<_, StockRow>(
        r"
        SELECT product_id, price, quantity_in_stock
        FROM storefront.inventory
        WHERE product_id = ANY($1)
        ORDER BY product_id
        FOR UPDATE
        ",
    )
    .bind(&raw_ids)
    .fetch_all(&mut *conn)
    .await?;

    rows.into_iter()
        .map(|row| {
            let price = Price::new(row.price).map_err(|e| {
                RepositoryError::DataCorruption(format!("product {}: {e}", row.product_id))
            })?;
            Ok((
                ProductId::new(row.product_id),
                StockLevel {
                    price,
                    quantity_in_stock: row.quantity_in_stock,
                },
            ))
        })
        .collect()
}

/// Take one unit of `id` out of stock if any is left.
///
/// Returns `false` when the product was already sold out (no row matched the
/// `quantity_in_stock > 0` guard), so stock never goes negative.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the update fails.
pub async fn decrement_stock(
    conn: &mut PgConnection,
    id: ProductId,
) -> Result<bool, RepositoryError> {
    let result = sqlx::query(
        r"
        UPDATE storefront.inventory
        SET quantity_in_stock = quantity_in_stock - 1
        WHERE product_id = $1 AND quantity_in_stock > 0
        ",
    )
    .bind(id)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() == 1)
}
