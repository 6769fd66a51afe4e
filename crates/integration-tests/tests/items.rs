//! Item listing against a real database.
//!
//! Run with: cargo test -p shopfront-integration-tests -- --ignored

#![allow(clippy::unwrap_used)]

use sqlx::PgPool;

use shopfront_client::{CatalogFilter, ShopClient};
use shopfront_integration_tests::{seed_product, spawn_storefront};
use shopfront_storefront::config::StockPolicy;

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_items_ordered_by_id_with_string_prices(pool: PgPool) {
    let a = seed_product(&pool, "Zebra Mug", 999, 3).await;
    let b = seed_product(&pool, "Apple Pen", 500, 0).await;

    let base = spawn_storefront(pool.clone(), StockPolicy::AllowBackorder).await;
    let raw: serde_json::Value = reqwest::get(format!("{base}/api/items"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let items = raw.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["product_id"], a.as_i32());
    assert_eq!(items[0]["price"], "9.99");
    assert_eq!(items[1]["product_id"], b.as_i32());
    assert_eq!(items[1]["quantity_in_stock"], 0);
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_items_empty_inventory(pool: PgPool) {
    let base = spawn_storefront(pool.clone(), StockPolicy::AllowBackorder).await;
    let items = ShopClient::new(&base).unwrap().items().await.unwrap();
    assert!(items.is_empty());
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_filtering_happens_client_side(pool: PgPool) {
    seed_product(&pool, "Blue Mug", 999, 3).await;
    seed_product(&pool, "Red Mug", 999, 3).await;
    seed_product(&pool, "Pen", 500, 3).await;

    let base = spawn_storefront(pool.clone(), StockPolicy::AllowBackorder).await;
    let items = ShopClient::new(&base).unwrap().items().await.unwrap();

    assert_eq!(items.len(), 3);
    assert_eq!(CatalogFilter::new().search("mug").apply(&items).len(), 2);
}
