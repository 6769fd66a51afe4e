//! A command-line shopper on top of `shopfront-client`.
//!
//! # Usage
//!
//! ```bash
//! shop-cli shop items --category kitchen
//! shop-cli shop checkout -u alice -p 'correct horse' 1 2 2
//! ```
//!
//! # Environment Variables
//!
//! - `SHOPFRONT_URL` - Storefront base URL (default: <http://localhost:3000>)

#![allow(clippy::print_stdout)]

use shopfront_client::{Cart, CartItem, CatalogFilter, ShopClient};
use shopfront_core::ProductId;
use shopfront_core::api::Product;

use super::CommandError;

/// List the catalog, filtered locally.
pub async fn items(
    url: &str,
    search: Option<&str>,
    category: Option<&str>,
) -> Result<(), CommandError> {
    let client = ShopClient::new(url)?;
    let products = client.items().await?;

    let mut filter = CatalogFilter::new();
    if let Some(text) = search {
        filter = filter.search(text);
    }
    if let Some(category) = category {
        filter = filter.category(category);
    }

    let shown = filter.apply(&products);
    for product in &shown {
        println!(
            "{:>5}  {:<32} {:>10}  {}",
            product.product_id.to_string(),
            product.name,
            product.price.to_string(),
            stock_label(product)
        );
    }
    println!("{} of {} items", shown.len(), products.len());
    Ok(())
}

/// Log in, fill a cart with `product_ids` and check it out.
pub async fn checkout(
    url: &str,
    username: &str,
    password: &str,
    product_ids: &[i32],
) -> Result<(), CommandError> {
    let client = ShopClient::new(url)?;
    let products = client.items().await?;

    let mut cart = Cart::new();
    for &raw in product_ids {
        let id = ProductId::new(raw);
        let item = products
            .iter()
            .find(|p| p.product_id == id)
            .map(CartItem::from)
            .ok_or_else(|| CommandError::Invalid(format!("no product with id {raw}")))?;
        cart.add(item).map_err(shopfront_client::ClientError::from)?;
    }

    let session = client.login(username, password).await?;
    let receipt = client.checkout(&session, &mut cart).await?;

    println!("Order #{} placed", receipt.order_id);
    for (item, line) in receipt.items.iter().zip(&receipt.lines) {
        println!("  {:<32} {:>10}", item.name, line.price.to_string());
    }
    println!("  {:<32} {:>10}", "Total", receipt.total_price.to_string());
    if receipt.was_repriced() {
        println!(
            "  (prices changed since listing: displayed {})",
            receipt.displayed_total
        );
    }

    client.logout(session).await?;
    Ok(())
}

fn stock_label(product: &Product) -> String {
    if product.in_stock() {
        format!("{} in stock", product.quantity_in_stock)
    } else {
        "sold out".to_string()
    }
}
