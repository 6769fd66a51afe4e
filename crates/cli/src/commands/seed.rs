//! Seed the inventory from a YAML file.
//!
//! ```yaml
//! products:
//!   - name: Blue Mug
//!     description: Ceramic, 300ml
//!     price: "9.99"
//!     quantity_in_stock: 12
//!     category: kitchen
//!   - name: Notebook
//!     price: "5.00"
//!     quantity_in_stock: 40
//! ```
//!
//! Products are matched by name: seeding again updates price, stock and the
//! other fields in place.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use tracing::{error, info};

use shopfront_storefront::db::inventory::InventoryRepository;
use shopfront_storefront::models::NewProduct;

use super::{CommandError, connect};

#[derive(Debug, Deserialize)]
struct InventoryFile {
    products: Vec<NewProduct>,
}

/// Insert or update every product in `file_path`.
///
/// The whole file is parsed and validated before connecting.
pub async fn inventory(file_path: &str) -> Result<(), CommandError> {
    let path = Path::new(file_path);
    info!(path = %file_path, "Loading inventory from file");

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CommandError::Io {
            path: file_path.to_string(),
            source,
        })?;
    let products = parse_inventory(&content)?;

    info!(products = products.len(), "Inventory file validated");

    let pool = connect().await?;
    let repo = InventoryRepository::new(&pool);

    for product in &products {
        let stored = repo.upsert(product).await?;
        info!(
            "  #{} {} @ {} ({} in stock)",
            stored.product_id, stored.name, stored.price, stored.quantity_in_stock
        );
    }

    info!("Seeding complete: {} products", products.len());
    Ok(())
}

/// Parse and validate an inventory file.
fn parse_inventory(content: &str) -> Result<Vec<NewProduct>, CommandError> {
    let file: InventoryFile = serde_yaml::from_str(content)?;

    let errors = validate(&file.products);
    if !errors.is_empty() {
        error!("Inventory validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(CommandError::Invalid(format!(
            "{} validation errors found",
            errors.len()
        )));
    }

    Ok(file.products)
}

fn validate(products: &[NewProduct]) -> Vec<String> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    if products.is_empty() {
        errors.push("no products listed".to_string());
    }

    for (index, product) in products.iter().enumerate() {
        let name = product.name.trim();
        if name.is_empty() {
            errors.push(format!("product {index}: name is empty"));
        } else if !seen.insert(name) {
            errors.push(format!("product {index}: duplicate name '{name}'"));
        }
        if product.quantity_in_stock < 0 {
            errors.push(format!(
                "product {index} ({name}): quantity_in_stock is negative"
            ));
        }
    }

    errors
}
