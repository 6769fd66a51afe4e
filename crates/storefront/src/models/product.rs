//! Inventory input types.

use serde::Deserialize;

use shopfront_core::Price;

/// A product to insert into (or refresh in) the inventory.
///
/// Deserializable so catalogs can be seeded from YAML files. Products are
/// keyed by `name`: seeding an existing name updates it in place.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Price,
    #[serde(default)]
    pub quantity_in_stock: i32,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// Price and stock of one product, read under a row lock during checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockLevel {
    pub price: Price,
    pub quantity_in_stock: i32,
}
