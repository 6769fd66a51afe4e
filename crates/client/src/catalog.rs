//! Catalog filtering.
//!
//! The server always returns the whole inventory; narrowing it down by
//! search text and category happens here.

use std::collections::BTreeSet;

use shopfront_core::api::Product;

/// Search text and category applied to a fetched item list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    search: Option<String>,
    category: Option<String>,
}

impl CatalogFilter {
    /// A filter that matches everything.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            search: None,
            category: None,
        }
    }

    /// Match products whose name or description contains `text`, ignoring case.
    ///
    /// Blank text clears the search.
    #[must_use]
    pub fn search(mut self, text: &str) -> Self {
        let text = text.trim();
        self.search = (!text.is_empty()).then(|| text.to_lowercase());
        self
    }

    /// Match products in exactly this category.
    #[must_use]
    pub fn category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    /// Whether `product` passes the filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let search_ok = self.search.as_deref().is_none_or(|needle| {
            product.name.to_lowercase().contains(needle)
                || product
                    .description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(needle))
        });

        let category_ok = self
            .category
            .as_deref()
            .is_none_or(|wanted| product.category.as_deref() == Some(wanted));

        search_ok && category_ok
    }

    /// The matching products, in their original order.
    #[must_use]
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products.iter().filter(|p| self.matches(p)).collect()
    }
}

/// Distinct categories present in `products`, sorted.
#[must_use]
pub fn categories(products: &[Product]) -> Vec<&str> {
    products
        .iter()
        .filter_map(|p| p.category.as_deref())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use shopfront_core::{Price, ProductId};

    use super::*;

    fn product(
        id: i32,
        name: &str,
        description: Option<&str>,
        category: Option<&str>,
    ) -> Product {
        Product {
            product_id: ProductId::new(id),
            name: name.to_string(),
            description: description.map(String::from),
            price: Price::from_cents(100),
            quantity_in_stock: 1,
            created_at: Utc::now(),
            image: None,
            category: category.map(String::from),
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            product(1, "Blue Mug", Some("Ceramic, 300ml"), Some("kitchen")),
            product(2, "Tea Towel", Some("Linen, blue stripes"), Some("kitchen")),
            product(3, "Notebook", None, Some("stationery")),
            product(4, "Gift Card", Some("Any amount"), None),
        ]
    }

    fn ids(found: &[&Product]) -> Vec<i32> {
        found.iter().map(|p| p.product_id.as_i32()).collect()
    }

    #[test]
    fn test_default_matches_all() {
        let items = catalog();
        assert_eq!(CatalogFilter::new().apply(&items).len(), 4);
    }

    #[test]
    fn test_search_name_and_description_case_insensitive() {
        let items = catalog();
        let found = CatalogFilter::new().search("BLUE").apply(&items);
        assert_eq!(ids(&found), vec![1, 2]);
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let items = catalog();
        assert_eq!(CatalogFilter::new().search("   ").apply(&items).len(), 4);
    }

    #[test]
    fn test_category_exact() {
        let items = catalog();
        let found = CatalogFilter::new().category("kitchen").apply(&items);
        assert_eq!(ids(&found), vec![1, 2]);
        assert!(CatalogFilter::new().category("Kitchen").apply(&items).is_empty());
    }

    #[test]
    fn test_search_and_category_combine() {
        let items = catalog();
        let found = CatalogFilter::new()
            .search("linen")
            .category("kitchen")
            .apply(&items);
        assert_eq!(ids(&found), vec![2]);
    }

    #[test]
    fn test_categories_distinct_sorted() {
        assert_eq!(categories(&catalog()), vec!["kitchen", "stationery"]);
    }
}
