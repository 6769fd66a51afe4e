//! Shopfront client library.
//!
//! Everything a shopper-facing front end needs on top of the storefront
//! API:
//!
//! - [`Cart`] - The local, ordered cart and its running total
//! - [`LastTransaction`] - Frozen view of the last successful checkout
//! - [`CatalogFilter`] - Search and category filtering over fetched items
//! - [`SessionContext`] - Explicit identity for authenticated requests
//! - [`ShopClient`] - The HTTP client tying it together
//!
//! # Example
//!
//! ```rust,ignore
//! let client = ShopClient::new("http://localhost:3000")?;
//! let items = client.items().await?;
//! let session = client.login("alice", "hunter22").await?;
//!
//! let mut cart = Cart::new();
//! cart.add(CartItem::from(&items[0]))?;
//! let receipt = client.checkout(&session, &mut cart).await?;
//! assert!(cart.is_empty());
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod client;
pub mod error;
pub mod session;

pub use cart::{Cart, CartError, CartItem, LastTransaction};
pub use catalog::{CatalogFilter, categories};
pub use client::ShopClient;
pub use error::ClientError;
pub use session::SessionContext;
