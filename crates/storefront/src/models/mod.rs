//! Domain models for storefront.
//!
//! These types represent validated domain objects separate from database row
//! types and from the JSON wire types in `shopfront_core::api`.

pub mod order;
pub mod product;
pub mod session;
pub mod user;

pub use order::{Order, TransactionRecord};
pub use product::{NewProduct, StockLevel};
pub use session::{CurrentUser, keys as session_keys};
pub use user::User;
