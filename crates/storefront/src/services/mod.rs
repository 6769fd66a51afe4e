//! Business logic services for storefront.
//!
//! # Services
//!
//! - `auth` - Password login and account creation (Argon2id)
//! - `checkout` - The atomic cart-to-ledger transaction

pub mod auth;
pub mod checkout;

pub use auth::{AuthError, AuthService};
pub use checkout::{CheckoutError, CheckoutService, CompletedCheckout};
