//! JSON API handlers mounted under `/api`.

pub mod auth;
pub mod checkout;
pub mod items;
