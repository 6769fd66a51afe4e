//! User domain types.

use chrono::{DateTime, Utc};

use shopfront_core::{UserId, Username};

/// A storefront account (domain type).
///
/// The password hash is deliberately not part of this type; it is only read
/// by the repository method that verifies logins.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login name.
    pub username: Username,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
}
