//! Explicit identity for authenticated requests.

use shopfront_core::Username;

/// A logged-in shopper.
///
/// Holds the username returned by login and an HTTP client whose cookie
/// jar carries the server session. Requests that need an identity take a
/// `&SessionContext`; dropping it forgets the login locally.
#[derive(Debug, Clone)]
pub struct SessionContext {
    username: Username,
    http: reqwest::Client,
}

impl SessionContext {
    pub(crate) const fn new(username: Username, http: reqwest::Client) -> Self {
        Self { username, http }
    }

    /// The logged-in username.
    #[must_use]
    pub const fn username(&self) -> &Username {
        &self.username
    }

    pub(crate) const fn http(&self) -> &reqwest::Client {
        &self.http
    }
}
