//! Client error types.

use thiserror::Error;

use crate::cart::CartError;

/// Errors returned by [`ShopClient`](crate::ShopClient).
#[derive(Debug, Error)]
pub enum ClientError {
    /// The storefront answered with a non-success status.
    ///
    /// `message` and `error` are taken from the server's JSON body.
    #[error("{message} (HTTP {status})")]
    Server {
        status: u16,
        message: String,
        error: Option<String>,
    },

    /// Transport or decoding failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The base URL could not be parsed or joined.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The local cart refused the operation.
    #[error(transparent)]
    Cart(#[from] CartError),
}

impl ClientError {
    /// HTTP status of a server-side rejection.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the server rejected the credentials or the session.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Server { status: 401, .. })
    }
}
