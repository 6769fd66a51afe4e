//! Unified error handling with Sentry integration.
//!
//! Every handler returns `Result<T, AppError>`. At the request boundary the
//! error becomes a status code plus an [`ErrorResponse`] JSON body; server-side
//! failures are captured to Sentry first and never echo internal details.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use shopfront_core::api::ErrorResponse;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::checkout::CheckoutError;

/// Top-level message of every failed checkout.
pub const CHECKOUT_FAILED: &str = "Transaction failed";
/// Top-level message of a failed item listing.
pub const ITEMS_FAILED: &str = "Error fetching items";
/// Top-level message of a login that failed on the server side.
pub const LOGIN_FAILED: &str = "Error logging in";
/// Message of a rejected login. Identical for unknown users and wrong passwords.
pub const INVALID_CREDENTIALS: &str = "Invalid username or password";
/// Message for requests that need a logged-in session.
pub const NOT_LOGGED_IN: &str = "Not logged in";
/// Message for requests whose session could not be loaded from the store.
pub const SESSION_FAILED: &str = "Error reading session";

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Client-correctable request problem.
    #[error("{message}: {detail}")]
    InvalidRequest {
        message: &'static str,
        detail: String,
    },

    /// No session, or credentials that match no user.
    #[error("{0}")]
    AuthFailure(&'static str),

    /// A sold-out product was rejected by the stock policy.
    #[error("{message}: {detail}")]
    OutOfStock {
        message: &'static str,
        detail: String,
    },

    /// Database operation failed.
    #[error("{message}: {source}")]
    Query {
        message: &'static str,
        #[source]
        source: RepositoryError,
    },

    /// Internal server error.
    #[error("{message}: {detail}")]
    Internal {
        message: &'static str,
        detail: String,
    },
}

impl AppError {
    /// Wrap a repository failure under a handler-specific message.
    #[must_use]
    pub const fn query(message: &'static str, source: RepositoryError) -> Self {
        Self::Query { message, source }
    }

    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            Self::AuthFailure(_) => StatusCode::UNAUTHORIZED,
            Self::OutOfStock { .. } => StatusCode::CONFLICT,
            Self::Query { .. } | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// JSON body for this error.
    #[must_use]
    pub fn body(&self) -> ErrorResponse {
        let (message, error) = match self {
            Self::InvalidRequest { message, detail } | Self::OutOfStock { message, detail } => {
                (*message, Some(detail.clone()))
            }
            Self::AuthFailure(message) => (*message, None),
            Self::Query { message, .. } => (*message, Some("query_error".to_string())),
            Self::Internal { message, .. } => (*message, Some("internal_error".to_string())),
        };

        ErrorResponse {
            message: message.to_string(),
            error,
        }
    }
}

impl From<CheckoutError> for AppError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::OutOfStock(_) => Self::OutOfStock {
                message: CHECKOUT_FAILED,
                detail: err.to_string(),
            },
            CheckoutError::Repository(source) => Self::query(CHECKOUT_FAILED, source),
            other => Self::InvalidRequest {
                message: CHECKOUT_FAILED,
                detail: other.to_string(),
            },
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials
            | AuthError::UserNotFound
            | AuthError::InvalidUsername(_) => Self::AuthFailure(INVALID_CREDENTIALS),
            AuthError::Repository(source) => Self::query(LOGIN_FAILED, source),
            AuthError::WeakPassword(_) | AuthError::UserAlreadyExists => Self::InvalidRequest {
                message: LOGIN_FAILED,
                detail: err.to_string(),
            },
            AuthError::PasswordHash => Self::Internal {
                message: LOGIN_FAILED,
                detail: err.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Query { .. } | Self::Internal { .. }) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        (self.status(), Json(self.body())).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context for the logged-in user.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, username: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            username: Some(username.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("checkout", "Checkout started", Some(&[("items", "3")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopfront_core::ProductId;

    use super::*;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            AppError::from(CheckoutError::EmptyCart).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::AuthFailure(NOT_LOGGED_IN).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::from(CheckoutError::OutOfStock(ProductId::new(3))).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::query(ITEMS_FAILED, RepositoryError::NotFound).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_invalid_request_body_carries_detail() {
        let (status, body) = body_json(CheckoutError::EmptyCart.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Transaction failed");
        assert_eq!(body["error"], "Cart is empty");
    }

    #[tokio::test]
    async fn test_query_error_hides_details() {
        let err = AppError::query(
            ITEMS_FAILED,
            RepositoryError::DataCorruption("secret table layout".to_string()),
        );
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Error fetching items");
        assert_eq!(body["error"], "query_error");
        assert!(!body.to_string().contains("secret"));
    }

    #[tokio::test]
    async fn test_auth_failure_has_message_only() {
        let (status, body) = body_json(AuthError::InvalidCredentials.into()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, serde_json::json!({ "message": "Invalid username or password" }));
    }

    #[test]
    fn test_login_repository_error_is_query() {
        let err = AppError::from(AuthError::Repository(RepositoryError::NotFound));
        assert!(matches!(err, AppError::Query { message: LOGIN_FAILED, .. }));
    }

    #[test]
    fn test_checkout_repository_error_is_query() {
        let err = AppError::from(CheckoutError::Repository(RepositoryError::NotFound));
        assert!(matches!(err, AppError::Query { message: CHECKOUT_FAILED, .. }));
    }
}
