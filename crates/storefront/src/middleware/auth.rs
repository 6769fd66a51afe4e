//! Authentication extractors and session helpers.
//!
//! The logged-in user lives in the session under
//! [`session_keys::CURRENT_USER`]. Handlers that need an identity take
//! [`RequireAuth`]; requests without one are rejected with `401`, and a
//! session store that cannot be read gives `500`.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::error::{AppError, NOT_LOGGED_IN, SESSION_FAILED};
use crate::models::{CurrentUser, session_keys};

/// Extractor that requires a logged-in session.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.username)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AppError::AuthFailure(NOT_LOGGED_IN))?;

        // A store failure is a server error, not a missing login
        let user: CurrentUser = session
            .get(session_keys::CURRENT_USER)
            .await
            .map_err(|e| AppError::Internal {
                message: SESSION_FAILED,
                detail: e.to_string(),
            })?
            .ok_or(AppError::AuthFailure(NOT_LOGGED_IN))?;

        Ok(Self(user))
    }
}

/// Bind `user` to the session under a fresh session id.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Drop the whole session (logout).
///
/// # Errors
///
/// Returns an error if the session store cannot be updated.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}
