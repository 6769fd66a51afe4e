//! Login, logout and session introspection.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tower_sessions::Session;
use tracing::{info, instrument};

use shopfront_core::api::{LoginRequest, LoginResponse, MessageResponse, SessionResponse};

use crate::error::{AppError, LOGIN_FAILED, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{RequireAuth, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::AuthService;
use crate::state::AppState;

/// `POST /api/login`: verify the password and bind the user to the session.
///
/// Unknown users and wrong passwords get the same `401` and no user data.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    body: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>> {
    let Json(request) = body.map_err(|rejection| AppError::InvalidRequest {
        message: LOGIN_FAILED,
        detail: rejection.body_text(),
    })?;

    let user = AuthService::new(state.pool())
        .login(&request.username, &request.password)
        .await?;

    let current = CurrentUser::from(&user);
    set_current_user(&session, &current)
        .await
        .map_err(|e| AppError::Internal {
            message: LOGIN_FAILED,
            detail: e.to_string(),
        })?;

    set_sentry_user(&user.id, user.username.as_str());
    info!(user_id = %user.id, "User logged in");

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        username: user.username,
    }))
}

/// `POST /api/logout`: drop the session.
pub async fn logout(session: Session) -> Result<Json<MessageResponse>> {
    clear_current_user(&session)
        .await
        .map_err(|e| AppError::Internal {
            message: "Error logging out",
            detail: e.to_string(),
        })?;

    clear_sentry_user();

    Ok(Json(MessageResponse {
        message: "Logged out".to_string(),
    }))
}

/// `GET /api/session`: who is logged in.
pub async fn current(RequireAuth(user): RequireAuth) -> Json<SessionResponse> {
    Json(SessionResponse {
        username: user.username,
    })
}
