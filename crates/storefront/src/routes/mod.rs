//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health          - Liveness check
//! GET  /health/ready    - Readiness check (database)
//!
//! GET  /api/items       - Whole inventory
//! POST /api/login       - Password login (rate limited per IP)
//! POST /api/logout      - Drop the session
//! GET  /api/session     - Current user (requires auth)
//! POST /api/checkout    - Record the cart as an order (requires auth)
//! ```

pub mod api;
pub mod health;

use axum::{
    Router,
    routing::{get, post},
};

use crate::config::StorefrontConfig;
use crate::middleware::auth_rate_limiter;
use crate::state::AppState;

/// Create the `/api` router.
pub fn api_routes(config: &StorefrontConfig) -> Router<AppState> {
    let login = if config.login_rate_limit {
        post(api::auth::login).layer(auth_rate_limiter(config.trust_proxy_headers))
    } else {
        post(api::auth::login)
    };

    Router::new()
        .route("/items", get(api::items::list))
        .route("/login", login)
        .route("/logout", post(api::auth::logout))
        .route("/session", get(api::auth::current))
        .route("/checkout", post(api::checkout::checkout))
}

/// Create all routes for the storefront.
pub fn routes(config: &StorefrontConfig) -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api", api_routes(config))
}
