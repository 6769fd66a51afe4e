//! Checkout endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::instrument;

use shopfront_core::api::{CheckoutRequest, CheckoutResponse};

use crate::error::{AppError, CHECKOUT_FAILED, Result, add_breadcrumb};
use crate::middleware::RequireAuth;
use crate::services::CheckoutService;
use crate::services::checkout::validate_request;
use crate::state::AppState;

/// `POST /api/checkout`: record the cart as one order for the session user.
///
/// The session decides who is buying. A `user` in the body must agree with
/// it. Prices in the body are ignored.
#[instrument(skip_all)]
pub async fn checkout(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    body: std::result::Result<Json<CheckoutRequest>, JsonRejection>,
) -> Result<Json<CheckoutResponse>> {
    let Json(request) = body.map_err(|rejection| AppError::InvalidRequest {
        message: CHECKOUT_FAILED,
        detail: rejection.body_text(),
    })?;

    let items = validate_request(&request, &user)?;

    let count = items.len().to_string();
    add_breadcrumb("checkout", "Checkout started", Some(&[("items", count.as_str())]));

    let completed = CheckoutService::new(state.pool(), state.stock_policy())
        .checkout(&user.username, &items)
        .await?;

    Ok(Json(CheckoutResponse {
        message: "Transaction completed successfully".to_string(),
        order_id: completed.order_id,
        total_price: completed.total_price,
        items: completed.lines,
    }))
}
