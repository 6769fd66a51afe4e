//! Inventory listing.

use axum::{Json, extract::State};

use shopfront_core::api::Product;

use crate::db::inventory::InventoryRepository;
use crate::error::{AppError, ITEMS_FAILED, Result};
use crate::state::AppState;

/// `GET /api/items`: the whole inventory, ordered by product id.
///
/// Search and category filtering happen in the client.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let items = InventoryRepository::new(state.pool())
        .list_all()
        .await
        .map_err(|e| AppError::query(ITEMS_FAILED, e))?;

    Ok(Json(items))
}
