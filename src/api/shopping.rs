use axum::{
    Extension, Json,
    body::Bytes,
    extract::{Path, State, rejection::JsonRejection},
};
use std::sync::Arc;

use super::validation::{
    ClearCheckedRequest, ShoppingAddRequest, clear_checked_command, json_body,
    optional_json_body, shopping_add_command, validate_id,
};
use super::{ApiError, ApiResponse, AppState};
use crate::domain::{EntryId, OwnerId};
use crate::models::{ContainerDetail, Entry};
use crate::services::{ClearCheckedOutcome, ShoppingAddReport};

/// GET /shopping-list
pub async fn get_shopping_list(
    State(state): State<Arc<AppState>>,
    Extension(owner): Extension<OwnerId>,
) -> Result<Json<ApiResponse<ContainerDetail>>, ApiError> {
    let detail = state.shared.containers.shopping_list(owner).await?;
    Ok(Json(ApiResponse::success(detail)))
}

/// POST /shopping-list/items
pub async fn add_foods(
    State(state): State<Arc<AppState>>,
    Extension(owner): Extension<OwnerId>,
    payload: Result<Json<ShoppingAddRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<ShoppingAddReport>>, ApiError> {
    let foods = shopping_add_command(&json_body(payload)?)?;

    let report = state
        .shared
        .inventory
        .add_foods_to_shopping_list(owner, foods)
        .await?;

    Ok(Json(ApiResponse::with_message(
        format!("Added {} item(s) to the shopping list", report.added.len()),
        report,
    )))
}

/// POST /shopping-list/items/{id}/toggle
pub async fn toggle_item(
    State(state): State<Arc<AppState>>,
    Extension(owner): Extension<OwnerId>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Entry>>, ApiError> {
    let id = EntryId::new(validate_id(id, "item")?);
    let entry = state.shared.inventory.toggle_checked(owner, id).await?;
    Ok(Json(ApiResponse::success(entry)))
}

/// POST /shopping-list/clear-checked
///
/// Without `item_ids` every checked item goes.
pub async fn clear_checked(
    State(state): State<Arc<AppState>>,
    Extension(owner): Extension<OwnerId>,
    body: Bytes,
) -> Result<Json<ApiResponse<ClearCheckedOutcome>>, ApiError> {
    let request: ClearCheckedRequest = optional_json_body(&body)?;
    let entries = clear_checked_command(&request)?;

    let outcome = state.shared.inventory.clear_checked(owner, entries).await?;
    Ok(Json(ApiResponse::with_message(
        format!("Removed {} checked item(s)", outcome.removed),
        outcome,
    )))
}
