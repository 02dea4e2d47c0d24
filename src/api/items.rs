use axum::{
    Extension, Json,
    body::Bytes,
    extract::{Path, State, rejection::JsonRejection},
};
use std::sync::Arc;

use super::validation::{
    BatchMoveRequest, DeleteItemRequest, MoveItemRequest, UpdateItemRequest, batch_move_command,
    json_body, move_item_command, optional_json_body, update_item_command, validate_id,
};
use super::{ApiError, ApiResponse, AppState};
use crate::domain::{EntryId, OwnerId};
use crate::models::Entry;
use crate::services::{BatchMoveReport, DeleteOutcome, MoveOutcome};

/// PUT /items/{id}
pub async fn update_item(
    State(state): State<Arc<AppState>>,
    Extension(owner): Extension<OwnerId>,
    Path(id): Path<i32>,
    payload: Result<Json<UpdateItemRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Entry>>, ApiError> {
    let id = EntryId::new(validate_id(id, "item")?);
    let update = update_item_command(&json_body(payload)?)?;

    let entry = state.shared.inventory.update_entry(owner, id, update).await?;
    Ok(Json(ApiResponse::with_message("Item updated", entry)))
}

/// DELETE /items/{id}
///
/// Optional body `{"requeue": true}` puts the quantity back on the shopping list.
pub async fn delete_item(
    State(state): State<Arc<AppState>>,
    Extension(owner): Extension<OwnerId>,
    Path(id): Path<i32>,
    body: Bytes,
) -> Result<Json<ApiResponse<DeleteOutcome>>, ApiError> {
    let id = EntryId::new(validate_id(id, "item")?);
    let request: DeleteItemRequest = optional_json_body(&body)?;

    let outcome = state
        .shared
        .inventory
        .delete_entry(owner, id, request.requeue)
        .await?;

    let message = if outcome.requeued {
        "Item removed and added back to the shopping list"
    } else {
        "Item removed"
    };
    Ok(Json(ApiResponse::with_message(message, outcome)))
}

/// POST /items/{id}/move
pub async fn move_item(
    State(state): State<Arc<AppState>>,
    Extension(owner): Extension<OwnerId>,
    Path(id): Path<i32>,
    payload: Result<Json<MoveItemRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<MoveOutcome>>, ApiError> {
    let payload = json_body(payload)?;
    let command = move_item_command(id, &payload)?;

    let outcome = state.shared.inventory.move_entry(owner, command).await?;
    Ok(Json(ApiResponse::with_message(
        format!("Moved {} item(s)", outcome.moved),
        outcome,
    )))
}

/// POST /items/batch-move
///
/// Every selected item moves in full.
pub async fn batch_move(
    State(state): State<Arc<AppState>>,
    Extension(owner): Extension<OwnerId>,
    payload: Result<Json<BatchMoveRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<BatchMoveReport>>, ApiError> {
    let payload = json_body(payload)?;
    let (entries, target) = batch_move_command(&payload)?;

    let report = state
        .shared
        .inventory
        .batch_move(owner, entries, target)
        .await?;

    Ok(Json(ApiResponse::with_message(
        format!("Moved {} item(s)", report.moved.len()),
        report,
    )))
}
