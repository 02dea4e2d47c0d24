use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use std::sync::Arc;

use super::validation::{
    AddItemRequest, CreateContainerRequest, UpdateContainerRequest, add_item_command, json_body,
    parse_container_kind, validate_id,
};
use super::{ApiError, ApiResponse, AppState};
use crate::domain::{ContainerId, OwnerId};
use crate::models::{Container, ContainerDetail, ContainerSummary};
use crate::services::AddOutcome;

/// GET /containers
pub async fn list_containers(
    State(state): State<Arc<AppState>>,
    Extension(owner): Extension<OwnerId>,
) -> Result<Json<ApiResponse<Vec<ContainerSummary>>>, ApiError> {
    let containers = state.shared.containers.list(owner).await?;
    Ok(Json(ApiResponse::success(containers)))
}

/// POST /containers
pub async fn create_container(
    State(state): State<Arc<AppState>>,
    Extension(owner): Extension<OwnerId>,
    payload: Result<Json<CreateContainerRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Container>>), ApiError> {
    let payload = json_body(payload)?;
    let kind = parse_container_kind(&payload.kind)?;

    let container = state
        .shared
        .containers
        .create(owner, payload.name, kind)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            format!("Created {}", container.name),
            container,
        )),
    ))
}

/// GET /containers/{id}
pub async fn get_container(
    State(state): State<Arc<AppState>>,
    Extension(owner): Extension<OwnerId>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ContainerDetail>>, ApiError> {
    let id = ContainerId::new(validate_id(id, "container")?);
    let detail = state.shared.containers.get(owner, id).await?;
    Ok(Json(ApiResponse::success(detail)))
}

/// PUT /containers/{id}
pub async fn update_container(
    State(state): State<Arc<AppState>>,
    Extension(owner): Extension<OwnerId>,
    Path(id): Path<i32>,
    payload: Result<Json<UpdateContainerRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Container>>, ApiError> {
    let id = ContainerId::new(validate_id(id, "container")?);
    let payload = json_body(payload)?;
    let kind = payload
        .kind
        .as_deref()
        .map(parse_container_kind)
        .transpose()?;

    let container = state
        .shared
        .containers
        .update(owner, id, payload.name, kind)
        .await?;

    Ok(Json(ApiResponse::success(container)))
}

/// DELETE /containers/{id}
pub async fn delete_container(
    State(state): State<Arc<AppState>>,
    Extension(owner): Extension<OwnerId>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = ContainerId::new(validate_id(id, "container")?);
    state.shared.containers.delete(owner, id).await?;
    Ok(Json(ApiResponse::message("Container deleted")))
}

/// POST /containers/{id}/items
///
/// Responds 201 when a new entry was created, 200 when an existing one grew.
pub async fn add_item(
    State(state): State<Arc<AppState>>,
    Extension(owner): Extension<OwnerId>,
    Path(id): Path<i32>,
    payload: Result<Json<AddItemRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<AddOutcome>>), ApiError> {
    let payload = json_body(payload)?;
    let command = add_item_command(id, &payload)?;

    let outcome = state.shared.inventory.add_or_merge(owner, command).await?;

    let (status, message) = if outcome.created {
        (StatusCode::CREATED, "Item added")
    } else {
        (StatusCode::OK, "Quantity updated")
    };
    Ok((status, Json(ApiResponse::with_message(message, outcome))))
}
