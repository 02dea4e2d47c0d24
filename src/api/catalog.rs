use axum::{
    Extension, Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::{json_body, validate_id};
use super::{ApiError, ApiResponse, AppState};
use crate::domain::{FoodCategory, FoodId, OwnerId};
use crate::models::{CatalogFood, NewCatalogFood};

#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    pub category: Option<String>,
    pub search: Option<String>,
}

/// GET /catalog
pub async fn list_foods(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<ApiResponse<Vec<CatalogFood>>>, ApiError> {
    let category = query
        .category
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .map(FoodCategory::parse_lenient);

    let foods = state.shared.catalog.list(category, query.search).await?;
    Ok(Json(ApiResponse::success(foods)))
}

/// GET /catalog/{id}
pub async fn get_food(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<CatalogFood>>, ApiError> {
    let id = FoodId::new(validate_id(id, "food")?);
    let food = state.shared.catalog.get(id).await?;
    Ok(Json(ApiResponse::success(food)))
}

/// POST /catalog
pub async fn create_food(
    State(state): State<Arc<AppState>>,
    Extension(owner): Extension<OwnerId>,
    payload: Result<Json<NewCatalogFood>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<CatalogFood>>), ApiError> {
    let food = json_body(payload)?;
    let food = state.shared.catalog.create(Some(owner), food).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            format!("Added {} to the catalog", food.name),
            food,
        )),
    ))
}

/// PUT /catalog/{id}
pub async fn update_food(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    payload: Result<Json<NewCatalogFood>, JsonRejection>,
) -> Result<Json<ApiResponse<CatalogFood>>, ApiError> {
    let id = FoodId::new(validate_id(id, "food")?);
    let food = state.shared.catalog.update(id, json_body(payload)?).await?;
    Ok(Json(ApiResponse::success(food)))
}

/// DELETE /catalog/{id}
pub async fn delete_food(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = FoodId::new(validate_id(id, "food")?);
    state.shared.catalog.delete(id).await?;
    Ok(Json(ApiResponse::message("Food deleted")))
}
