use axum::{
    Extension, Json,
    extract::{Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use crate::domain::OwnerId;
use crate::services::ExpiringEntry;

const MAX_WINDOW_DAYS: i64 = 365;

#[derive(Debug, Deserialize)]
pub struct ExpiringQuery {
    pub days: Option<i64>,
}

/// GET /inventory/expiring
///
/// Window defaults to `inventory.expiring_soon_days`.
pub async fn list_expiring(
    State(state): State<Arc<AppState>>,
    Extension(owner): Extension<OwnerId>,
    Query(query): Query<ExpiringQuery>,
) -> Result<Json<ApiResponse<Vec<ExpiringEntry>>>, ApiError> {
    let days = match query.days {
        Some(days) => days,
        None => state.config().read().await.inventory.expiring_soon_days,
    };
    if !(0..=MAX_WINDOW_DAYS).contains(&days) {
        return Err(ApiError::validation(format!(
            "days must be between 0 and {MAX_WINDOW_DAYS}"
        )));
    }

    let items = state.shared.inventory.expiring(owner, days).await?;
    Ok(Json(ApiResponse::success(items)))
}
