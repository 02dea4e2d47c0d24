//! Request bodies and their one-time conversion into service commands.

use axum::Json;
use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use chrono::NaiveDate;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::ApiError;
use crate::domain::{ContainerId, ContainerKind, EntryId, FoodId};
use crate::services::{AddItem, EntryUpdate, ExpirationChange, MoveItem};

/// Quantity as sent by forms (`"3"`) or scripts (`3`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum QuantityInput {
    Number(i64),
    Text(String),
}

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub food_id: i32,
    pub quantity: Option<QuantityInput>,
    pub expiration_date: Option<String>,
    pub is_frozen: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct MoveItemRequest {
    #[serde(alias = "target_container")]
    pub target_container_id: i32,
    pub quantity: Option<QuantityInput>,
    pub expiration_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BatchMoveRequest {
    #[serde(default)]
    pub item_ids: Vec<i32>,
    #[serde(alias = "target_container")]
    pub target_container_id: i32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeleteItemRequest {
    #[serde(alias = "requeue_to_shopping")]
    pub requeue: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateItemRequest {
    pub quantity: Option<QuantityInput>,
    pub expiration_date: Option<String>,
    pub clear_expiration: bool,
    pub checked_off: Option<bool>,
    pub is_frozen: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ShoppingAddRequest {
    #[serde(default)]
    pub food_ids: Vec<i32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ClearCheckedRequest {
    pub item_ids: Option<Vec<i32>>,
}

#[derive(Debug, Deserialize)]
pub struct CreateContainerRequest {
    pub name: String,
    #[serde(alias = "type", alias = "container_type")]
    pub kind: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateContainerRequest {
    pub name: Option<String>,
    #[serde(alias = "type", alias = "container_type")]
    pub kind: Option<String>,
}

// ============================================================================
// Extraction helpers
// ============================================================================

/// Unwraps a JSON body, reporting malformed input as a validation error.
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|e| ApiError::validation(format!("Invalid request body: {}", e.body_text())))
}

/// Parses a body that may be omitted entirely.
pub fn optional_json_body<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| ApiError::validation(format!("Invalid request body: {e}")))
}

// ============================================================================
// Field validation
// ============================================================================

pub fn validate_id(id: i32, what: &str) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid {what} ID: {id}. ID must be a positive integer"
        )));
    }
    Ok(id)
}

/// Whole-number quantity. Range checks belong to the inventory service.
pub fn parse_quantity(input: Option<&QuantityInput>, default: Option<i32>) -> Result<i32, ApiError> {
    let raw = match input {
        Some(QuantityInput::Number(n)) => *n,
        Some(QuantityInput::Text(s)) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| ApiError::validation(format!("Quantity must be a whole number, got '{s}'")))?,
        None => {
            return default.ok_or_else(|| ApiError::validation("Quantity is required"));
        }
    };

    i32::try_from(raw).map_err(|_| ApiError::validation(format!("Quantity {raw} is out of range")))
}

/// `YYYY-MM-DD`; an empty string means no date.
pub fn parse_date(input: Option<&str>) -> Result<Option<NaiveDate>, ApiError> {
    match input.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| ApiError::validation(format!("Invalid date '{s}', expected YYYY-MM-DD"))),
    }
}

pub fn parse_container_kind(raw: &str) -> Result<ContainerKind, ApiError> {
    raw.parse::<ContainerKind>()
        .map_err(|e| ApiError::validation(e.to_string()))
}

fn entry_ids(ids: &[i32]) -> Result<Vec<EntryId>, ApiError> {
    ids.iter()
        .map(|&id| validate_id(id, "item").map(EntryId::new))
        .collect()
}

// ============================================================================
// Commands
// ============================================================================

pub fn add_item_command(container: i32, req: &AddItemRequest) -> Result<AddItem, ApiError> {
    Ok(AddItem {
        container: ContainerId::new(validate_id(container, "container")?),
        food: FoodId::new(validate_id(req.food_id, "food")?),
        quantity: parse_quantity(req.quantity.as_ref(), Some(1))?,
        expiration_date: parse_date(req.expiration_date.as_deref())?,
        is_frozen: req.is_frozen,
    })
}

pub fn move_item_command(entry: i32, req: &MoveItemRequest) -> Result<MoveItem, ApiError> {
    Ok(MoveItem {
        entry: EntryId::new(validate_id(entry, "item")?),
        target: ContainerId::new(validate_id(req.target_container_id, "container")?),
        quantity: parse_quantity(req.quantity.as_ref(), None)?,
        expiration_date: parse_date(req.expiration_date.as_deref())?,
    })
}

pub fn batch_move_command(req: &BatchMoveRequest) -> Result<(Vec<EntryId>, ContainerId), ApiError> {
    if req.item_ids.is_empty() {
        return Err(ApiError::validation("No items selected"));
    }
    Ok((
        entry_ids(&req.item_ids)?,
        ContainerId::new(validate_id(req.target_container_id, "container")?),
    ))
}

pub fn update_item_command(req: &UpdateItemRequest) -> Result<EntryUpdate, ApiError> {
    let date = parse_date(req.expiration_date.as_deref())?;
    let expiration = match (date, req.clear_expiration) {
        (Some(_), true) => {
            return Err(ApiError::validation(
                "Provide either expiration_date or clear_expiration, not both",
            ));
        }
        (Some(date), false) => ExpirationChange::Set(date),
        (None, true) => ExpirationChange::Recompute,
        (None, false) => ExpirationChange::Keep,
    };

    let quantity = match &req.quantity {
        Some(q) => Some(parse_quantity(Some(q), None)?),
        None => None,
    };

    Ok(EntryUpdate {
        quantity,
        expiration,
        checked_off: req.checked_off,
        is_frozen: req.is_frozen,
    })
}

pub fn shopping_add_command(req: &ShoppingAddRequest) -> Result<Vec<FoodId>, ApiError> {
    if req.food_ids.is_empty() {
        return Err(ApiError::validation("No foods selected"));
    }
    req.food_ids
        .iter()
        .map(|&id| validate_id(id, "food").map(FoodId::new))
        .collect()
}

pub fn clear_checked_command(req: &ClearCheckedRequest) -> Result<Option<Vec<EntryId>>, ApiError> {
    match &req.item_ids {
        None => Ok(None),
        Some(ids) if ids.is_empty() => Err(ApiError::validation("No items selected")),
        Some(ids) => entry_ids(ids).map(Some),
    }
}
