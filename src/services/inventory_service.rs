//! Domain service for every write to container entries.
//!
//! `add_or_merge`, `move_entry`, `batch_move` and `delete_entry` keep the
//! one-entry-per-(container, food) invariant. The remaining operations are
//! the edits the inventory screens need on top of those four.

use chrono::NaiveDate;
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use thiserror::Error;

use crate::domain::{ContainerId, EntryId, FoodId, Freshness, OwnerId};
use crate::models::{Entry, EntryWithFood};

/// Errors specific to inventory operations.
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// The store stayed locked through every retry.
    #[error("Database busy: {0}")]
    Contention(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl InventoryError {
    pub(crate) fn not_found(what: &str, id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{what} {id}"))
    }
}

impl From<DbErr> for InventoryError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => {
                return Self::ConstraintViolation(msg);
            }
            Some(SqlErr::ForeignKeyConstraintViolation(msg)) => {
                return Self::ConstraintViolation(msg);
            }
            _ => {}
        }

        let message = err.to_string();
        if is_busy(&message) {
            Self::Contention(message)
        } else {
            Self::Database(message)
        }
    }
}

fn is_busy(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    lower.contains("database is locked")
        || lower.contains("database table is locked")
        || lower.contains("sqlite_busy")
}

/// Validated request to put a quantity of a food into a container.
#[derive(Debug, Clone)]
pub struct AddItem {
    pub container: ContainerId,
    pub food: FoodId,
    pub quantity: i32,
    pub expiration_date: Option<NaiveDate>,
    /// `None` derives the flag from the container: frozen iff it is a freezer.
    pub is_frozen: Option<bool>,
}

/// Validated request to move part or all of an entry elsewhere.
#[derive(Debug, Clone)]
pub struct MoveItem {
    pub entry: EntryId,
    pub target: ContainerId,
    pub quantity: i32,
    pub expiration_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExpirationChange {
    #[default]
    Keep,
    Set(NaiveDate),
    /// Drop the stored date and let the shelf-life rules pick a new one.
    Recompute,
}

#[derive(Debug, Clone, Default)]
pub struct EntryUpdate {
    pub quantity: Option<i32>,
    pub expiration: ExpirationChange,
    pub checked_off: Option<bool>,
    pub is_frozen: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddOutcome {
    pub entry: Entry,
    pub created: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MoveOutcome {
    pub source_id: EntryId,
    /// Quantity left behind; zero means the source entry was deleted.
    pub source_remaining: i32,
    pub moved: i32,
    pub target: Entry,
    pub created: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchMoveFailure {
    pub item_id: EntryId,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchMoveReport {
    pub moved: Vec<EntryId>,
    pub failed: Vec<BatchMoveFailure>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteOutcome {
    pub requeued: bool,
    pub shopping_list_count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShoppingAddReport {
    pub added: Vec<Entry>,
    pub skipped: Vec<FoodId>,
    pub shopping_list_count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClearCheckedOutcome {
    pub removed: u64,
    pub shopping_list_count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExpiringEntry {
    #[serde(flatten)]
    pub item: EntryWithFood,
    pub container_name: String,
    pub freshness: Freshness,
}

/// Domain service trait for inventory mutations.
#[async_trait::async_trait]
pub trait InventoryService: Send + Sync {
    /// Adds to the existing entry for `(container, food)` or creates one.
    ///
    /// A new entry gets the explicit date, or the shelf-life date computed
    /// from today. A merged entry keeps its stored date.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::InvalidQuantity`] when the quantity is not
    /// positive and [`InventoryError::NotFound`] for an unknown food or a
    /// container the owner does not hold.
    async fn add_or_merge(&self, owner: OwnerId, item: AddItem)
    -> Result<AddOutcome, InventoryError>;

    /// Moves `quantity` of an entry into another container in one transaction.
    ///
    /// The moved stock is frozen iff the target is a freezer.
    async fn move_entry(&self, owner: OwnerId, item: MoveItem)
    -> Result<MoveOutcome, InventoryError>;

    /// Moves each entry in full into `target`, one transaction per entry.
    ///
    /// Failures are reported per entry and do not stop the batch.
    async fn batch_move(
        &self,
        owner: OwnerId,
        entries: Vec<EntryId>,
        target: ContainerId,
    ) -> Result<BatchMoveReport, InventoryError>;

    /// Deletes an entry, optionally putting its quantity back on the
    /// shopping list first.
    async fn delete_entry(
        &self,
        owner: OwnerId,
        entry: EntryId,
        requeue_to_shopping: bool,
    ) -> Result<DeleteOutcome, InventoryError>;

    async fn update_entry(
        &self,
        owner: OwnerId,
        entry: EntryId,
        update: EntryUpdate,
    ) -> Result<Entry, InventoryError>;

    /// Adds one of each food to the shopping list. Unknown foods are skipped.
    async fn add_foods_to_shopping_list(
        &self,
        owner: OwnerId,
        foods: Vec<FoodId>,
    ) -> Result<ShoppingAddReport, InventoryError>;

    /// Flips the checked-off flag of a shopping-list entry.
    async fn toggle_checked(&self, owner: OwnerId, entry: EntryId)
    -> Result<Entry, InventoryError>;

    /// Removes checked-off shopping-list entries, all of them or only `entries`.
    async fn clear_checked(
        &self,
        owner: OwnerId,
        entries: Option<Vec<EntryId>>,
    ) -> Result<ClearCheckedOutcome, InventoryError>;

    /// Stored entries expiring within `within_days` of today, expired ones included.
    async fn expiring(
        &self,
        owner: OwnerId,
        within_days: i64,
    ) -> Result<Vec<ExpiringEntry>, InventoryError>;
}
