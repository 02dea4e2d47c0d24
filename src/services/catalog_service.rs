//! Domain service for the shared food catalog.

use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use thiserror::Error;

use crate::domain::{FoodCategory, FoodId, OwnerId};
use crate::models::{CatalogFood, NewCatalogFood};

/// Errors specific to catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Food not found: {0}")]
    NotFound(FoodId),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<DbErr> for CatalogError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                Self::Conflict("A food with that name already exists".to_string())
            }
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                Self::Conflict("Food is still stored in a container".to_string())
            }
            _ => Self::Database(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct SeedReport {
    pub created: usize,
    pub existing: usize,
}

#[async_trait::async_trait]
pub trait CatalogService: Send + Sync {
    /// Catalog ordered by category then name, optionally filtered.
    async fn list(
        &self,
        category: Option<FoodCategory>,
        search: Option<String>,
    ) -> Result<Vec<CatalogFood>, CatalogError>;

    async fn get(&self, id: FoodId) -> Result<CatalogFood, CatalogError>;

    /// # Errors
    ///
    /// Returns [`CatalogError::Conflict`] when the name is taken.
    async fn create(
        &self,
        contributor: Option<OwnerId>,
        food: NewCatalogFood,
    ) -> Result<CatalogFood, CatalogError>;

    async fn update(&self, id: FoodId, food: NewCatalogFood) -> Result<CatalogFood, CatalogError>;

    /// # Errors
    ///
    /// Returns [`CatalogError::Conflict`] while any container still holds the food.
    async fn delete(&self, id: FoodId) -> Result<(), CatalogError>;

    /// Get-or-create by name for each food.
    async fn seed(&self, foods: Vec<NewCatalogFood>) -> Result<SeedReport, CatalogError>;
}
