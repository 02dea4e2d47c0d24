//! Domain service for an owner's storage containers.
//!
//! Entry writes never go through here; see `InventoryService`.

use sea_orm::DbErr;
use thiserror::Error;

use crate::domain::{ContainerId, ContainerKind, OwnerId};
use crate::models::{Container, ContainerDetail, ContainerSummary};

#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("Container not found: {0}")]
    NotFound(ContainerId),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<DbErr> for ContainerError {
    fn from(err: DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait ContainerService: Send + Sync {
    /// Owner's containers by name, with entry counts.
    async fn list(&self, owner: OwnerId) -> Result<Vec<ContainerSummary>, ContainerError>;

    /// Container with its entries and their freshness as of today.
    async fn get(&self, owner: OwnerId, id: ContainerId)
    -> Result<ContainerDetail, ContainerError>;

    /// # Errors
    ///
    /// Returns [`ContainerError::Validation`] for a blank name or a second
    /// shopping list.
    async fn create(
        &self,
        owner: OwnerId,
        name: String,
        kind: ContainerKind,
    ) -> Result<Container, ContainerError>;

    async fn update(
        &self,
        owner: OwnerId,
        id: ContainerId,
        name: Option<String>,
        kind: Option<ContainerKind>,
    ) -> Result<Container, ContainerError>;

    /// Deletes the container and everything in it. The shopping list stays.
    async fn delete(&self, owner: OwnerId, id: ContainerId) -> Result<(), ContainerError>;

    /// The owner's shopping list, created on first access.
    async fn shopping_list(&self, owner: OwnerId) -> Result<ContainerDetail, ContainerError>;

    /// Creates any default container the owner lacks.
    async fn ensure_defaults(&self, owner: OwnerId) -> Result<Vec<Container>, ContainerError>;
}
