//! `SeaORM` implementation of the `ContainerService` trait.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::config::InventoryConfig;
use crate::db::Store;
use crate::domain::{Clock, ContainerId, ContainerKind, Freshness, OwnerId};
use crate::models::{Container, ContainerDetail, ContainerSummary, EntryView};
use crate::services::container_service::{ContainerError, ContainerService};

const MAX_NAME_LEN: usize = 50;

pub struct SeaOrmContainerService {
    store: Store,
    clock: Arc<dyn Clock>,
    config: InventoryConfig,
}

impl SeaOrmContainerService {
    #[must_use]
    pub fn new(store: Store, clock: Arc<dyn Clock>, config: InventoryConfig) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    fn validate_name(name: &str) -> Result<String, ContainerError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ContainerError::Validation(
                "Container name cannot be empty".to_string(),
            ));
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(ContainerError::Validation(format!(
                "Container name cannot exceed {MAX_NAME_LEN} characters"
            )));
        }
        Ok(name.to_string())
    }

    async fn owned(&self, owner: OwnerId, id: ContainerId) -> Result<Container, ContainerError> {
        self.store
            .containers()
            .get_for_owner(owner, id)
            .await?
            .ok_or(ContainerError::NotFound(id))
    }

    async fn detail(&self, container: Container) -> Result<ContainerDetail, ContainerError> {
        let today = self.clock.today();
        let items: Vec<EntryView> = self
            .store
            .entries()
            .list_for_container(container.id)
            .await?
            .into_iter()
            .map(|item| EntryView {
                freshness: Freshness::evaluate(
                    item.entry.expiration_date,
                    today,
                    self.config.expiring_soon_days,
                ),
                item,
            })
            .collect();

        Ok(ContainerDetail {
            container,
            item_count: items.len() as u64,
            items,
        })
    }
}

#[async_trait]
impl ContainerService for SeaOrmContainerService {
    async fn list(&self, owner: OwnerId) -> Result<Vec<ContainerSummary>, ContainerError> {
        let repo = self.store.containers();
        let containers = repo.list_for_owner(owner).await?;
        let ids: Vec<ContainerId> = containers.iter().map(|c| c.id).collect();
        let counts = repo.entry_counts(&ids).await?;

        Ok(containers
            .into_iter()
            .map(|container| ContainerSummary {
                item_count: counts.get(&container.id).copied().unwrap_or(0),
                container,
            })
            .collect())
    }

    async fn get(
        &self,
        owner: OwnerId,
        id: ContainerId,
    ) -> Result<ContainerDetail, ContainerError> {
        let container = self.owned(owner, id).await?;
        self.detail(container).await
    }

    async fn create(
        &self,
        owner: OwnerId,
        name: String,
        kind: ContainerKind,
    ) -> Result<Container, ContainerError> {
        if kind.is_shopping() {
            return Err(ContainerError::Validation(
                "Each owner has exactly one shopping list".to_string(),
            ));
        }
        let name = Self::validate_name(&name)?;
        let now = self.clock.now().to_rfc3339();

        Ok(self.store.containers().create(owner, &name, kind, &now).await?)
    }

    async fn update(
        &self,
        owner: OwnerId,
        id: ContainerId,
        name: Option<String>,
        kind: Option<ContainerKind>,
    ) -> Result<Container, ContainerError> {
        let existing = self.owned(owner, id).await?;

        let kind = kind.unwrap_or(existing.kind);
        if kind != existing.kind && (kind.is_shopping() || existing.kind.is_shopping()) {
            return Err(ContainerError::Validation(
                "The shopping list cannot change type".to_string(),
            ));
        }

        let name = match name {
            Some(name) => Self::validate_name(&name)?,
            None => existing.name,
        };
        let now = self.clock.now().to_rfc3339();

        self.store
            .containers()
            .update(id, &name, kind, &now)
            .await?
            .ok_or(ContainerError::NotFound(id))
    }

    async fn delete(&self, owner: OwnerId, id: ContainerId) -> Result<(), ContainerError> {
        let container = self.owned(owner, id).await?;
        if container.kind.is_shopping() {
            return Err(ContainerError::Validation(
                "The shopping list cannot be deleted".to_string(),
            ));
        }

        if !self.store.containers().delete(id).await? {
            return Err(ContainerError::NotFound(id));
        }

        info!("Deleted container '{}' ({})", container.name, id);
        Ok(())
    }

    async fn shopping_list(&self, owner: OwnerId) -> Result<ContainerDetail, ContainerError> {
        let now = self.clock.now().to_rfc3339();
        let container = self.store.containers().shopping_list(owner, &now).await?;
        self.detail(container).await
    }

    async fn ensure_defaults(&self, owner: OwnerId) -> Result<Vec<Container>, ContainerError> {
        let now = self.clock.now().to_rfc3339();
        Ok(self.store.containers().ensure_defaults(owner, &now).await?)
    }
}
