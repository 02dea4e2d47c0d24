//! `SeaORM` implementation of the `CatalogService` trait.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::db::Store;
use crate::domain::{Clock, FoodCategory, FoodId, OwnerId};
use crate::models::{CatalogFood, NewCatalogFood};
use crate::services::catalog_service::{CatalogError, CatalogService, SeedReport};

const MAX_NAME_LEN: usize = 100;

pub struct SeaOrmCatalogService {
    store: Store,
    clock: Arc<dyn Clock>,
}

impl SeaOrmCatalogService {
    #[must_use]
    pub fn new(store: Store, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    fn validate(food: &NewCatalogFood) -> Result<(), CatalogError> {
        let name = food.name.trim();
        if name.is_empty() {
            return Err(CatalogError::Validation(
                "Food name cannot be empty".to_string(),
            ));
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(CatalogError::Validation(format!(
                "Food name cannot exceed {MAX_NAME_LEN} characters"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogService for SeaOrmCatalogService {
    async fn list(
        &self,
        category: Option<FoodCategory>,
        search: Option<String>,
    ) -> Result<Vec<CatalogFood>, CatalogError> {
        Ok(self
            .store
            .catalog()
            .list(category, search.as_deref())
            .await?)
    }

    async fn get(&self, id: FoodId) -> Result<CatalogFood, CatalogError> {
        self.store
            .catalog()
            .get(id)
            .await?
            .ok_or(CatalogError::NotFound(id))
    }

    async fn create(
        &self,
        contributor: Option<OwnerId>,
        food: NewCatalogFood,
    ) -> Result<CatalogFood, CatalogError> {
        Self::validate(&food)?;
        let now = self.clock.now().to_rfc3339();
        Ok(self.store.catalog().create(&food, contributor, &now).await?)
    }

    async fn update(&self, id: FoodId, food: NewCatalogFood) -> Result<CatalogFood, CatalogError> {
        Self::validate(&food)?;
        self.store
            .catalog()
            .update(id, &food)
            .await?
            .ok_or(CatalogError::NotFound(id))
    }

    async fn delete(&self, id: FoodId) -> Result<(), CatalogError> {
        let catalog = self.store.catalog();

        let references = catalog.reference_count(id).await?;
        if references > 0 {
            return Err(CatalogError::Conflict(format!(
                "Food is still stored in {references} container(s)"
            )));
        }

        if !catalog.delete(id).await? {
            return Err(CatalogError::NotFound(id));
        }

        info!("Deleted catalog food {}", id);
        Ok(())
    }

    async fn seed(&self, foods: Vec<NewCatalogFood>) -> Result<SeedReport, CatalogError> {
        let now = self.clock.now().to_rfc3339();
        let catalog = self.store.catalog();

        let mut report = SeedReport::default();
        for food in &foods {
            Self::validate(food)?;
            let (_, created) = catalog.get_or_create(food, &now).await?;
            if created {
                report.created += 1;
            } else {
                report.existing += 1;
            }
        }

        info!(
            "Catalog seed: {} created, {} already present",
            report.created, report.existing
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_names_are_rejected() {
        let food = NewCatalogFood::new("   ", FoodCategory::Other, "");
        assert!(matches!(
            SeaOrmCatalogService::validate(&food),
            Err(CatalogError::Validation(_))
        ));
    }

    #[test]
    fn long_names_are_rejected() {
        let food = NewCatalogFood::new("x".repeat(101), FoodCategory::Other, "");
        assert!(SeaOrmCatalogService::validate(&food).is_err());
        let food = NewCatalogFood::new("x".repeat(100), FoodCategory::Other, "");
        assert!(SeaOrmCatalogService::validate(&food).is_ok());
    }
}
