use crate::domain::{FoodCategory, FoodId, OwnerId};
use crate::entities::{catalog_foods, container_entries, prelude::*};
use crate::models::{CatalogFood, NewCatalogFood};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use tracing::info;

/// Repository for the shared food catalog.
pub struct CatalogRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> CatalogRepository<'a, C> {
    pub const fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn list(
        &self,
        category: Option<FoodCategory>,
        search: Option<&str>,
    ) -> Result<Vec<CatalogFood>, DbErr> {
        let mut query = CatalogFoods::find();

        if let Some(category) = category {
            query = query.filter(catalog_foods::Column::Category.eq(category.as_str()));
        }
        if let Some(term) = search.map(str::trim).filter(|t| !t.is_empty()) {
            query = query.filter(catalog_foods::Column::Name.contains(term));
        }

        let rows = query
            .order_by_asc(catalog_foods::Column::Category)
            .order_by_asc(catalog_foods::Column::Name)
            .all(self.db)
            .await?;

        Ok(rows.into_iter().map(CatalogFood::from).collect())
    }

    pub async fn get(&self, id: FoodId) -> Result<Option<CatalogFood>, DbErr> {
        let row = CatalogFoods::find_by_id(id.value()).one(self.db).await?;
        Ok(row.map(CatalogFood::from))
    }

    pub async fn get_many(&self, ids: &[FoodId]) -> Result<Vec<CatalogFood>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let raw: Vec<i32> = ids.iter().map(FoodId::value).collect();
        let rows = CatalogFoods::find()
            .filter(catalog_foods::Column::Id.is_in(raw))
            .all(self.db)
            .await?;

        Ok(rows.into_iter().map(CatalogFood::from).collect())
    }

    pub async fn create(
        &self,
        food: &NewCatalogFood,
        contributor: Option<OwnerId>,
        now: &str,
    ) -> Result<CatalogFood, DbErr> {
        let model = catalog_foods::ActiveModel {
            name: Set(food.name.trim().to_string()),
            category: Set(food.category.as_str().to_string()),
            description: Set(food.description.clone()),
            contributor_id: Set(contributor.map(|owner| owner.value())),
            created_at: Set(now.to_string()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        info!("Added catalog food: {} ({})", model.name, model.category);
        Ok(CatalogFood::from(model))
    }

    pub async fn update(
        &self,
        id: FoodId,
        food: &NewCatalogFood,
    ) -> Result<Option<CatalogFood>, DbErr> {
        let Some(existing) = CatalogFoods::find_by_id(id.value()).one(self.db).await? else {
            return Ok(None);
        };

        let mut active: catalog_foods::ActiveModel = existing.into();
        active.name = Set(food.name.trim().to_string());
        active.category = Set(food.category.as_str().to_string());
        active.description = Set(food.description.clone());
        let model = active.update(self.db).await?;

        Ok(Some(CatalogFood::from(model)))
    }

    pub async fn delete(&self, id: FoodId) -> Result<bool, DbErr> {
        let result = CatalogFoods::delete_by_id(id.value()).exec(self.db).await?;
        Ok(result.rows_affected > 0)
    }

    /// Number of container entries still pointing at this food.
    pub async fn reference_count(&self, id: FoodId) -> Result<u64, DbErr> {
        ContainerEntries::find()
            .filter(container_entries::Column::CatalogFoodId.eq(id.value()))
            .count(self.db)
            .await
    }

    /// Inserts the food unless one with the same name exists.
    ///
    /// Returns the stored row and whether it was created by this call.
    pub async fn get_or_create(
        &self,
        food: &NewCatalogFood,
        now: &str,
    ) -> Result<(CatalogFood, bool), DbErr> {
        let name = food.name.trim().to_string();

        let inserted = CatalogFoods::insert(catalog_foods::ActiveModel {
            name: Set(name.clone()),
            category: Set(food.category.as_str().to_string()),
            description: Set(food.description.clone()),
            contributor_id: Set(None),
            created_at: Set(now.to_string()),
            ..Default::default()
        })
        .on_conflict(
            sea_orm::sea_query::OnConflict::column(catalog_foods::Column::Name)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(self.db)
        .await?;

        let model = CatalogFoods::find()
            .filter(catalog_foods::Column::Name.eq(name.as_str()))
            .one(self.db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("catalog food '{name}'")))?;

        Ok((CatalogFood::from(model), inserted > 0))
    }
}
