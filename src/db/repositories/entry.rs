use crate::domain::{ContainerId, EntryId, FoodId, OwnerId};
use crate::entities::{catalog_foods, container_entries, containers, prelude::*};
use crate::models::{CatalogFood, Container, Entry, EntryWithFood, NewEntry};
use chrono::NaiveDate;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};

/// Repository for container entries.
///
/// Every write here is meant to run inside the caller's transaction; the
/// repository never opens one itself.
pub struct EntryRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> EntryRepository<'a, C> {
    pub const fn new(db: &'a C) -> Self {
        Self { db }
    }

    // ========================================================================
    // Reads
    // ========================================================================

    pub async fn get(&self, id: EntryId) -> Result<Option<Entry>, DbErr> {
        let row = ContainerEntries::find_by_id(id.value()).one(self.db).await?;
        Ok(row.map(Entry::from))
    }

    /// Entry together with its container, if the container belongs to `owner`.
    pub async fn get_for_owner(
        &self,
        owner: OwnerId,
        id: EntryId,
    ) -> Result<Option<(Entry, Container)>, DbErr> {
        let row = ContainerEntries::find_by_id(id.value())
            .find_also_related(Containers)
            .filter(containers::Column::OwnerId.eq(owner.value()))
            .one(self.db)
            .await?;

        match row {
            Some((entry, Some(container))) => {
                Ok(Some((Entry::from(entry), Container::try_from(container)?)))
            }
            _ => Ok(None),
        }
    }

    pub async fn find(
        &self,
        container: ContainerId,
        food: FoodId,
    ) -> Result<Option<Entry>, DbErr> {
        let row = ContainerEntries::find()
            .filter(container_entries::Column::ContainerId.eq(container.value()))
            .filter(container_entries::Column::CatalogFoodId.eq(food.value()))
            .one(self.db)
            .await?;

        Ok(row.map(Entry::from))
    }

    /// Entries of one container, soonest expiration first, then by food name.
    pub async fn list_for_container(
        &self,
        container: ContainerId,
    ) -> Result<Vec<EntryWithFood>, DbErr> {
        self.list_for_containers(&[container], None).await
    }

    /// Entries across several containers, optionally only those expiring
    /// on or before `until`.
    pub async fn list_for_containers(
        &self,
        containers: &[ContainerId],
        until: Option<NaiveDate>,
    ) -> Result<Vec<EntryWithFood>, DbErr> {
        if containers.is_empty() {
            return Ok(Vec::new());
        }

        let raw: Vec<i32> = containers.iter().map(ContainerId::value).collect();
        let mut query = ContainerEntries::find()
            .filter(container_entries::Column::ContainerId.is_in(raw))
            .find_also_related(CatalogFoods);

        if let Some(until) = until {
            query = query
                .filter(container_entries::Column::ExpirationDate.is_not_null())
                .filter(container_entries::Column::ExpirationDate.lte(until));
        }

        let rows = query
            .order_by_asc(container_entries::Column::ExpirationDate)
            .order_by_asc(catalog_foods::Column::Name)
            .all(self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(entry, food)| {
                food.map(|food| EntryWithFood {
                    entry: Entry::from(entry),
                    food: CatalogFood::from(food),
                })
            })
            .collect())
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Atomic upsert keyed by `(container, food)`.
    ///
    /// Inserts `new` when no entry exists; otherwise adds its quantity to the
    /// existing row and leaves the stored expiration date alone. A frozen
    /// request can raise the frozen flag of an existing row but never lower
    /// it. Returns the resulting row and whether it was created, or `None`
    /// when the combined quantity would not fit in an `i32`.
    pub async fn merge(&self, new: &NewEntry) -> Result<Option<(Entry, bool)>, DbErr> {
        let inserted = ContainerEntries::insert(container_entries::ActiveModel {
            container_id: Set(new.container_id.value()),
            catalog_food_id: Set(new.food_id.value()),
            quantity: Set(new.quantity),
            added_at: Set(new.added_at.clone()),
            expiration_date: Set(new.expiration_date),
            checked_off: Set(false),
            is_frozen: Set(new.is_frozen),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::columns([
                container_entries::Column::ContainerId,
                container_entries::Column::CatalogFoodId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(self.db)
        .await?;

        let created = inserted > 0;

        if !created {
            let mut update = ContainerEntries::update_many()
                .col_expr(
                    container_entries::Column::Quantity,
                    Expr::col(container_entries::Column::Quantity).add(new.quantity),
                )
                .filter(container_entries::Column::ContainerId.eq(new.container_id.value()))
                .filter(container_entries::Column::CatalogFoodId.eq(new.food_id.value()))
                .filter(
                    container_entries::Column::Quantity
                        .lte(i32::MAX.saturating_sub(new.quantity)),
                );

            if new.is_frozen {
                update = update.col_expr(container_entries::Column::IsFrozen, Expr::value(true));
            }

            if update.exec(self.db).await?.rows_affected == 0 {
                return Ok(None);
            }
        }

        let entry = self
            .find(new.container_id, new.food_id)
            .await?
            .ok_or_else(|| {
                DbErr::RecordNotFound(format!(
                    "entry for food {} in container {}",
                    new.food_id, new.container_id
                ))
            })?;

        Ok(Some((entry, created)))
    }

    /// Removes `quantity` from the entry, deleting it when nothing remains.
    ///
    /// The decrement is conditional on enough stock so a concurrent change
    /// can never drive the quantity negative. Returns the remaining quantity,
    /// or `None` when the entry is gone or holds less than `quantity`.
    pub async fn take(&self, id: EntryId, quantity: i32) -> Result<Option<i32>, DbErr> {
        let result = ContainerEntries::update_many()
            .col_expr(
                container_entries::Column::Quantity,
                Expr::col(container_entries::Column::Quantity).sub(quantity),
            )
            .filter(container_entries::Column::Id.eq(id.value()))
            .filter(container_entries::Column::Quantity.gte(quantity))
            .exec(self.db)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        let remaining = self.get(id).await?.map_or(0, |e| e.quantity);
        if remaining == 0 {
            self.delete(id).await?;
        }

        Ok(Some(remaining))
    }

    pub async fn delete(&self, id: EntryId) -> Result<bool, DbErr> {
        let result = ContainerEntries::delete_by_id(id.value())
            .exec(self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    /// Deletes checked-off entries of a container, optionally limited to `ids`.
    pub async fn delete_checked(
        &self,
        container: ContainerId,
        ids: Option<&[EntryId]>,
    ) -> Result<u64, DbErr> {
        let mut delete = ContainerEntries::delete_many()
            .filter(container_entries::Column::ContainerId.eq(container.value()))
            .filter(container_entries::Column::CheckedOff.eq(true));

        if let Some(ids) = ids {
            let raw: Vec<i32> = ids.iter().map(EntryId::value).collect();
            delete = delete.filter(container_entries::Column::Id.is_in(raw));
        }

        Ok(delete.exec(self.db).await?.rows_affected)
    }

    pub async fn save(&self, entry: &Entry) -> Result<Entry, DbErr> {
        let active = container_entries::ActiveModel {
            id: Set(entry.id.value()),
            container_id: Set(entry.container_id.value()),
            catalog_food_id: Set(entry.food_id.value()),
            quantity: Set(entry.quantity),
            added_at: Set(entry.added_at.clone()),
            expiration_date: Set(entry.expiration_date),
            checked_off: Set(entry.checked_off),
            is_frozen: Set(entry.is_frozen),
        };

        Ok(Entry::from(active.update(self.db).await?))
    }
}
