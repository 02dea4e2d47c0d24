use std::collections::HashMap;

use crate::domain::{ContainerId, ContainerKind, OwnerId};
use crate::entities::{container_entries, containers, prelude::*};
use crate::models::Container;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, Statement,
};
use tracing::info;

/// Repository for owner-scoped containers.
///
/// Works against a plain connection or an open transaction.
pub struct ContainerRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ContainerRepository<'a, C> {
    pub const fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn list_for_owner(&self, owner: OwnerId) -> Result<Vec<Container>, DbErr> {
        let rows = Containers::find()
            .filter(containers::Column::OwnerId.eq(owner.value()))
            .order_by_asc(containers::Column::Name)
            .all(self.db)
            .await?;

        rows.into_iter().map(Container::try_from).collect()
    }

    /// Looks the container up only among the owner's containers.
    pub async fn get_for_owner(
        &self,
        owner: OwnerId,
        id: ContainerId,
    ) -> Result<Option<Container>, DbErr> {
        let row = Containers::find_by_id(id.value())
            .filter(containers::Column::OwnerId.eq(owner.value()))
            .one(self.db)
            .await?;

        row.map(Container::try_from).transpose()
    }

    pub async fn get(&self, id: ContainerId) -> Result<Option<Container>, DbErr> {
        let row = Containers::find_by_id(id.value()).one(self.db).await?;
        row.map(Container::try_from).transpose()
    }

    pub async fn create(
        &self,
        owner: OwnerId,
        name: &str,
        kind: ContainerKind,
        now: &str,
    ) -> Result<Container, DbErr> {
        let model = containers::ActiveModel {
            owner_id: Set(owner.value()),
            name: Set(name.to_string()),
            kind: Set(kind.as_str().to_string()),
            created_at: Set(now.to_string()),
            updated_at: Set(now.to_string()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        info!("Created {} container '{}' for owner {}", kind, name, owner);
        Container::try_from(model)
    }

    pub async fn update(
        &self,
        id: ContainerId,
        name: &str,
        kind: ContainerKind,
        now: &str,
    ) -> Result<Option<Container>, DbErr> {
        let Some(existing) = Containers::find_by_id(id.value()).one(self.db).await? else {
            return Ok(None);
        };

        let mut active: containers::ActiveModel = existing.into();
        active.name = Set(name.to_string());
        active.kind = Set(kind.as_str().to_string());
        active.updated_at = Set(now.to_string());
        let model = active.update(self.db).await?;

        Container::try_from(model).map(Some)
    }

    /// Deletes the container; its entries go with it through the cascade.
    pub async fn delete(&self, id: ContainerId) -> Result<bool, DbErr> {
        let result = Containers::delete_by_id(id.value()).exec(self.db).await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn entry_count(&self, id: ContainerId) -> Result<u64, DbErr> {
        ContainerEntries::find()
            .filter(container_entries::Column::ContainerId.eq(id.value()))
            .count(self.db)
            .await
    }

    pub async fn entry_counts(&self, ids: &[ContainerId]) -> Result<HashMap<ContainerId, u64>, DbErr> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let raw: Vec<i32> = ids.iter().map(ContainerId::value).collect();
        let rows: Vec<(i32, i64)> = ContainerEntries::find()
            .select_only()
            .column(container_entries::Column::ContainerId)
            .column_as(container_entries::Column::Id.count(), "count")
            .filter(container_entries::Column::ContainerId.is_in(raw))
            .group_by(container_entries::Column::ContainerId)
            .into_tuple()
            .all(self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(id, count)| (ContainerId::new(id), u64::try_from(count).unwrap_or(0)))
            .collect())
    }

    /// Get-or-create of the owner's single shopping list.
    ///
    /// `INSERT OR IGNORE` against the partial unique index keeps two
    /// concurrent first visits from creating two lists.
    pub async fn shopping_list(&self, owner: OwnerId, now: &str) -> Result<Container, DbErr> {
        let backend = self.db.get_database_backend();
        let insert = Statement::from_sql_and_values(
            backend,
            "INSERT OR IGNORE INTO containers (owner_id, name, kind, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?)",
            [
                owner.value().into(),
                "Shopping List".into(),
                ContainerKind::Shopping.as_str().into(),
                now.into(),
                now.into(),
            ],
        );
        let result = self.db.execute(insert).await?;
        if result.rows_affected() > 0 {
            info!("Created shopping list for owner {}", owner);
        }

        let row = Containers::find()
            .filter(containers::Column::OwnerId.eq(owner.value()))
            .filter(containers::Column::Kind.eq(ContainerKind::Shopping.as_str()))
            .one(self.db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("shopping list for owner {owner}")))?;

        Container::try_from(row)
    }

    /// Creates whichever default containers the owner is missing.
    pub async fn ensure_defaults(&self, owner: OwnerId, now: &str) -> Result<Vec<Container>, DbErr> {
        let existing: Vec<ContainerKind> = self
            .list_for_owner(owner)
            .await?
            .into_iter()
            .map(|c| c.kind)
            .collect();

        let mut created = Vec::new();
        for (kind, name) in ContainerKind::DEFAULTS {
            if existing.contains(&kind) {
                continue;
            }
            let container = if kind.is_shopping() {
                self.shopping_list(owner, now).await?
            } else {
                self.create(owner, name, kind, now).await?
            };
            created.push(container);
        }

        Ok(created)
    }
}
