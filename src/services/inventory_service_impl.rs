//! `SeaORM` implementation of the `InventoryService` trait.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Days, NaiveDate, Utc};
use sea_orm::DatabaseTransaction;
use tracing::{debug, info, warn};

use crate::config::InventoryConfig;
use crate::db::{CatalogRepository, ContainerRepository, EntryRepository, Store};
use crate::domain::{
    Clock, ContainerId, EntryId, FoodId, Freshness, OwnerId, compute_expiration,
};
use crate::models::{CatalogFood, Container, Entry, NewEntry};
use crate::services::inventory_service::{
    AddItem, AddOutcome, BatchMoveFailure, BatchMoveReport, ClearCheckedOutcome, DeleteOutcome,
    EntryUpdate, ExpirationChange, ExpiringEntry, InventoryError, InventoryService, MoveItem,
    MoveOutcome, ShoppingAddReport,
};

pub struct SeaOrmInventoryService {
    store: Store,
    clock: Arc<dyn Clock>,
    config: InventoryConfig,
}

impl SeaOrmInventoryService {
    #[must_use]
    pub fn new(store: Store, clock: Arc<dyn Clock>, config: InventoryConfig) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    /// Runs `body` inside a transaction, replaying it while SQLite reports
    /// the database as locked.
    ///
    /// `body` receives the transaction by value and hands it back with its
    /// result; the transaction is committed only on `Ok`.
    async fn run_atomic<T, F, Fut>(
        &self,
        operation: &'static str,
        mut body: F,
    ) -> Result<T, InventoryError>
    where
        F: FnMut(DatabaseTransaction) -> Fut + Send,
        Fut: Future<Output = (DatabaseTransaction, Result<T, InventoryError>)> + Send,
        T: Send,
    {
        let mut retries = 0u32;
        loop {
            match self.attempt(&mut body).await {
                Err(InventoryError::Contention(reason))
                    if retries < self.config.max_transaction_retries =>
                {
                    retries += 1;
                    metrics::counter!("larder_transaction_retries_total", "operation" => operation)
                        .increment(1);
                    debug!(operation, retries, %reason, "Database locked, retrying transaction");
                    let backoff = self.config.retry_backoff_ms.saturating_mul(u64::from(retries));
                    tokio::time::sleep(Duration::from_millis(backoff)).await;
                }
                Err(InventoryError::Contention(reason)) => {
                    warn!(operation, retries, %reason, "Giving up on locked database");
                    return Err(InventoryError::Contention(reason));
                }
                other => return other,
            }
        }
    }

    async fn attempt<T, F, Fut>(&self, body: &mut F) -> Result<T, InventoryError>
    where
        F: FnMut(DatabaseTransaction) -> Fut + Send,
        Fut: Future<Output = (DatabaseTransaction, Result<T, InventoryError>)> + Send,
        T: Send,
    {
        let txn = self.store.begin().await?;
        let (txn, result) = body(txn).await;

        match result {
            Ok(value) => {
                txn.commit().await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(e) = txn.rollback().await {
                    warn!("Rollback failed: {e}");
                }
                Err(err)
            }
        }
    }

    async fn shopping_count(&self, owner: OwnerId) -> Result<u64, InventoryError> {
        let now = self.clock.now().to_rfc3339();
        let containers = self.store.containers();
        let shopping = containers.shopping_list(owner, &now).await?;
        Ok(containers.entry_count(shopping.id).await?)
    }

    async fn move_one(
        &self,
        owner: OwnerId,
        entry: EntryId,
        target: ContainerId,
        quantity: Option<i32>,
        explicit: Option<NaiveDate>,
    ) -> Result<MoveOutcome, InventoryError> {
        let now = self.clock.now();
        let outcome = self
            .run_atomic("move", |txn| async move {
                let result = move_in(&txn, now, owner, entry, target, quantity, explicit).await;
                (txn, result)
            })
            .await?;

        metrics::counter!("larder_entries_moved_total").increment(1);
        record_merge(outcome.created);
        info!(
            "Moved {} of entry {} into container {} ({} left)",
            outcome.moved, entry, target, outcome.source_remaining
        );
        Ok(outcome)
    }
}

fn record_merge(created: bool) {
    if created {
        metrics::counter!("larder_entries_created_total").increment(1);
    } else {
        metrics::counter!("larder_entries_merged_total").increment(1);
    }
}

// ============================================================================
// Transaction bodies
// ============================================================================

async fn owned_container(
    txn: &DatabaseTransaction,
    owner: OwnerId,
    id: ContainerId,
) -> Result<Container, InventoryError> {
    ContainerRepository::new(txn)
        .get_for_owner(owner, id)
        .await?
        .ok_or_else(|| InventoryError::not_found("Container", id))
}

async fn owned_entry(
    txn: &DatabaseTransaction,
    owner: OwnerId,
    id: EntryId,
) -> Result<(Entry, Container), InventoryError> {
    EntryRepository::new(txn)
        .get_for_owner(owner, id)
        .await?
        .ok_or_else(|| InventoryError::not_found("Item", id))
}

async fn catalog_food(txn: &DatabaseTransaction, id: FoodId) -> Result<CatalogFood, InventoryError> {
    CatalogRepository::new(txn)
        .get(id)
        .await?
        .ok_or_else(|| InventoryError::not_found("Food", id))
}

fn ensure_positive(quantity: i32) -> Result<(), InventoryError> {
    if quantity <= 0 {
        return Err(InventoryError::InvalidQuantity(format!(
            "quantity must be positive, got {quantity}"
        )));
    }
    Ok(())
}

/// The merge primitive every path funnels through.
///
/// The shelf-life date is only computed here; the repository ignores it when
/// the entry already exists.
async fn merge_into(
    txn: &DatabaseTransaction,
    now: DateTime<Utc>,
    container: ContainerId,
    food: &CatalogFood,
    quantity: i32,
    explicit: Option<NaiveDate>,
    is_frozen: bool,
) -> Result<(Entry, bool), InventoryError> {
    ensure_positive(quantity)?;

    let expiration = explicit
        .unwrap_or_else(|| compute_expiration(food.category, is_frozen, now.date_naive()));

    let new = NewEntry {
        container_id: container,
        food_id: food.id,
        quantity,
        added_at: now.to_rfc3339(),
        expiration_date: Some(expiration),
        is_frozen,
    };

    EntryRepository::new(txn).merge(&new).await?.ok_or_else(|| {
        InventoryError::InvalidQuantity(format!(
            "adding {quantity} would exceed the largest storable quantity"
        ))
    })
}

async fn add_in(
    txn: &DatabaseTransaction,
    now: DateTime<Utc>,
    owner: OwnerId,
    item: &AddItem,
) -> Result<(Entry, bool), InventoryError> {
    ensure_positive(item.quantity)?;

    let container = owned_container(txn, owner, item.container).await?;
    let food = catalog_food(txn, item.food).await?;
    let is_frozen = item.is_frozen.unwrap_or_else(|| container.kind.is_freezer());

    merge_into(
        txn,
        now,
        container.id,
        &food,
        item.quantity,
        item.expiration_date,
        is_frozen,
    )
    .await
}

/// Decrements the source first so the stock check and the write happen in
/// one conditional statement, then merges into the target.
async fn move_in(
    txn: &DatabaseTransaction,
    now: DateTime<Utc>,
    owner: OwnerId,
    entry: EntryId,
    target: ContainerId,
    quantity: Option<i32>,
    explicit: Option<NaiveDate>,
) -> Result<MoveOutcome, InventoryError> {
    if let Some(quantity) = quantity {
        ensure_positive(quantity)?;
    }

    let (source, _) = owned_entry(txn, owner, entry).await?;
    let quantity = quantity.unwrap_or(source.quantity);
    if quantity > source.quantity {
        return Err(InventoryError::InvalidQuantity(format!(
            "cannot move {quantity}, only {} available",
            source.quantity
        )));
    }

    let target = owned_container(txn, owner, target).await?;
    if target.id == source.container_id {
        return Err(InventoryError::Validation(
            "Item is already in that container".to_string(),
        ));
    }

    let food = catalog_food(txn, source.food_id).await?;

    let remaining = EntryRepository::new(txn)
        .take(source.id, quantity)
        .await?
        .ok_or_else(|| {
            InventoryError::InvalidQuantity(format!(
                "cannot move {quantity}, stock changed concurrently"
            ))
        })?;

    let (target_entry, created) = merge_into(
        txn,
        now,
        target.id,
        &food,
        quantity,
        explicit,
        target.kind.is_freezer(),
    )
    .await?;

    Ok(MoveOutcome {
        source_id: source.id,
        source_remaining: remaining,
        moved: quantity,
        target: target_entry,
        created,
    })
}

async fn delete_in(
    txn: &DatabaseTransaction,
    now: DateTime<Utc>,
    owner: OwnerId,
    entry: EntryId,
    requeue: bool,
) -> Result<Option<bool>, InventoryError> {
    let (entry, container) = owned_entry(txn, owner, entry).await?;
    let stamp = now.to_rfc3339();

    let mut created = None;
    if requeue {
        if container.kind.is_shopping() {
            return Err(InventoryError::Validation(
                "Item is already on the shopping list".to_string(),
            ));
        }
        let shopping = ContainerRepository::new(txn)
            .shopping_list(owner, &stamp)
            .await?;
        let food = catalog_food(txn, entry.food_id).await?;
        let (_, was_created) =
            merge_into(txn, now, shopping.id, &food, entry.quantity, None, false).await?;
        created = Some(was_created);
    }

    if !EntryRepository::new(txn).delete(entry.id).await? {
        return Err(InventoryError::not_found("Item", entry.id));
    }

    Ok(created)
}

async fn update_in(
    txn: &DatabaseTransaction,
    today: NaiveDate,
    owner: OwnerId,
    entry: EntryId,
    update: &EntryUpdate,
) -> Result<Entry, InventoryError> {
    let (mut entry, container) = owned_entry(txn, owner, entry).await?;

    if let Some(quantity) = update.quantity {
        if quantity < 1 {
            return Err(InventoryError::InvalidQuantity(
                "quantity must be at least 1".to_string(),
            ));
        }
        entry.quantity = quantity;
    }

    if let Some(checked) = update.checked_off {
        if checked && !container.kind.is_shopping() {
            return Err(InventoryError::Validation(
                "Only shopping list items can be checked off".to_string(),
            ));
        }
        entry.checked_off = checked;
    }

    if let Some(frozen) = update.is_frozen {
        entry.is_frozen = frozen;
    }

    match update.expiration {
        ExpirationChange::Keep => {}
        ExpirationChange::Set(date) => entry.expiration_date = Some(date),
        ExpirationChange::Recompute => {
            let food = catalog_food(txn, entry.food_id).await?;
            let reference = entry.added_on().unwrap_or(today);
            entry.expiration_date =
                Some(compute_expiration(food.category, entry.is_frozen, reference));
        }
    }

    Ok(EntryRepository::new(txn).save(&entry).await?)
}

async fn toggle_in(
    txn: &DatabaseTransaction,
    owner: OwnerId,
    entry: EntryId,
) -> Result<Entry, InventoryError> {
    let (mut entry, container) = owned_entry(txn, owner, entry).await?;
    if !container.kind.is_shopping() {
        return Err(InventoryError::Validation(
            "Only shopping list items can be checked off".to_string(),
        ));
    }

    entry.checked_off = !entry.checked_off;
    Ok(EntryRepository::new(txn).save(&entry).await?)
}

async fn add_shopping_in(
    txn: &DatabaseTransaction,
    now: DateTime<Utc>,
    owner: OwnerId,
    foods: &[FoodId],
) -> Result<(Vec<(Entry, bool)>, Vec<FoodId>, u64), InventoryError> {
    let stamp = now.to_rfc3339();
    let containers = ContainerRepository::new(txn);
    let shopping = containers.shopping_list(owner, &stamp).await?;

    let known: Vec<CatalogFood> = CatalogRepository::new(txn).get_many(foods).await?;

    let mut added = Vec::new();
    let mut skipped = Vec::new();
    for id in foods {
        match known.iter().find(|f| f.id == *id) {
            Some(food) => added.push(merge_into(txn, now, shopping.id, food, 1, None, false).await?),
            None => skipped.push(*id),
        }
    }

    let count = containers.entry_count(shopping.id).await?;
    Ok((added, skipped, count))
}

async fn clear_checked_in(
    txn: &DatabaseTransaction,
    now: DateTime<Utc>,
    owner: OwnerId,
    entries: Option<&[EntryId]>,
) -> Result<ClearCheckedOutcome, InventoryError> {
    let containers = ContainerRepository::new(txn);
    let shopping = containers.shopping_list(owner, &now.to_rfc3339()).await?;

    let removed = EntryRepository::new(txn)
        .delete_checked(shopping.id, entries)
        .await?;
    let shopping_list_count = containers.entry_count(shopping.id).await?;

    Ok(ClearCheckedOutcome {
        removed,
        shopping_list_count,
    })
}

fn dedup_preserving_order<T: Copy + Eq + std::hash::Hash>(ids: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

#[async_trait]
impl InventoryService for SeaOrmInventoryService {
    async fn add_or_merge(
        &self,
        owner: OwnerId,
        item: AddItem,
    ) -> Result<AddOutcome, InventoryError> {
        ensure_positive(item.quantity)?;

        let now = self.clock.now();
        let item = &item;
        let (entry, created) = self
            .run_atomic("add_or_merge", |txn| async move {
                let result = add_in(&txn, now, owner, item).await;
                (txn, result)
            })
            .await?;

        record_merge(created);
        debug!(
            "{} entry {} (food {}, quantity now {})",
            if created { "Created" } else { "Merged into" },
            entry.id,
            entry.food_id,
            entry.quantity
        );

        Ok(AddOutcome { entry, created })
    }

    async fn move_entry(
        &self,
        owner: OwnerId,
        item: MoveItem,
    ) -> Result<MoveOutcome, InventoryError> {
        ensure_positive(item.quantity)?;
        self.move_one(
            owner,
            item.entry,
            item.target,
            Some(item.quantity),
            item.expiration_date,
        )
        .await
    }

    async fn batch_move(
        &self,
        owner: OwnerId,
        entries: Vec<EntryId>,
        target: ContainerId,
    ) -> Result<BatchMoveReport, InventoryError> {
        if entries.is_empty() {
            return Err(InventoryError::Validation(
                "No items selected".to_string(),
            ));
        }

        if self
            .store
            .containers()
            .get_for_owner(owner, target)
            .await?
            .is_none()
        {
            return Err(InventoryError::not_found("Container", target));
        }

        let mut report = BatchMoveReport::default();
        for entry in dedup_preserving_order(entries) {
            match self.move_one(owner, entry, target, None, None).await {
                Ok(_) => report.moved.push(entry),
                Err(err) => {
                    debug!("Batch move skipped entry {}: {}", entry, err);
                    report.failed.push(BatchMoveFailure {
                        item_id: entry,
                        error: err.to_string(),
                    });
                }
            }
        }

        info!(
            "Batch move into container {}: {} moved, {} failed",
            target,
            report.moved.len(),
            report.failed.len()
        );
        Ok(report)
    }

    async fn delete_entry(
        &self,
        owner: OwnerId,
        entry: EntryId,
        requeue_to_shopping: bool,
    ) -> Result<DeleteOutcome, InventoryError> {
        let now = self.clock.now();
        let requeued = self
            .run_atomic("delete", |txn| async move {
                let result = delete_in(&txn, now, owner, entry, requeue_to_shopping).await;
                (txn, result)
            })
            .await?;

        metrics::counter!("larder_entries_deleted_total").increment(1);
        if let Some(created) = requeued {
            record_merge(created);
        }
        info!(
            "Deleted entry {}{}",
            entry,
            if requeued.is_some() { " (requeued to shopping list)" } else { "" }
        );

        Ok(DeleteOutcome {
            requeued: requeued.is_some(),
            shopping_list_count: self.shopping_count(owner).await?,
        })
    }

    async fn update_entry(
        &self,
        owner: OwnerId,
        entry: EntryId,
        update: EntryUpdate,
    ) -> Result<Entry, InventoryError> {
        let today = self.clock.today();
        let update = &update;
        self.run_atomic("update", |txn| async move {
            let result = update_in(&txn, today, owner, entry, update).await;
            (txn, result)
        })
        .await
    }

    async fn add_foods_to_shopping_list(
        &self,
        owner: OwnerId,
        foods: Vec<FoodId>,
    ) -> Result<ShoppingAddReport, InventoryError> {
        if foods.is_empty() {
            return Err(InventoryError::Validation("No foods selected".to_string()));
        }

        let now = self.clock.now();
        let foods = dedup_preserving_order(foods);
        let foods = foods.as_slice();
        let (added, skipped, shopping_list_count) = self
            .run_atomic("shopping_add", |txn| async move {
                let result = add_shopping_in(&txn, now, owner, foods).await;
                (txn, result)
            })
            .await?;

        for (_, created) in &added {
            record_merge(*created);
        }
        if !skipped.is_empty() {
            debug!("Skipped unknown foods {:?}", skipped);
        }

        Ok(ShoppingAddReport {
            added: added.into_iter().map(|(entry, _)| entry).collect(),
            skipped,
            shopping_list_count,
        })
    }

    async fn toggle_checked(
        &self,
        owner: OwnerId,
        entry: EntryId,
    ) -> Result<Entry, InventoryError> {
        self.run_atomic("toggle_checked", |txn| async move {
            let result = toggle_in(&txn, owner, entry).await;
            (txn, result)
        })
        .await
    }

    async fn clear_checked(
        &self,
        owner: OwnerId,
        entries: Option<Vec<EntryId>>,
    ) -> Result<ClearCheckedOutcome, InventoryError> {
        if entries.as_ref().is_some_and(Vec::is_empty) {
            return Err(InventoryError::Validation("No items selected".to_string()));
        }

        let now = self.clock.now();
        let entries = entries.as_deref();
        let outcome = self
            .run_atomic("clear_checked", |txn| async move {
                let result = clear_checked_in(&txn, now, owner, entries).await;
                (txn, result)
            })
            .await?;

        metrics::counter!("larder_entries_deleted_total").increment(outcome.removed);
        info!("Cleared {} checked shopping list items", outcome.removed);
        Ok(outcome)
    }

    async fn expiring(
        &self,
        owner: OwnerId,
        within_days: i64,
    ) -> Result<Vec<ExpiringEntry>, InventoryError> {
        let days = u64::try_from(within_days).map_err(|_| {
            InventoryError::Validation("days must not be negative".to_string())
        })?;

        let today = self.clock.today();
        let until = today.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX);

        let stocked: Vec<Container> = self
            .store
            .containers()
            .list_for_owner(owner)
            .await?
            .into_iter()
            .filter(|c| !c.kind.is_shopping())
            .collect();
        let ids: Vec<ContainerId> = stocked.iter().map(|c| c.id).collect();

        let items = self
            .store
            .entries()
            .list_for_containers(&ids, Some(until))
            .await?;

        Ok(items
            .into_iter()
            .map(|item| {
                let container_name = stocked
                    .iter()
                    .find(|c| c.id == item.entry.container_id)
                    .map(|c| c.name.clone())
                    .unwrap_or_default();
                let freshness = Freshness::evaluate(
                    item.entry.expiration_date,
                    today,
                    self.config.expiring_soon_days,
                );
                ExpiringEntry {
                    item,
                    container_name,
                    freshness,
                }
            })
            .collect())
    }
}
