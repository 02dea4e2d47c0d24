//! Integration tests for the inventory mutator against a temporary SQLite file.

use chrono::NaiveDate;
use larder::config::Config;
use larder::db::Store;
use larder::domain::{ContainerId, ContainerKind, FixedClock, FoodCategory, FoodId, OwnerId};
use larder::models::NewCatalogFood;
use larder::services::{
    AddItem, EntryUpdate, ExpirationChange, InventoryError, MoveItem,
};
use larder::state::SharedState;
use std::sync::Arc;

struct Kitchen {
    state: SharedState,
    owner: OwnerId,
    fridge: ContainerId,
    freezer: ContainerId,
    pantry: ContainerId,
    shopping: ContainerId,
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
}

async fn spawn_kitchen() -> Kitchen {
    let db_path =
        std::env::temp_dir().join(format!("larder-inventory-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());
    config.inventory.max_transaction_retries = 20;
    config.inventory.retry_backoff_ms = 5;

    let store = Store::new(&config.general.database_path)
        .await
        .expect("Failed to open store");
    let state = SharedState::from_store(config, store, Arc::new(FixedClock::on(today())));

    let login = state
        .auth
        .register("alice", "correct-horse")
        .await
        .expect("Failed to register user");

    let mut kitchen = Kitchen {
        state,
        owner: login.id,
        fridge: ContainerId::default(),
        freezer: ContainerId::default(),
        pantry: ContainerId::default(),
        shopping: ContainerId::default(),
    };

    for summary in kitchen.state.containers.list(kitchen.owner).await.unwrap() {
        let id = summary.container.id;
        match summary.container.kind {
            ContainerKind::Fridge => kitchen.fridge = id,
            ContainerKind::Freezer => kitchen.freezer = id,
            ContainerKind::Pantry => kitchen.pantry = id,
            ContainerKind::Shopping => kitchen.shopping = id,
        }
    }

    kitchen
}

impl Kitchen {
    async fn food(&self, name: &str, category: FoodCategory) -> FoodId {
        self.state
            .catalog
            .create(None, NewCatalogFood::new(name, category, ""))
            .await
            .expect("Failed to create food")
            .id
    }

    async fn add(&self, container: ContainerId, food: FoodId, quantity: i32) -> larder::models::Entry {
        self.state
            .inventory
            .add_or_merge(
                self.owner,
                AddItem {
                    container,
                    food,
                    quantity,
                    expiration_date: None,
                    is_frozen: None,
                },
            )
            .await
            .expect("add_or_merge failed")
            .entry
    }

    async fn entries_in(&self, container: ContainerId) -> Vec<larder::models::Entry> {
        self.state
            .store
            .entries()
            .list_for_container(container)
            .await
            .unwrap()
            .into_iter()
            .map(|item| item.entry)
            .collect()
    }
}

#[tokio::test]
async fn adding_the_same_food_twice_merges_into_one_entry() {
    let k = spawn_kitchen().await;
    let milk = k.food("Milk", FoodCategory::Dairy).await;

    let first = k.add(k.fridge, milk, 3).await;
    let second = k.add(k.fridge, milk, 3).await;

    assert_eq!(first.id, second.id);
    assert_eq!(second.quantity, 6);

    let entries = k.entries_in(k.fridge).await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].quantity, 6);
    assert_eq!(
        entries[0].expiration_date,
        NaiveDate::from_ymd_opt(2024, 3, 15)
    );
}

#[tokio::test]
async fn merge_keeps_the_original_expiration_date() {
    let k = spawn_kitchen().await;
    let cheese = k.food("Cheddar", FoodCategory::Dairy).await;
    let early = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();

    k.state
        .inventory
        .add_or_merge(
            k.owner,
            AddItem {
                container: k.fridge,
                food: cheese,
                quantity: 1,
                expiration_date: Some(early),
                is_frozen: None,
            },
        )
        .await
        .unwrap();
    let merged = k.add(k.fridge, cheese, 2).await;

    assert_eq!(merged.quantity, 3);
    assert_eq!(merged.expiration_date, Some(early));
}

#[tokio::test]
async fn concurrent_adds_sum_into_a_single_entry() {
    let k = Arc::new(spawn_kitchen().await);
    let rice = k.food("Rice", FoodCategory::Grains).await;

    let mut handles = Vec::new();
    for _ in 0..6 {
        let k = k.clone();
        handles.push(tokio::spawn(async move {
            k.state
                .inventory
                .add_or_merge(
                    k.owner,
                    AddItem {
                        container: k.pantry,
                        food: rice,
                        quantity: 2,
                        expiration_date: None,
                        is_frozen: None,
                    },
                )
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().expect("concurrent add failed");
    }

    let entries = k.entries_in(k.pantry).await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].quantity, 12);
}

#[tokio::test]
async fn add_rejects_non_positive_quantities_and_foreign_containers() {
    let k = spawn_kitchen().await;
    let milk = k.food("Milk", FoodCategory::Dairy).await;

    let err = k
        .state
        .inventory
        .add_or_merge(
            k.owner,
            AddItem {
                container: k.fridge,
                food: milk,
                quantity: 0,
                expiration_date: None,
                is_frozen: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, InventoryError::InvalidQuantity(_)));

    let bob = k.state.auth.register("bob", "battery-staple").await.unwrap();
    let err = k
        .state
        .inventory
        .add_or_merge(
            bob.id,
            AddItem {
                container: k.fridge,
                food: milk,
                quantity: 1,
                expiration_date: None,
                is_frozen: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, InventoryError::NotFound(_)));
    assert!(k.entries_in(k.fridge).await.is_empty());
}

#[tokio::test]
async fn moving_the_full_quantity_deletes_the_source() {
    let k = spawn_kitchen().await;
    let carrots = k.food("Carrots", FoodCategory::Vegetables).await;
    let source = k.add(k.pantry, carrots, 5).await;

    let outcome = k
        .state
        .inventory
        .move_entry(
            k.owner,
            MoveItem {
                entry: source.id,
                target: k.fridge,
                quantity: 5,
                expiration_date: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(outcome.source_remaining, 0);
    assert_eq!(outcome.target.quantity, 5);
    assert!(k.entries_in(k.pantry).await.is_empty());
    assert_eq!(k.entries_in(k.fridge).await.len(), 1);
}

#[tokio::test]
async fn moving_more_than_available_leaves_the_source_untouched() {
    let k = spawn_kitchen().await;
    let carrots = k.food("Carrots", FoodCategory::Vegetables).await;
    let source = k.add(k.pantry, carrots, 5).await;

    let err = k
        .state
        .inventory
        .move_entry(
            k.owner,
            MoveItem {
                entry: source.id,
                target: k.fridge,
                quantity: 6,
                expiration_date: None,
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, InventoryError::InvalidQuantity(_)));
    let pantry = k.entries_in(k.pantry).await;
    assert_eq!(pantry.len(), 1);
    assert_eq!(pantry[0].quantity, 5);
    assert!(k.entries_in(k.fridge).await.is_empty());
}

#[tokio::test]
async fn partial_move_merges_into_an_existing_target_entry() {
    let k = spawn_kitchen().await;
    let apples = k.food("Apples", FoodCategory::Fruits).await;
    let source = k.add(k.pantry, apples, 5).await;
    k.add(k.fridge, apples, 1).await;

    let outcome = k
        .state
        .inventory
        .move_entry(
            k.owner,
            MoveItem {
                entry: source.id,
                target: k.fridge,
                quantity: 2,
                expiration_date: None,
            },
        )
        .await
        .unwrap();

    assert!(!outcome.created);
    assert_eq!(outcome.source_remaining, 3);
    assert_eq!(outcome.target.quantity, 3);
    assert_eq!(k.entries_in(k.fridge).await.len(), 1);
}

#[tokio::test]
async fn moving_into_a_freezer_marks_the_entry_frozen() {
    let k = spawn_kitchen().await;
    let beef = k.food("Ground Beef", FoodCategory::Meat).await;
    let source = k.add(k.fridge, beef, 2).await;
    assert!(!source.is_frozen);

    let outcome = k
        .state
        .inventory
        .move_entry(
            k.owner,
            MoveItem {
                entry: source.id,
                target: k.freezer,
                quantity: 2,
                expiration_date: None,
            },
        )
        .await
        .unwrap();

    assert!(outcome.target.is_frozen);
    assert_eq!(
        outcome.target.expiration_date,
        NaiveDate::from_ymd_opt(2024, 8, 30)
    );
}

#[tokio::test]
async fn shopping_milk_moves_into_the_fridge_with_a_fresh_date() {
    let k = spawn_kitchen().await;
    let milk = k.food("Milk", FoodCategory::Dairy).await;
    let wanted = k.add(k.shopping, milk, 2).await;

    let outcome = k
        .state
        .inventory
        .move_entry(
            k.owner,
            MoveItem {
                entry: wanted.id,
                target: k.fridge,
                quantity: 2,
                expiration_date: None,
            },
        )
        .await
        .unwrap();

    assert!(outcome.created);
    let fridge = k.entries_in(k.fridge).await;
    assert_eq!(fridge.len(), 1);
    assert_eq!(fridge[0].food_id, milk);
    assert_eq!(fridge[0].quantity, 2);
    assert_eq!(fridge[0].expiration_date, NaiveDate::from_ymd_opt(2024, 3, 15));
    assert!(k.entries_in(k.shopping).await.is_empty());
}

#[tokio::test]
async fn requeue_merges_into_the_existing_shopping_entry() {
    let k = spawn_kitchen().await;
    let eggs = k.food("Eggs", FoodCategory::Dairy).await;
    k.add(k.shopping, eggs, 1).await;
    let stocked = k.add(k.fridge, eggs, 4).await;

    let outcome = k
        .state
        .inventory
        .delete_entry(k.owner, stocked.id, true)
        .await
        .unwrap();

    assert!(outcome.requeued);
    assert_eq!(outcome.shopping_list_count, 1);

    let shopping = k.entries_in(k.shopping).await;
    assert_eq!(shopping.len(), 1);
    assert_eq!(shopping[0].quantity, 5);
    assert!(k.entries_in(k.fridge).await.is_empty());
}

#[tokio::test]
async fn plain_delete_does_not_touch_the_shopping_list() {
    let k = spawn_kitchen().await;
    let eggs = k.food("Eggs", FoodCategory::Dairy).await;
    let stocked = k.add(k.fridge, eggs, 4).await;

    let outcome = k
        .state
        .inventory
        .delete_entry(k.owner, stocked.id, false)
        .await
        .unwrap();

    assert!(!outcome.requeued);
    assert_eq!(outcome.shopping_list_count, 0);
    assert!(k.entries_in(k.fridge).await.is_empty());

    let err = k
        .state
        .inventory
        .delete_entry(k.owner, stocked.id, false)
        .await
        .unwrap_err();
    assert!(matches!(err, InventoryError::NotFound(_)));
}

#[tokio::test]
async fn batch_move_reports_per_item_results() {
    let k = spawn_kitchen().await;
    let bread = k.food("Bread", FoodCategory::Grains).await;
    let salmon = k.food("Salmon", FoodCategory::Seafood).await;
    let bread_entry = k.add(k.pantry, bread, 2).await;
    let salmon_entry = k.add(k.fridge, salmon, 3).await;

    let report = k
        .state
        .inventory
        .batch_move(
            k.owner,
            vec![bread_entry.id, salmon_entry.id, bread_entry.id, larder::domain::EntryId::new(9999)],
            k.freezer,
        )
        .await
        .unwrap();

    assert_eq!(report.moved, vec![bread_entry.id, salmon_entry.id]);
    assert_eq!(report.failed.len(), 1);

    let freezer = k.entries_in(k.freezer).await;
    assert_eq!(freezer.len(), 2);
    assert!(freezer.iter().all(|e| e.is_frozen));
    assert_eq!(freezer.iter().map(|e| e.quantity).sum::<i32>(), 5);
    assert!(k.entries_in(k.pantry).await.is_empty());
}

#[tokio::test]
async fn batch_move_into_an_unknown_container_fails_up_front() {
    let k = spawn_kitchen().await;
    let bread = k.food("Bread", FoodCategory::Grains).await;
    let entry = k.add(k.pantry, bread, 2).await;

    let err = k
        .state
        .inventory
        .batch_move(k.owner, vec![entry.id], ContainerId::new(9999))
        .await
        .unwrap_err();

    assert!(matches!(err, InventoryError::NotFound(_)));
    assert_eq!(k.entries_in(k.pantry).await[0].quantity, 2);
}

#[tokio::test]
async fn update_can_recompute_the_expiration() {
    let k = spawn_kitchen().await;
    let beef = k.food("Steak", FoodCategory::Meat).await;
    let entry = k.add(k.fridge, beef, 1).await;

    let updated = k
        .state
        .inventory
        .update_entry(
            k.owner,
            entry.id,
            EntryUpdate {
                quantity: Some(4),
                is_frozen: Some(true),
                expiration: ExpirationChange::Recompute,
                ..EntryUpdate::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.quantity, 4);
    assert!(updated.is_frozen);
    assert_eq!(updated.expiration_date, NaiveDate::from_ymd_opt(2024, 8, 30));

    let err = k
        .state
        .inventory
        .update_entry(
            k.owner,
            entry.id,
            EntryUpdate {
                checked_off: Some(true),
                ..EntryUpdate::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, InventoryError::Validation(_)));
}

#[tokio::test]
async fn shopping_list_toggle_and_clear() {
    let k = spawn_kitchen().await;
    let milk = k.food("Milk", FoodCategory::Dairy).await;
    let bread = k.food("Bread", FoodCategory::Grains).await;

    let report = k
        .state
        .inventory
        .add_foods_to_shopping_list(k.owner, vec![milk, bread, milk, FoodId::new(9999)])
        .await
        .unwrap();
    assert_eq!(report.added.len(), 2);
    assert_eq!(report.skipped, vec![FoodId::new(9999)]);
    assert_eq!(report.shopping_list_count, 2);

    let milk_entry = report.added.iter().find(|e| e.food_id == milk).unwrap().id;
    let toggled = k.state.inventory.toggle_checked(k.owner, milk_entry).await.unwrap();
    assert!(toggled.checked_off);

    let cleared = k.state.inventory.clear_checked(k.owner, None).await.unwrap();
    assert_eq!(cleared.removed, 1);
    assert_eq!(cleared.shopping_list_count, 1);

    let remaining = k.entries_in(k.shopping).await;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].food_id, bread);
}

#[tokio::test]
async fn expiring_lists_only_stocked_items_inside_the_window() {
    let k = spawn_kitchen().await;
    let fish = k.food("Cod", FoodCategory::Seafood).await;
    let rice = k.food("Rice", FoodCategory::Grains).await;
    let leftovers = k.food("Curry", FoodCategory::Leftovers).await;

    k.add(k.fridge, fish, 1).await;
    k.add(k.pantry, rice, 1).await;
    k.add(k.shopping, leftovers, 1).await;

    let soon = k.state.inventory.expiring(k.owner, 5).await.unwrap();
    assert_eq!(soon.len(), 1);
    assert_eq!(soon[0].item.food.id, fish);
    assert_eq!(soon[0].freshness.days_until_expiration, Some(4));

    let err = k.state.inventory.expiring(k.owner, -1).await.unwrap_err();
    assert!(matches!(err, InventoryError::Validation(_)));
}

#[tokio::test]
async fn clearing_the_date_recomputes_from_the_day_it_was_added() {
    let k = spawn_kitchen().await;
    let milk = k.food("Milk", FoodCategory::Dairy).await;
    let entry = k.add(k.fridge, milk, 1).await;

    let later = SharedState::from_store(
        Config::default(),
        k.state.store.clone(),
        Arc::new(FixedClock::on(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap())),
    );

    let updated = later
        .inventory
        .update_entry(
            k.owner,
            entry.id,
            EntryUpdate {
                expiration: ExpirationChange::Recompute,
                ..EntryUpdate::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.expiration_date, NaiveDate::from_ymd_opt(2024, 3, 15));
}

#[tokio::test]
async fn merge_past_the_quantity_ceiling_is_rejected() {
    let k = spawn_kitchen().await;
    let rice = k.food("Rice", FoodCategory::Grains).await;
    k.add(k.pantry, rice, i32::MAX).await;

    let err = k
        .state
        .inventory
        .add_or_merge(
            k.owner,
            AddItem {
                container: k.pantry,
                food: rice,
                quantity: 1,
                expiration_date: None,
                is_frozen: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, InventoryError::InvalidQuantity(_)));

    let pantry = k.entries_in(k.pantry).await;
    assert_eq!(pantry.len(), 1);
    assert_eq!(pantry[0].quantity, i32::MAX);
}

#[tokio::test]
async fn requeue_from_the_shopping_list_is_rejected() {
    let k = spawn_kitchen().await;
    let bread = k.food("Bread", FoodCategory::Grains).await;
    let wanted = k.add(k.shopping, bread, 1).await;

    let err = k
        .state
        .inventory
        .delete_entry(k.owner, wanted.id, true)
        .await
        .unwrap_err();
    assert!(matches!(err, InventoryError::Validation(_)));

    let shopping = k.entries_in(k.shopping).await;
    assert_eq!(shopping.len(), 1);
    assert_eq!(shopping[0].id, wanted.id);
}

#[tokio::test]
async fn moving_into_the_same_container_is_rejected() {
    let k = spawn_kitchen().await;
    let apples = k.food("Apples", FoodCategory::Fruits).await;
    let entry = k.add(k.fridge, apples, 3).await;

    let err = k
        .state
        .inventory
        .move_entry(
            k.owner,
            MoveItem {
                entry: entry.id,
                target: k.fridge,
                quantity: 1,
                expiration_date: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, InventoryError::Validation(_)));

    let fridge = k.entries_in(k.fridge).await;
    assert_eq!(fridge.len(), 1);
    assert_eq!(fridge[0].quantity, 3);
}

#[tokio::test]
async fn thawing_meat_gets_the_fresh_shelf_life() {
    let k = spawn_kitchen().await;
    let chicken = k.food("Chicken", FoodCategory::Meat).await;
    let frozen = k.add(k.freezer, chicken, 2).await;
    assert!(frozen.is_frozen);

    let outcome = k
        .state
        .inventory
        .move_entry(
            k.owner,
            MoveItem {
                entry: frozen.id,
                target: k.fridge,
                quantity: 2,
                expiration_date: None,
            },
        )
        .await
        .unwrap();

    assert!(outcome.created);
    assert!(!outcome.target.is_frozen);
    assert_eq!(
        outcome.target.expiration_date,
        NaiveDate::from_ymd_opt(2024, 3, 8)
    );
    assert!(k.entries_in(k.freezer).await.is_empty());
}
