use chrono::{DateTime, NaiveDate};
use serde::Serialize;

use super::CatalogFood;
use crate::domain::{ContainerId, EntryId, FoodId, Freshness};
use crate::entities::container_entries;

/// Quantity record linking one catalog food to one container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub id: EntryId,
    pub container_id: ContainerId,
    pub food_id: FoodId,
    pub quantity: i32,
    pub added_at: String,
    pub expiration_date: Option<NaiveDate>,
    pub checked_off: bool,
    pub is_frozen: bool,
}

impl From<container_entries::Model> for Entry {
    fn from(m: container_entries::Model) -> Self {
        Self {
            id: EntryId::new(m.id),
            container_id: ContainerId::new(m.container_id),
            food_id: FoodId::new(m.catalog_food_id),
            quantity: m.quantity,
            added_at: m.added_at,
            expiration_date: m.expiration_date,
            checked_off: m.checked_off,
            is_frozen: m.is_frozen,
        }
    }
}

impl Entry {
    /// Calendar day the entry was created, if `added_at` is a valid RFC 3339 stamp.
    #[must_use]
    pub fn added_on(&self) -> Option<NaiveDate> {
        DateTime::parse_from_rfc3339(&self.added_at)
            .ok()
            .map(|stamp| stamp.date_naive())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EntryWithFood {
    #[serde(flatten)]
    pub entry: Entry,
    pub food: CatalogFood,
}

/// Row written by the merge path when no entry exists yet.
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub container_id: ContainerId,
    pub food_id: FoodId,
    pub quantity: i32,
    pub added_at: String,
    pub expiration_date: Option<NaiveDate>,
    pub is_frozen: bool,
}

/// Entry as shown in a container listing.
#[derive(Debug, Clone, Serialize)]
pub struct EntryView {
    #[serde(flatten)]
    pub item: EntryWithFood,
    pub freshness: Freshness,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(added_at: &str) -> Entry {
        Entry {
            id: EntryId::new(1),
            container_id: ContainerId::new(1),
            food_id: FoodId::new(1),
            quantity: 1,
            added_at: added_at.to_string(),
            expiration_date: None,
            checked_off: false,
            is_frozen: false,
        }
    }

    #[test]
    fn added_on_reads_the_stamp_date() {
        assert_eq!(
            entry("2024-03-01T18:30:00+00:00").added_on(),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
        assert_eq!(entry("yesterday").added_on(), None);
    }
}
