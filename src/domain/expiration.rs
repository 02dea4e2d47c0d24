//! Shelf-life rules.
//!
//! Pure functions only: every date is computed from an explicit reference
//! date so callers decide what "today" means.

use chrono::{Days, NaiveDate};
use serde::Serialize;

use super::FoodCategory;

const FROZEN_MEAT_DAYS: u64 = 182;

/// Default shelf life in days for a category, honoring the frozen override.
#[must_use]
pub const fn shelf_life_days(category: FoodCategory, is_frozen: bool) -> u64 {
    match category {
        FoodCategory::Dairy => 14,
        FoodCategory::Seafood => 4,
        FoodCategory::Meat if is_frozen => FROZEN_MEAT_DAYS,
        FoodCategory::Meat | FoodCategory::Vegetables | FoodCategory::Fruits => 7,
        FoodCategory::Grains | FoodCategory::Other => 28,
        FoodCategory::Condiments => 84,
        FoodCategory::Beverages => 56,
        FoodCategory::Leftovers => 3,
    }
}

/// Expiration date for a newly stored item.
///
/// Only meat looks at `is_frozen`.
#[must_use]
pub fn compute_expiration(
    category: FoodCategory,
    is_frozen: bool,
    reference_date: NaiveDate,
) -> NaiveDate {
    let days = Days::new(shelf_life_days(category, is_frozen));
    reference_date
        .checked_add_days(days)
        .unwrap_or(NaiveDate::MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FreshnessStatus {
    Fresh,
    Warning,
    Expired,
}

/// Display-side view of an entry's expiration relative to a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Freshness {
    pub days_until_expiration: Option<i64>,
    pub is_expired: bool,
    pub expires_soon: bool,
    pub status: FreshnessStatus,
}

impl Freshness {
    #[must_use]
    pub fn evaluate(expiration: Option<NaiveDate>, today: NaiveDate, soon_days: i64) -> Self {
        let Some(expiration) = expiration else {
            return Self {
                days_until_expiration: None,
                is_expired: false,
                expires_soon: false,
                status: FreshnessStatus::Fresh,
            };
        };

        let days = (expiration - today).num_days();
        let is_expired = days < 0;
        let expires_soon = (0..=soon_days).contains(&days);
        let status = if is_expired {
            FreshnessStatus::Expired
        } else if expires_soon {
            FreshnessStatus::Warning
        } else {
            FreshnessStatus::Fresh
        };

        Self {
            days_until_expiration: Some(days),
            is_expired,
            expires_soon,
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn dairy_lasts_two_weeks() {
        assert_eq!(
            compute_expiration(FoodCategory::Dairy, false, date(2024, 1, 1)),
            date(2024, 1, 15)
        );
    }

    #[test]
    fn meat_depends_on_frozen_flag() {
        let d = date(2024, 1, 1);
        assert_eq!(
            compute_expiration(FoodCategory::Meat, false, d),
            date(2024, 1, 8)
        );
        assert_eq!(
            compute_expiration(FoodCategory::Meat, true, d),
            d + Days::new(182)
        );
    }

    #[test]
    fn frozen_flag_only_matters_for_meat() {
        let d = date(2024, 6, 30);
        for category in FoodCategory::ALL {
            if category == FoodCategory::Meat {
                continue;
            }
            assert_eq!(
                compute_expiration(category, false, d),
                compute_expiration(category, true, d),
                "{category} changed with frozen flag"
            );
        }
    }

    #[test]
    fn rule_table_offsets() {
        let d = date(2024, 2, 1);
        let expected = [
            (FoodCategory::Seafood, 4),
            (FoodCategory::Vegetables, 7),
            (FoodCategory::Fruits, 7),
            (FoodCategory::Grains, 28),
            (FoodCategory::Condiments, 84),
            (FoodCategory::Beverages, 56),
            (FoodCategory::Leftovers, 3),
            (FoodCategory::Other, 28),
        ];
        for (category, days) in expected {
            assert_eq!(
                compute_expiration(category, false, d),
                d + Days::new(days),
                "{category}"
            );
        }
    }

    #[test]
    fn crosses_leap_day() {
        assert_eq!(
            compute_expiration(FoodCategory::Leftovers, false, date(2024, 2, 28)),
            date(2024, 3, 2)
        );
    }

    #[test]
    fn freshness_without_date_is_fresh() {
        let f = Freshness::evaluate(None, date(2024, 1, 1), 3);
        assert_eq!(f.status, FreshnessStatus::Fresh);
        assert!(!f.is_expired);
        assert!(!f.expires_soon);
        assert_eq!(f.days_until_expiration, None);
    }

    #[test]
    fn freshness_boundaries() {
        let today = date(2024, 1, 10);

        let expired = Freshness::evaluate(Some(date(2024, 1, 9)), today, 3);
        assert_eq!(expired.status, FreshnessStatus::Expired);
        assert_eq!(expired.days_until_expiration, Some(-1));

        let today_exp = Freshness::evaluate(Some(today), today, 3);
        assert_eq!(today_exp.status, FreshnessStatus::Warning);

        let edge = Freshness::evaluate(Some(date(2024, 1, 13)), today, 3);
        assert!(edge.expires_soon);

        let fresh = Freshness::evaluate(Some(date(2024, 1, 14)), today, 3);
        assert_eq!(fresh.status, FreshnessStatus::Fresh);
    }
}
