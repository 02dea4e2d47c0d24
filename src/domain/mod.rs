//! Domain types for the food inventory with strong typing.
//!
//! Ids are newtypes so a container id can never be passed where an entry id
//! is expected. Categories and container kinds are closed enums stored as
//! lower-case strings in the database.

pub mod expiration;

pub use expiration::{Freshness, FreshnessStatus, compute_expiration, shelf_life_days};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

macro_rules! id_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            #[must_use]
            pub const fn value(&self) -> i32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self::new(id)
            }
        }
    };
}

id_newtype!(
    /// Authenticated owner of containers. Opaque to the inventory core.
    OwnerId
);
id_newtype!(ContainerId);
id_newtype!(EntryId);
id_newtype!(
    /// Identifier of a shared catalog food.
    FoodId
);

/// Catalog food category. Drives the default shelf life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodCategory {
    Dairy,
    Meat,
    Seafood,
    Vegetables,
    Fruits,
    Grains,
    Condiments,
    Beverages,
    Leftovers,
    #[default]
    Other,
}

impl FoodCategory {
    pub const ALL: [Self; 10] = [
        Self::Dairy,
        Self::Meat,
        Self::Seafood,
        Self::Vegetables,
        Self::Fruits,
        Self::Grains,
        Self::Condiments,
        Self::Beverages,
        Self::Leftovers,
        Self::Other,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Dairy => "dairy",
            Self::Meat => "meat",
            Self::Seafood => "seafood",
            Self::Vegetables => "vegetables",
            Self::Fruits => "fruits",
            Self::Grains => "grains",
            Self::Condiments => "condiments",
            Self::Beverages => "beverages",
            Self::Leftovers => "leftovers",
            Self::Other => "other",
        }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Dairy => "Dairy",
            Self::Meat => "Meat & Poultry",
            Self::Seafood => "Seafood",
            Self::Vegetables => "Vegetables",
            Self::Fruits => "Fruits",
            Self::Grains => "Grains & Bread",
            Self::Condiments => "Condiments & Sauces",
            Self::Beverages => "Beverages",
            Self::Leftovers => "Leftovers",
            Self::Other => "Other",
        }
    }

    /// Lenient parse used for stored values and import files.
    ///
    /// Accepts any casing plus the singular spellings found in catalog
    /// dumps (`FRUIT`, `GRAIN`, ...). Unknown names fall back to `Other`.
    #[must_use]
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "dairy" => Self::Dairy,
            "meat" | "poultry" => Self::Meat,
            "seafood" | "fish" => Self::Seafood,
            "vegetables" | "vegetable" => Self::Vegetables,
            "fruits" | "fruit" => Self::Fruits,
            "grains" | "grain" | "bread" => Self::Grains,
            "condiments" | "condiment" | "sauce" | "sauces" => Self::Condiments,
            "beverages" | "beverage" | "drink" | "drinks" => Self::Beverages,
            "leftovers" | "leftover" => Self::Leftovers,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for FoodCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of storage container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerKind {
    Fridge,
    Freezer,
    Pantry,
    Shopping,
}

impl ContainerKind {
    /// Containers every owner gets on sign-up, with their display names.
    pub const DEFAULTS: [(Self, &'static str); 4] = [
        (Self::Fridge, "Fridge"),
        (Self::Freezer, "Freezer"),
        (Self::Pantry, "Pantry"),
        (Self::Shopping, "Shopping List"),
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fridge => "fridge",
            Self::Freezer => "freezer",
            Self::Pantry => "pantry",
            Self::Shopping => "shopping",
        }
    }

    #[must_use]
    pub const fn is_freezer(&self) -> bool {
        matches!(self, Self::Freezer)
    }

    #[must_use]
    pub const fn is_shopping(&self) -> bool {
        matches!(self, Self::Shopping)
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown container type '{0}'. Expected fridge, freezer, pantry or shopping")]
pub struct UnknownContainerKind(pub String);

impl FromStr for ContainerKind {
    type Err = UnknownContainerKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fridge" => Ok(Self::Fridge),
            "freezer" => Ok(Self::Freezer),
            "pantry" => Ok(Self::Pantry),
            "shopping" | "shopping-list" | "shopping_list" => Ok(Self::Shopping),
            _ => Err(UnknownContainerKind(s.to_string())),
        }
    }
}

/// Source of the current time for entry timestamps.
///
/// The expiration policy never reads the clock; the mutator asks a `Clock`
/// for the creation instant and hands its date to the policy.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Midnight UTC on the given day.
    #[must_use]
    pub fn on(date: NaiveDate) -> Self {
        Self(date.and_time(chrono::NaiveTime::MIN).and_utc())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
