use serde::{Deserialize, Serialize};

use crate::domain::{FoodCategory, FoodId, OwnerId};
use crate::entities::catalog_foods;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogFood {
    pub id: FoodId,
    pub name: String,
    pub category: FoodCategory,
    pub description: String,
    pub contributor: Option<OwnerId>,
    pub created_at: String,
}

impl From<catalog_foods::Model> for CatalogFood {
    fn from(m: catalog_foods::Model) -> Self {
        Self {
            id: FoodId::new(m.id),
            name: m.name,
            category: FoodCategory::parse_lenient(&m.category),
            description: m.description,
            contributor: m.contributor_id.map(OwnerId::new),
            created_at: m.created_at,
        }
    }
}

/// Catalog definition as found in seed files and create requests.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewCatalogFood {
    pub name: String,
    #[serde(deserialize_with = "deserialize_category", default)]
    pub category: FoodCategory,
    #[serde(default)]
    pub description: String,
}

fn deserialize_category<'de, D>(deserializer: D) -> Result<FoodCategory, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(FoodCategory::parse_lenient(&raw))
}

impl NewCatalogFood {
    pub fn new(name: impl Into<String>, category: FoodCategory, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category,
            description: description.into(),
        }
    }

    /// Starter catalog offered by `larder catalog seed`.
    #[must_use]
    pub fn samples() -> Vec<Self> {
        use FoodCategory::*;

        [
            ("Chicken Breast", Meat, "Boneless, skinless chicken breast"),
            ("Whole Milk", Dairy, "Fresh whole milk, 3.25% fat"),
            ("Bananas", Fruits, "Fresh yellow bananas"),
            ("Spinach", Vegetables, "Fresh baby spinach leaves"),
            ("White Bread", Grains, "Sliced white bread loaf"),
            ("Cheddar Cheese", Dairy, "Sharp cheddar cheese block"),
            ("Ground Beef", Meat, "80/20 ground beef"),
            ("Apples", Fruits, "Fresh red apples"),
            ("Carrots", Vegetables, "Fresh baby carrots"),
            ("Brown Rice", Grains, "Long grain brown rice"),
            ("Salmon", Seafood, "Fresh Atlantic salmon fillet"),
            ("Eggs", Dairy, "Large grade A eggs"),
            ("Olive Oil", Condiments, "Extra virgin olive oil"),
            ("Black Pepper", Other, "Ground black pepper"),
            ("Orange Juice", Beverages, "Fresh squeezed orange juice"),
        ]
        .into_iter()
        .map(|(name, category, description)| Self::new(name, category, description))
        .collect()
    }
}
