//! Catalog command handlers

use anyhow::Context;
use std::path::Path;

use crate::config::Config;
use crate::models::NewCatalogFood;
use crate::state::SharedState;

/// Reads a JSON array of catalog foods.
pub fn read_seed_file(path: &Path) -> anyhow::Result<Vec<NewCatalogFood>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read seed file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse seed file {}", path.display()))
}

pub async fn cmd_catalog_seed(config: Config, file: Option<&Path>) -> anyhow::Result<()> {
    let foods = match file {
        Some(path) => read_seed_file(path)?,
        None => NewCatalogFood::samples(),
    };

    let state = SharedState::new(config).await?;
    let report = state.catalog.seed(foods).await?;

    println!(
        "✓ Catalog seeded: {} created, {} already present",
        report.created, report.existing
    );
    Ok(())
}

pub async fn cmd_catalog_list(config: Config) -> anyhow::Result<()> {
    let state = SharedState::new(config).await?;
    let foods = state.catalog.list(None, None).await?;

    if foods.is_empty() {
        println!("The catalog is empty.");
        println!();
        println!("Seed it with: larder catalog seed");
        return Ok(());
    }

    println!("Catalog ({} foods)", foods.len());
    println!("{:-<70}", "");
    for food in foods {
        println!("{:>4}  {:<30} {}", food.id, food.name, food.category);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FoodCategory;

    #[test]
    fn seed_file_accepts_loose_categories() {
        let path = std::env::temp_dir().join(format!("larder-seed-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            r#"[{"name": "Oat Milk", "category": "Dairy"}, {"name": "Kimchi", "category": "pickles"}]"#,
        )
        .unwrap();

        let foods = read_seed_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(foods.len(), 2);
        assert_eq!(foods[0].category, FoodCategory::Dairy);
        assert_eq!(foods[1].category, FoodCategory::Other);
        assert!(foods[1].description.is_empty());
    }

    #[test]
    fn missing_seed_file_is_an_error() {
        let path = std::env::temp_dir().join("larder-does-not-exist.json");
        assert!(read_seed_file(&path).is_err());
    }
}
