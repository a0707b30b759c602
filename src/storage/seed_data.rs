//! Seed Data - Initial catalog entries and recipes for the LMDB store
//!
//! Populates the reference-data store with the baseline item universe.
//! Provisioning tooling can overwrite or extend these at deploy time; the
//! economy core only ever reads them.

use tracing::info;

use super::catalog::{CatalogEntry, CatalogStore, Recipe, RecipeIngredient, TemplateStoreError};

/// Seed all template databases with initial data
pub fn seed_all(store: &CatalogStore) -> Result<usize, TemplateStoreError> {
    let mut total = 0;
    total += seed_items(store)?;
    total += seed_recipes(store)?;
    info!("Seeded {} total catalog entries", total);
    Ok(total)
}

/// Seed item-type metadata. Rarity 0 is the most common; the reward sampler
/// weights an item at 0.4^rarity, so every step of rarity is a 2.5x cut in
/// drop probability.
fn seed_items(store: &CatalogStore) -> Result<usize, TemplateStoreError> {
    let items = vec![
        // === Raw ores (common mining drops) ===
        entry("ore_iron", "Iron Ore", "Ore", "Raw ferrous ore, the backbone of every hull", 0),
        entry("ore_silicon", "Silicon Wafer Ore", "Ore", "Semiconductor-grade raw silicon", 1),
        entry("ore_cobalt", "Cobalt Ore", "Ore", "Dense alloying metal for hardened plating", 2),
        // === Refined materials ===
        entry("ingot_steel", "Steel Ingot", "Ingot", "Refined structural steel", 1),
        entry("ingot_cobalt", "Cobalt Ingot", "Ingot", "Refined cobalt, ready for alloying", 3),
        // === Currency-adjacent drop ===
        entry("SpaceCredit", "Space Credit Chip", "Currency", "A hardware-signed credit chip", 1),
        // === Prototech salvage components ===
        entry("PrototechPanel", "Prototech Panel", "Component", "Salvaged hull panel of unknown alloy", 4),
        entry("PrototechCapacitor", "Prototech Capacitor", "Component", "High-density energy cell", 5),
        entry("PrototechMotor", "Prototech Motor", "Component", "Self-lubricating servo assembly", 6),
        entry("PrototechCoolingUnit", "Prototech Cooling Unit", "Component", "Phase-change thermal regulator", 8),
        entry("PrototechFrame", "Prototech Frame", "Component", "Intact structural frame, extremely rare salvage", 11),
        // === Craftable combat modules ===
        entry("BerserkerModule_Level1", "Berserker Module Mk I", "Module", "Weapon overcharge module, first mark", 3),
        entry("BerserkerModule_Level2", "Berserker Module Mk II", "Module", "Weapon overcharge module, second mark", 6),
        entry("BerserkerModule_Level3", "Berserker Module Mk III", "Module", "Weapon overcharge module, final mark", 9),
    ];

    let count = items.len();
    for item in &items {
        store.put_item(item)?;
    }
    info!("Seeded {} catalog items", count);
    Ok(count)
}

/// Seed upgrade recipes. One recipe per target item, at most five weighted
/// ingredients each; applying one consumes the ingredients and mints exactly
/// one unit of the target.
fn seed_recipes(store: &CatalogStore) -> Result<usize, TemplateStoreError> {
    let recipes = vec![
        recipe("ingot_steel", &[("ore_iron", 3.0)]),
        recipe("ingot_cobalt", &[("ore_cobalt", 4.0), ("ore_iron", 1.0)]),
        recipe(
            "BerserkerModule_Level1",
            &[("ingot_steel", 10.0), ("ingot_cobalt", 2.0), ("ore_silicon", 5.0)],
        ),
        recipe(
            "BerserkerModule_Level2",
            &[
                ("BerserkerModule_Level1", 15.0),
                ("ingot_steel", 10.0),
                ("PrototechPanel", 2.0),
            ],
        ),
        recipe(
            "BerserkerModule_Level3",
            &[
                ("BerserkerModule_Level2", 15.0),
                ("PrototechFrame", 2.0),
                ("PrototechCoolingUnit", 1.0),
                ("PrototechCapacitor", 4.0),
            ],
        ),
        recipe(
            "PrototechFrame",
            &[
                ("PrototechPanel", 4.0),
                ("PrototechCapacitor", 2.0),
                ("PrototechMotor", 1.0),
            ],
        ),
    ];

    let count = recipes.len();
    for recipe in &recipes {
        store.put_recipe(recipe)?;
    }
    info!("Seeded {} recipes", count);
    Ok(count)
}

fn entry(
    item_id: &str,
    display_name: &str,
    category: &str,
    description: &str,
    rarity: u32,
) -> CatalogEntry {
    CatalogEntry {
        item_id: item_id.into(),
        display_name: display_name.into(),
        category: category.into(),
        description: description.into(),
        rarity,
    }
}

fn recipe(target: &str, ingredients: &[(&str, f64)]) -> Recipe {
    Recipe {
        target_item_id: target.into(),
        ingredients: ingredients
            .iter()
            .map(|(item_id, quantity)| RecipeIngredient {
                item_id: (*item_id).into(),
                quantity: *quantity,
            })
            .collect(),
    }
}
