//! LMDB Catalog Store - Persistent storage for static economy reference data
//!
//! Holds the item catalog and crafting recipes in LMDB for fast read access.
//! Both are loaded once at startup (seed or provisioning tooling) and are
//! read-only from the economy core's perspective: the Ledger never mutates
//! them, it only validates item ids against them.

use heed::{Database, Env, EnvOpenOptions};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Maximum number of ingredients a recipe may carry
pub const MAX_RECIPE_INGREDIENTS: usize = 5;

/// Item-type metadata. `rarity` is monotonic: higher = rarer, 0 = most common.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub item_id: String,
    pub display_name: String,
    pub category: String,
    pub description: String,
    pub rarity: u32,
}

/// One weighted ingredient of a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub item_id: String,
    pub quantity: f64,
}

/// Crafting recipe, keyed by the item it produces (one recipe per target).
/// Applying it consumes every ingredient and mints one unit of the target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub target_item_id: String,
    pub ingredients: Vec<RecipeIngredient>,
}

/// Error type for catalog store operations
#[derive(Debug, thiserror::Error)]
pub enum TemplateStoreError {
    #[error("LMDB error: {0}")]
    Heed(#[from] heed::Error),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// LMDB-backed store for catalog entries and recipes
pub struct CatalogStore {
    env: Arc<Env>,
    /// Database for item-type metadata, keyed by item id
    items: Database<heed::types::Str, heed::types::Bytes>,
    /// Database for crafting recipes, keyed by target item id
    recipes: Database<heed::types::Str, heed::types::Bytes>,
}

impl CatalogStore {
    /// Open or create the catalog store
    ///
    /// # Arguments
    /// * `path` - Directory for LMDB data files
    /// * `max_size` - Maximum database size in bytes (page-aligned)
    pub fn new<P: AsRef<Path>>(path: P, max_size: usize) -> Result<Self, TemplateStoreError> {
        std::fs::create_dir_all(&path)?;

        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(max_size)
                .max_dbs(2)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let items =
            env.create_database::<heed::types::Str, heed::types::Bytes>(&mut wtxn, Some("items"))?;
        let recipes = env
            .create_database::<heed::types::Str, heed::types::Bytes>(&mut wtxn, Some("recipes"))?;
        wtxn.commit()?;

        info!(
            "LMDB catalog store initialized ({}MB)",
            max_size / (1024 * 1024)
        );

        Ok(Self {
            env: Arc::new(env),
            items,
            recipes,
        })
    }

    // ========================================================================
    // Generic CRUD operations
    // ========================================================================

    fn put<T: Serialize>(
        &self,
        db: Database<heed::types::Str, heed::types::Bytes>,
        key: &str,
        value: &T,
    ) -> Result<(), TemplateStoreError> {
        let bytes = bincode::serialize(value)
            .map_err(|e| TemplateStoreError::Serialization(e.to_string()))?;
        let mut wtxn = self.env.write_txn()?;
        db.put(&mut wtxn, key, &bytes)?;
        wtxn.commit()?;
        debug!("Stored catalog entry: {}", key);
        Ok(())
    }

    fn get<T: for<'de> Deserialize<'de>>(
        &self,
        db: Database<heed::types::Str, heed::types::Bytes>,
        key: &str,
    ) -> Result<Option<T>, TemplateStoreError> {
        let rtxn = self.env.read_txn()?;
        match db.get(&rtxn, key)? {
            Some(bytes) => {
                let value = bincode::deserialize(bytes)
                    .map_err(|e| TemplateStoreError::Serialization(e.to_string()))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    fn get_all<T: for<'de> Deserialize<'de>>(
        &self,
        db: Database<heed::types::Str, heed::types::Bytes>,
    ) -> Result<Vec<T>, TemplateStoreError> {
        let rtxn = self.env.read_txn()?;
        let mut results = Vec::new();
        let iter = db.iter(&rtxn)?;
        for entry in iter {
            let (_, bytes) = entry?;
            let value = bincode::deserialize(bytes)
                .map_err(|e| TemplateStoreError::Serialization(e.to_string()))?;
            results.push(value);
        }
        Ok(results)
    }

    fn count(
        &self,
        db: Database<heed::types::Str, heed::types::Bytes>,
    ) -> Result<usize, TemplateStoreError> {
        let rtxn = self.env.read_txn()?;
        Ok(db.len(&rtxn)? as usize)
    }

    // ========================================================================
    // Items
    // ========================================================================

    /// Store an item-type entry (seeding/provisioning only)
    pub fn put_item(&self, entry: &CatalogEntry) -> Result<(), TemplateStoreError> {
        self.put(self.items, &entry.item_id, entry)
    }

    /// Get an item-type entry by id
    pub fn get_item(&self, item_id: &str) -> Result<Option<CatalogEntry>, TemplateStoreError> {
        self.get(self.items, item_id)
    }

    /// Whether the catalog recognizes this item id
    pub fn item_exists(&self, item_id: &str) -> Result<bool, TemplateStoreError> {
        let rtxn = self.env.read_txn()?;
        Ok(self.items.get(&rtxn, item_id)?.is_some())
    }

    /// All item-type entries
    pub fn get_all_items(&self) -> Result<Vec<CatalogEntry>, TemplateStoreError> {
        self.get_all(self.items)
    }

    pub fn count_items(&self) -> Result<usize, TemplateStoreError> {
        self.count(self.items)
    }

    // ========================================================================
    // Recipes
    // ========================================================================

    /// Store a recipe, keyed by its target item (seeding/provisioning only)
    pub fn put_recipe(&self, recipe: &Recipe) -> Result<(), TemplateStoreError> {
        self.put(self.recipes, &recipe.target_item_id, recipe)
    }

    /// Get the recipe producing `target_item_id`
    pub fn get_recipe(&self, target_item_id: &str) -> Result<Option<Recipe>, TemplateStoreError> {
        self.get(self.recipes, target_item_id)
    }

    /// All recipes
    pub fn get_all_recipes(&self) -> Result<Vec<Recipe>, TemplateStoreError> {
        self.get_all(self.recipes)
    }

    pub fn count_recipes(&self) -> Result<usize, TemplateStoreError> {
        self.count(self.recipes)
    }
}
