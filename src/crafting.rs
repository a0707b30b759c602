//! Crafting Resolver — atomic ingredient-to-product transformation
//!
//! A craft walks `Requested → IngredientsFetched → Validated → Applied`, or
//! stops at any step with a typed rejection and no inventory change. The
//! apply step is one Ledger batch (every ingredient negative, the target +1),
//! never per-ingredient calls, so a failure can never leave a half-consumed
//! craft behind. The pre-validation read exists to name the exact shortfall;
//! the batch re-checks everything under the transaction, which closes the
//! race against a concurrent spend of the same ingredients.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{EconomyError, EconomyResult};
use crate::storage::catalog::{CatalogStore, RecipeIngredient, MAX_RECIPE_INGREDIENTS};
use crate::storage::ledger::LedgerStore;

/// Progress marker of one craft attempt (diagnostics/logging)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CraftPhase {
    Requested,
    IngredientsFetched,
    Validated,
    Applied,
}

/// Result of a successful craft
#[derive(Debug, Clone, Serialize)]
pub struct CraftOutcome {
    pub target_item_id: String,
    pub consumed: Vec<RecipeIngredient>,
}

/// Validates and atomically applies recipes against the Ledger
pub struct CraftingResolver {
    catalog: Arc<CatalogStore>,
    ledger: Arc<LedgerStore>,
}

impl CraftingResolver {
    pub fn new(catalog: Arc<CatalogStore>, ledger: Arc<LedgerStore>) -> Self {
        Self { catalog, ledger }
    }

    /// Craft one unit of `target_item_id` for `account_id`
    pub async fn craft(
        &self,
        account_id: &str,
        target_item_id: &str,
    ) -> EconomyResult<CraftOutcome> {
        let mut phase = CraftPhase::Requested;
        debug!("Craft {:?}: {} wants {}", phase, account_id, target_item_id);

        let recipe = self
            .catalog
            .get_recipe(target_item_id)?
            .ok_or_else(|| EconomyError::NoSuchRecipe(target_item_id.to_string()))?;
        phase = CraftPhase::IngredientsFetched;
        debug!(
            "Craft {:?}: recipe for {} has {} ingredient(s)",
            phase,
            target_item_id,
            recipe.ingredients.len()
        );

        if recipe.ingredients.is_empty() {
            return Err(EconomyError::Validation(format!(
                "recipe for '{target_item_id}' has no ingredients"
            )));
        }
        if recipe.ingredients.len() > MAX_RECIPE_INGREDIENTS {
            return Err(EconomyError::Validation(format!(
                "recipe for '{target_item_id}' exceeds {MAX_RECIPE_INGREDIENTS} ingredients"
            )));
        }

        for ingredient in &recipe.ingredients {
            let have = self
                .ledger
                .get_item_quantity(account_id, &ingredient.item_id)
                .await?;
            if have < ingredient.quantity {
                debug!(
                    "Craft rejected: {} has {} of {}, needs {}",
                    account_id, have, ingredient.item_id, ingredient.quantity
                );
                return Err(EconomyError::InsufficientIngredient(
                    ingredient.item_id.clone(),
                ));
            }
        }
        phase = CraftPhase::Validated;
        debug!("Craft {:?}: {} -> {}", phase, account_id, target_item_id);

        let mut deltas: Vec<(String, f64)> = recipe
            .ingredients
            .iter()
            .map(|ingredient| (ingredient.item_id.clone(), -ingredient.quantity))
            .collect();
        deltas.push((target_item_id.to_string(), 1.0));

        match self.ledger.adjust_inventory(account_id, &deltas).await {
            Ok(()) => {}
            // A concurrent spend emptied an ingredient between the check and
            // the batch; surface it as the same rejection
            Err(EconomyError::InsufficientInventory { item, .. }) => {
                return Err(EconomyError::InsufficientIngredient(item));
            }
            Err(err) => return Err(err),
        }
        phase = CraftPhase::Applied;

        info!(
            "Craft {:?}: {} made 1x {} from {} ingredient(s)",
            phase,
            account_id,
            target_item_id,
            recipe.ingredients.len()
        );
        Ok(CraftOutcome {
            target_item_id: target_item_id.to_string(),
            consumed: recipe.ingredients,
        })
    }
}
