//! CraftService — recipe-based upgrades
//!
//! Endpoints:
//! - POST /starforge.CraftService/Craft
//! - POST /starforge.CraftService/GetBlueprints

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::atomic::Ordering;

use super::ApiState;
use crate::error::EconomyResult;
use crate::storage::catalog::{Recipe, RecipeIngredient};

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/starforge.CraftService/Craft", post(craft))
        .route("/starforge.CraftService/GetBlueprints", post(get_blueprints))
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct CraftRequest {
    pub account_id: String,
    pub target_item_id: String,
}

#[derive(Serialize)]
pub struct CraftResponse {
    pub target_item_id: String,
    pub consumed: Vec<RecipeIngredient>,
}

#[derive(Serialize)]
pub struct BlueprintsResponse {
    pub blueprints: Vec<Recipe>,
}

// ============================================================================
// Handlers
// ============================================================================

async fn craft(
    State(state): State<ApiState>,
    Json(req): Json<CraftRequest>,
) -> EconomyResult<Json<CraftResponse>> {
    let outcome = state
        .crafting
        .craft(&req.account_id, &req.target_item_id)
        .await?;
    state.metrics.crafts_completed.fetch_add(1, Ordering::Relaxed);

    Ok(Json(CraftResponse {
        target_item_id: outcome.target_item_id,
        consumed: outcome.consumed,
    }))
}

async fn get_blueprints(
    State(state): State<ApiState>,
) -> EconomyResult<Json<BlueprintsResponse>> {
    let blueprints = state.catalog.get_all_recipes()?;
    Ok(Json(BlueprintsResponse { blueprints }))
}
