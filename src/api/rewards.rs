//! RewardService — damage-event ingestion and paid gacha pulls
//!
//! Endpoints:
//! - POST /starforge.RewardService/RecordDamage
//! - POST /starforge.RewardService/Pull
//! - POST /starforge.RewardService/PullMany
//! - POST /starforge.RewardService/RefreshTable

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::atomic::Ordering;
use tracing::warn;

use super::ApiState;
use crate::drops::DropModifiers;
use crate::error::{EconomyError, EconomyResult};
use crate::reward::SampledItem;

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/starforge.RewardService/RecordDamage", post(record_damage))
        .route("/starforge.RewardService/Pull", post(pull))
        .route("/starforge.RewardService/PullMany", post(pull_many))
        .route("/starforge.RewardService/RefreshTable", post(refresh_table))
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct DamageEvent {
    pub account_id: String,
    pub damage: f64,
}

#[derive(Deserialize)]
pub struct RecordDamageRequest {
    pub events: Vec<DamageEvent>,
    /// Optional context modifiers applied to every event in the batch
    #[serde(default)]
    pub chance_multiplier: Option<f64>,
    #[serde(default)]
    pub max_rarity: Option<u32>,
}

#[derive(Serialize)]
pub struct DamageResult {
    pub account_id: String,
    pub dropped_item: Option<SampledItem>,
}

#[derive(Serialize)]
pub struct RecordDamageResponse {
    pub results: Vec<DamageResult>,
}

#[derive(Deserialize)]
pub struct PullRequest {
    pub account_id: String,
}

#[derive(Serialize)]
pub struct PullResponse {
    pub item_id: String,
    pub rarity: u32,
    pub quantity: u32,
}

#[derive(Deserialize)]
pub struct PullManyRequest {
    pub account_id: String,
    pub count: u32,
}

#[derive(Serialize)]
pub struct PullManyResponse {
    pub items: Vec<SampledItem>,
}

#[derive(Serialize)]
pub struct RefreshTableResponse {
    pub items: usize,
    pub version: u64,
}

// ============================================================================
// Handlers
// ============================================================================

/// Ingest a batch of damage events. Malformed entries are skipped with a
/// warning (the game server fires these blind); an empty batch is an error.
async fn record_damage(
    State(state): State<ApiState>,
    Json(req): Json<RecordDamageRequest>,
) -> EconomyResult<Json<RecordDamageResponse>> {
    if req.events.is_empty() {
        return Err(EconomyError::Validation("no damage events supplied".into()));
    }
    let modifiers = DropModifiers {
        chance_multiplier: req.chance_multiplier,
        max_rarity: req.max_rarity,
    };

    let mut results = Vec::with_capacity(req.events.len());
    for event in req.events {
        if event.account_id.is_empty() || !event.damage.is_finite() || event.damage < 0.0 {
            warn!(
                "Skipping invalid damage event: account='{}' damage={}",
                event.account_id, event.damage
            );
            continue;
        }

        let dropped = state
            .drops
            .record_damage(&event.account_id, event.damage, &modifiers)
            .await?;

        state.metrics.damage_events.fetch_add(1, Ordering::Relaxed);
        if dropped.is_some() {
            state.metrics.items_dropped.fetch_add(1, Ordering::Relaxed);
        }
        results.push(DamageResult {
            account_id: event.account_id,
            dropped_item: dropped,
        });
    }

    Ok(Json(RecordDamageResponse { results }))
}

async fn pull(
    State(state): State<ApiState>,
    Json(req): Json<PullRequest>,
) -> EconomyResult<Json<PullResponse>> {
    let item = state.gacha.pull(&req.account_id).await?;
    state.metrics.gacha_pulls.fetch_add(1, Ordering::Relaxed);

    Ok(Json(PullResponse {
        item_id: item.item_id,
        rarity: item.rarity,
        quantity: 1,
    }))
}

async fn pull_many(
    State(state): State<ApiState>,
    Json(req): Json<PullManyRequest>,
) -> EconomyResult<Json<PullManyResponse>> {
    let items = state.gacha.pull_many(&req.account_id, req.count).await?;
    state
        .metrics
        .gacha_pulls
        .fetch_add(items.len() as u64, Ordering::Relaxed);

    Ok(Json(PullManyResponse { items }))
}

/// Rebuild the sampler snapshot after a catalog change (provisioning hook)
async fn refresh_table(
    State(state): State<ApiState>,
) -> EconomyResult<Json<RefreshTableResponse>> {
    let items = state.sampler.refresh(&state.catalog)?;
    Ok(Json(RefreshTableResponse {
        items,
        version: state.sampler.table_version(),
    }))
}
