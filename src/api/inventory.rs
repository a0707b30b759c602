//! InventoryService — storage view and direct quantity adjustments
//!
//! Endpoints:
//! - POST /starforge.InventoryService/GetInventory
//! - POST /starforge.InventoryService/Deposit
//! - POST /starforge.InventoryService/Withdraw
//! - POST /starforge.InventoryService/Transfer
//!
//! Deposit/Withdraw are the bridge the game server uses to move items
//! between in-game cargo and the player's online storage. Every item id is
//! checked against the catalog before it touches the ledger.

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use super::ApiState;
use crate::error::{EconomyError, EconomyResult};

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/starforge.InventoryService/GetInventory", post(get_inventory))
        .route("/starforge.InventoryService/Deposit", post(deposit))
        .route("/starforge.InventoryService/Withdraw", post(withdraw))
        .route("/starforge.InventoryService/Transfer", post(transfer))
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct InventoryRequest {
    pub account_id: String,
}

#[derive(Serialize)]
pub struct InventoryEntry {
    pub item_id: String,
    pub display_name: String,
    pub category: String,
    pub description: String,
    pub rarity: u32,
    pub quantity: f64,
}

#[derive(Serialize)]
pub struct InventoryResponse {
    pub items: Vec<InventoryEntry>,
}

#[derive(Deserialize)]
pub struct AdjustRequest {
    pub account_id: String,
    pub item_id: String,
    pub quantity: f64,
}

#[derive(Serialize)]
pub struct AdjustResponse {
    pub item_id: String,
    /// Quantity remaining in online storage after the adjustment
    pub quantity: f64,
}

#[derive(Deserialize)]
pub struct TransferRequest {
    pub from_account: String,
    pub to_account: String,
    #[serde(default)]
    pub amount: f64,
    pub item_id: Option<String>,
    pub quantity: Option<f64>,
}

#[derive(Serialize)]
pub struct TransferResponse {
    pub message: &'static str,
}

// ============================================================================
// Handlers
// ============================================================================

/// Positive-quantity items joined with catalog metadata. Items the catalog
/// no longer recognizes are omitted from the view (they stay in storage).
async fn get_inventory(
    State(state): State<ApiState>,
    Json(req): Json<InventoryRequest>,
) -> EconomyResult<Json<InventoryResponse>> {
    let rows = state.ledger.get_inventory(&req.account_id).await?;

    let mut items = Vec::with_capacity(rows.len());
    for row in rows {
        if let Some(entry) = state.catalog.get_item(&row.item_id)? {
            items.push(InventoryEntry {
                item_id: entry.item_id,
                display_name: entry.display_name,
                category: entry.category,
                description: entry.description,
                rarity: entry.rarity,
                quantity: row.quantity,
            });
        }
    }

    Ok(Json(InventoryResponse { items }))
}

async fn deposit(
    State(state): State<ApiState>,
    Json(req): Json<AdjustRequest>,
) -> EconomyResult<Json<AdjustResponse>> {
    validate_adjustment(&state, &req)?;
    state
        .ledger
        .adjust_inventory(&req.account_id, &[(req.item_id.clone(), req.quantity)])
        .await?;

    let quantity = state
        .ledger
        .get_item_quantity(&req.account_id, &req.item_id)
        .await?;
    Ok(Json(AdjustResponse {
        item_id: req.item_id,
        quantity,
    }))
}

async fn withdraw(
    State(state): State<ApiState>,
    Json(req): Json<AdjustRequest>,
) -> EconomyResult<Json<AdjustResponse>> {
    validate_adjustment(&state, &req)?;
    state
        .ledger
        .adjust_inventory(&req.account_id, &[(req.item_id.clone(), -req.quantity)])
        .await?;

    let quantity = state
        .ledger
        .get_item_quantity(&req.account_id, &req.item_id)
        .await?;
    Ok(Json(AdjustResponse {
        item_id: req.item_id,
        quantity,
    }))
}

/// Internal/admin transfer of currency and/or items between accounts
async fn transfer(
    State(state): State<ApiState>,
    Json(req): Json<TransferRequest>,
) -> EconomyResult<Json<TransferResponse>> {
    let item = match (&req.item_id, req.quantity) {
        (Some(item_id), Some(quantity)) => {
            if !state.catalog.item_exists(item_id)? {
                return Err(EconomyError::NotFound(format!("item type {item_id}")));
            }
            Some((item_id.as_str(), quantity))
        }
        (None, None) => None,
        _ => {
            return Err(EconomyError::Validation(
                "item_id and quantity must be provided together".into(),
            ))
        }
    };

    state
        .ledger
        .transfer(&req.from_account, &req.to_account, req.amount, item)
        .await?;

    Ok(Json(TransferResponse {
        message: "transfer complete",
    }))
}

fn validate_adjustment(state: &ApiState, req: &AdjustRequest) -> EconomyResult<()> {
    if !req.quantity.is_finite() || req.quantity <= 0.0 {
        return Err(EconomyError::Validation(format!(
            "quantity must be positive, got {}",
            req.quantity
        )));
    }
    if !state.catalog.item_exists(&req.item_id)? {
        return Err(EconomyError::NotFound(format!(
            "item type {}",
            req.item_id
        )));
    }
    Ok(())
}
