//! MarketService — peer-to-peer listings with inventory escrow
//!
//! Endpoints:
//! - POST /starforge.MarketService/CreateListing
//! - POST /starforge.MarketService/Purchase
//! - POST /starforge.MarketService/Cancel
//! - POST /starforge.MarketService/Browse
//! - POST /starforge.MarketService/RecentTrades

use axum::{extract::State, routing::post, Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::Ordering;

use super::ApiState;
use crate::error::{EconomyError, EconomyResult};
use crate::storage::ledger::{TradeLogRow, TradeReceipt};

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/starforge.MarketService/CreateListing", post(create_listing))
        .route("/starforge.MarketService/Purchase", post(purchase))
        .route("/starforge.MarketService/Cancel", post(cancel))
        .route("/starforge.MarketService/Browse", post(browse))
        .route("/starforge.MarketService/RecentTrades", post(recent_trades))
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct CreateListingRequest {
    pub account_id: String,
    pub item_id: String,
    pub price_per_unit: f64,
    pub quantity: f64,
}

#[derive(Serialize)]
pub struct CreateListingResponse {
    pub listing_id: i64,
}

#[derive(Deserialize)]
pub struct PurchaseRequest {
    pub account_id: String,
    pub listing_id: i64,
    pub quantity: f64,
}

#[derive(Deserialize)]
pub struct CancelRequest {
    pub account_id: String,
    pub listing_id: i64,
    pub quantity: f64,
}

#[derive(Serialize)]
pub struct CancelResponse {
    pub message: &'static str,
}

#[derive(Deserialize)]
pub struct BrowseRequest {
    pub account_id: String,
    /// true = the caller's own listings, false = everyone else's
    #[serde(default)]
    pub mine: bool,
    pub item_id: Option<String>,
    #[serde(default)]
    pub page: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_per_page() -> u32 {
    20
}

#[derive(Serialize)]
pub struct BrowseEntry {
    pub id: i64,
    pub seller_id: String,
    pub item_id: String,
    pub display_name: String,
    pub category: String,
    pub rarity: u32,
    pub price_per_unit: f64,
    pub quantity: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct BrowseResponse {
    pub entries: Vec<BrowseEntry>,
}

#[derive(Deserialize)]
pub struct RecentTradesRequest {
    #[serde(default = "default_trades_limit")]
    pub limit: i64,
}

fn default_trades_limit() -> i64 {
    50
}

#[derive(Serialize)]
pub struct RecentTradesResponse {
    pub trades: Vec<TradeLogRow>,
}

// ============================================================================
// Handlers
// ============================================================================

async fn create_listing(
    State(state): State<ApiState>,
    Json(req): Json<CreateListingRequest>,
) -> EconomyResult<Json<CreateListingResponse>> {
    if !state.catalog.item_exists(&req.item_id)? {
        return Err(EconomyError::NotFound(format!(
            "item type {}",
            req.item_id
        )));
    }

    let listing_id = state
        .ledger
        .create_listing(
            &req.account_id,
            &req.item_id,
            req.price_per_unit,
            req.quantity,
        )
        .await?;
    state.metrics.listings_created.fetch_add(1, Ordering::Relaxed);

    Ok(Json(CreateListingResponse { listing_id }))
}

async fn purchase(
    State(state): State<ApiState>,
    Json(req): Json<PurchaseRequest>,
) -> EconomyResult<Json<TradeReceipt>> {
    let receipt = state
        .ledger
        .purchase_listing(&req.account_id, req.listing_id, req.quantity)
        .await?;
    state.metrics.trades_completed.fetch_add(1, Ordering::Relaxed);

    Ok(Json(receipt))
}

async fn cancel(
    State(state): State<ApiState>,
    Json(req): Json<CancelRequest>,
) -> EconomyResult<Json<CancelResponse>> {
    state
        .ledger
        .cancel_listing(&req.account_id, req.listing_id, req.quantity)
        .await?;

    Ok(Json(CancelResponse {
        message: "listing cancelled",
    }))
}

/// Browse listings joined with catalog metadata, newest first
async fn browse(
    State(state): State<ApiState>,
    Json(req): Json<BrowseRequest>,
) -> EconomyResult<Json<BrowseResponse>> {
    let per_page = req.per_page.min(50).max(1) as i64;
    let offset = i64::from(req.page) * per_page;

    let rows = state
        .ledger
        .list_listings(
            &req.account_id,
            req.mine,
            req.item_id.as_deref(),
            per_page,
            offset,
        )
        .await?;

    let mut entries = Vec::with_capacity(rows.len());
    for row in rows {
        if let Some(item) = state.catalog.get_item(&row.item_id)? {
            entries.push(BrowseEntry {
                id: row.id,
                seller_id: row.seller_id,
                item_id: row.item_id,
                display_name: item.display_name,
                category: item.category,
                rarity: item.rarity,
                price_per_unit: row.price_per_unit,
                quantity: row.quantity,
                created_at: row.created_at,
            });
        }
    }

    Ok(Json(BrowseResponse { entries }))
}

async fn recent_trades(
    State(state): State<ApiState>,
    Json(req): Json<RecentTradesRequest>,
) -> EconomyResult<Json<RecentTradesResponse>> {
    let trades = state.ledger.recent_trades(req.limit.clamp(1, 200)).await?;
    Ok(Json(RecentTradesResponse { trades }))
}
