//! HTTP/JSON API Layer
//!
//! REST-like endpoints following gRPC path conventions. The game-side bridge
//! authenticates players and forwards requests with the verified account id
//! in the JSON body; this layer validates payloads, runs the economy
//! operation and maps failures onto the error taxonomy.
//!
//! ## Architecture
//! ```text
//! Game bridge (authenticated JSON-over-HTTP)
//!       ↓ HTTP POST, JSON body
//! Axum Router (port 50051)
//!       ↓
//! Service Handlers (accounts, inventory, rewards, crafting, market)
//!       ↓
//! Engines + Storage (CatalogStore, LedgerStore, RewardSampler)
//! ```
//!
//! ## Endpoint Convention
//! All endpoints follow the path pattern `POST /starforge.<Service>/<Method>`
//! Example: `POST /starforge.MarketService/Purchase`

pub mod accounts;
pub mod crafting;
pub mod inventory;
pub mod market;
pub mod rewards;

use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::crafting::CraftingResolver;
use crate::drops::DropEngine;
use crate::gacha::GachaEngine;
use crate::metrics::ServerMetrics;
use crate::reward::RewardSampler;
use crate::storage::catalog::CatalogStore;
use crate::storage::ledger::LedgerStore;

/// Shared state available to all API handlers
#[derive(Clone)]
pub struct ApiState {
    pub catalog: Arc<CatalogStore>,
    pub ledger: Arc<LedgerStore>,
    pub sampler: Arc<RewardSampler>,
    pub drops: Arc<DropEngine>,
    pub gacha: Arc<GachaEngine>,
    pub crafting: Arc<CraftingResolver>,
    /// Server-wide metrics (lock-free atomics)
    pub metrics: Arc<ServerMetrics>,
}

impl ApiState {
    /// Wire the engines over the shared stores
    pub fn new(
        catalog: Arc<CatalogStore>,
        ledger: Arc<LedgerStore>,
        sampler: Arc<RewardSampler>,
    ) -> Self {
        let drops = Arc::new(DropEngine::new(sampler.clone(), ledger.clone()));
        let gacha = Arc::new(GachaEngine::new(sampler.clone(), ledger.clone()));
        let crafting = Arc::new(CraftingResolver::new(catalog.clone(), ledger.clone()));
        Self {
            catalog,
            ledger,
            sampler,
            drops,
            gacha,
            crafting,
            metrics: ServerMetrics::new(),
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build the full API router with all service endpoints
pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(crate::metrics::prometheus_handler))
        .route("/metrics/json", get(crate::metrics::json_metrics_handler))
        .merge(accounts::routes())
        .merge(inventory::routes())
        .merge(rewards::routes())
        .merge(crafting::routes())
        .merge(market::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            crate::metrics::metrics_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the HTTP API server on the given port
pub async fn start_api_server(
    catalog: Arc<CatalogStore>,
    ledger: Arc<LedgerStore>,
    sampler: Arc<RewardSampler>,
    port: u16,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let state = ApiState::new(catalog, ledger, sampler);
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("API server listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
