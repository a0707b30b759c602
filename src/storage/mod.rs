//! Storage Layer - Unified data access for the economy backend
//!
//! Two-tier storage:
//! - **LMDB**: Static reference data (item catalog, crafting recipes)
//! - **SQLite**: Mutable player state (accounts, inventories, listings,
//!   trade log) -- the single source of truth and sole synchronization point
//!
//! ## Architecture
//! ```text
//! [API Handlers / Engines]
//!       ↓
//! ┌─────────────────┬──────────────┐
//! │ CatalogStore    │ LedgerStore  │
//! │ (templates)     │ (player data)│
//! └─────────────────┴──────────────┘
//! ```

pub mod catalog;
pub mod ledger;
pub mod migrations;
pub mod seed_data;

use std::sync::Arc;
use tracing::info;

use self::catalog::CatalogStore;
use self::ledger::LedgerStore;
use crate::error::EconomyResult;

/// Initialize the complete storage layer
///
/// Creates the LMDB catalog store (seeded) and the SQLite ledger store
/// (migrated), returning both behind `Arc`.
pub async fn init_storage(
    lmdb_path: &str,
    lmdb_max_size: usize,
    database_url: &str,
    max_connections: u32,
    fee_rate: f64,
) -> EconomyResult<(Arc<CatalogStore>, Arc<LedgerStore>)> {
    let catalog = Arc::new(CatalogStore::new(lmdb_path, lmdb_max_size)?);
    seed_data::seed_all(&catalog)?;
    info!("LMDB catalog store initialized and seeded");

    let ledger = Arc::new(LedgerStore::new(database_url, max_connections, fee_rate).await?);
    info!("SQLite ledger store initialized");

    Ok((catalog, ledger))
}
