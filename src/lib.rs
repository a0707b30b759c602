//! Starforge Economy Server Library
//!
//! Core modules for the player-economy backend:
//! - Two-tier storage (LMDB catalog templates + SQLite player data)
//! - Atomic ledger transactions (balances, inventory, marketplace escrow)
//! - Rarity-weighted reward sampling (passive drops + paid gacha pulls)
//! - Recipe-based crafting
//! - HTTP/JSON API endpoints for the game client bridge

pub mod api; // HTTP/JSON API endpoints
pub mod crafting; // Recipe validation + atomic application
pub mod drops; // Damage-gated passive reward engine
pub mod error; // Unified error taxonomy with stable reason codes
pub mod gacha; // Currency-gated pull engine
pub mod metrics; // Server metrics (Prometheus + JSON export)
pub mod reward; // Rarity-weighted categorical sampler
pub mod storage; // Unified data storage (LMDB + SQLite)

// Re-export commonly used types
pub use error::{EconomyError, EconomyResult};
pub use reward::RewardSampler;
pub use storage::catalog::CatalogStore;
pub use storage::ledger::LedgerStore;
