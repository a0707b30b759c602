//! Database Migrations - SQLite schema for the economy backend
//!
//! Mutable player state only. Static reference data (catalog, recipes)
//! lives in LMDB, not here.

/// SQL migration for creating all tables
pub const MIGRATION_V1: &str = r#"
-- ============================================================================
-- Starforge Economy Schema v1
-- ============================================================================

-- ============================================================================
-- 1. Accounts (balance + cumulative damage stat)
-- ============================================================================

CREATE TABLE IF NOT EXISTS accounts (
    account_id      TEXT PRIMARY KEY,
    nickname        TEXT,
    balance         REAL NOT NULL DEFAULT 0.0 CHECK (balance >= 0.0),
    total_damage    REAL NOT NULL DEFAULT 0.0 CHECK (total_damage >= 0.0),
    created_at      TEXT NOT NULL
);

-- ============================================================================
-- 2. Inventory (one row per owned item type; quantities never negative)
--
-- The catalog's item set grows over time; unknown item ids simply have no
-- row yet and read as zero. Item ids are validated against the catalog
-- before they reach this table -- they are never interpolated into SQL.
-- ============================================================================

CREATE TABLE IF NOT EXISTS inventory_items (
    account_id      TEXT NOT NULL REFERENCES accounts(account_id),
    item_id         TEXT NOT NULL,
    quantity        REAL NOT NULL DEFAULT 0.0 CHECK (quantity >= 0.0),

    PRIMARY KEY (account_id, item_id)
);

CREATE INDEX IF NOT EXISTS idx_inventory_account ON inventory_items(account_id);

-- ============================================================================
-- 3. Marketplace listings (escrowed quantity)
-- ============================================================================

CREATE TABLE IF NOT EXISTS listings (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    seller_id       TEXT NOT NULL REFERENCES accounts(account_id),
    item_id         TEXT NOT NULL,
    price_per_unit  REAL NOT NULL CHECK (price_per_unit > 0.0),
    quantity        REAL NOT NULL CHECK (quantity > 0.0),
    created_at      TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_listings_seller ON listings(seller_id);
CREATE INDEX IF NOT EXISTS idx_listings_item ON listings(item_id);

-- ============================================================================
-- 4. Trade log (append-only audit trail)
-- ============================================================================

CREATE TABLE IF NOT EXISTS trade_log (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    seller_id       TEXT NOT NULL,
    buyer_id        TEXT NOT NULL,
    item_id         TEXT NOT NULL,
    price_per_unit  REAL NOT NULL,
    quantity        REAL NOT NULL,
    created_at      TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_trade_log_seller ON trade_log(seller_id);
CREATE INDEX IF NOT EXISTS idx_trade_log_buyer ON trade_log(buyer_id);
"#;

/// All migrations in execution order
pub fn get_migrations() -> Vec<(&'static str, &'static str)> {
    vec![("v1_initial_schema", MIGRATION_V1)]
}
