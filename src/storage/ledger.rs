//! Ledger Store - All mutable economy state lives here
//!
//! The only component permitted to mutate account balances, inventories,
//! listings and the trade log. Every multi-step mutation runs inside one
//! SQLite transaction: the read that informs a write decision (balance check
//! before a debit, stock check before escrow) happens in the same transaction
//! as the write, so concurrent operations on the same account cannot lose
//! updates or double-spend. A dropped transaction rolls back automatically.
//!
//! Item ids reach this layer only as bound query parameters, validated
//! against the catalog upstream -- identifiers are never spliced into SQL.
//!
//! ## Tables
//! - accounts, inventory_items, listings, trade_log

use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::{FromRow, Sqlite, Transaction};
use tracing::{debug, info, warn};

use super::migrations;
use crate::error::{EconomyError, EconomyResult};

/// SQLite connection pool wrapper holding the marketplace fee configuration
#[derive(Clone)]
pub struct LedgerStore {
    pool: SqlitePool,
    /// Fraction of each trade retained by the system (0.10 = 10%)
    fee_rate: f64,
}

impl LedgerStore {
    /// Connect to SQLite and run migrations
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        fee_rate: f64,
    ) -> EconomyResult<Self> {
        if !(0.0..1.0).contains(&fee_rate) {
            return Err(EconomyError::Validation(format!(
                "fee rate {fee_rate} outside [0, 1)"
            )));
        }

        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(sqlx::Error::from)?
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        info!("SQLite connected (max_connections={})", max_connections);

        let store = Self { pool, fee_rate };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Fully in-memory store on a single connection (tests, demos)
    pub async fn in_memory(fee_rate: f64) -> EconomyResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(sqlx::Error::from)?
            .foreign_keys(true);
        // A single never-reclaimed connection: the database lives in it
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        let store = Self { pool, fee_rate };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Get reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Configured marketplace fee rate
    pub fn fee_rate(&self) -> f64 {
        self.fee_rate
    }

    /// Run all pending migrations
    pub async fn run_migrations(&self) -> EconomyResult<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS _migrations (
                name TEXT PRIMARY KEY,
                applied_at TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        for (name, sql) in migrations::get_migrations() {
            let applied: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM _migrations WHERE name = ?)")
                    .bind(name)
                    .fetch_one(&self.pool)
                    .await?;

            if !applied {
                info!("Running migration: {}", name);
                sqlx::raw_sql(sql).execute(&self.pool).await?;

                sqlx::query("INSERT INTO _migrations (name, applied_at) VALUES (?, ?)")
                    .bind(name)
                    .bind(Utc::now())
                    .execute(&self.pool)
                    .await?;

                info!("Migration applied: {}", name);
            } else {
                debug!("Migration already applied: {}", name);
            }
        }

        Ok(())
    }

    // ========================================================================
    // Account Operations
    // ========================================================================

    /// Create a zero-valued account row if absent. Idempotent.
    pub async fn ensure_account(&self, account_id: &str) -> EconomyResult<()> {
        let mut tx = self.pool.begin().await?;
        ensure_account_tx(&mut tx, account_id).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Create-or-update the account profile (nickname)
    pub async fn upsert_profile(&self, account_id: &str, nickname: &str) -> EconomyResult<()> {
        sqlx::query(
            "INSERT INTO accounts (account_id, nickname, created_at) VALUES (?, ?, ?)
             ON CONFLICT(account_id) DO UPDATE SET nickname = excluded.nickname",
        )
        .bind(account_id)
        .bind(nickname)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Get an account by id
    pub async fn get_account(&self, account_id: &str) -> EconomyResult<Option<AccountRow>> {
        let row = sqlx::query_as::<_, AccountRow>(
            "SELECT account_id, nickname, balance, total_damage, created_at
             FROM accounts WHERE account_id = ?",
        )
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Add currency to an account (amount >= 0; always succeeds)
    pub async fn credit_balance(&self, account_id: &str, amount: f64) -> EconomyResult<f64> {
        require_non_negative("amount", amount)?;
        let mut tx = self.pool.begin().await?;
        ensure_account_tx(&mut tx, account_id).await?;
        let balance: f64 = sqlx::query_scalar(
            "UPDATE accounts SET balance = balance + ? WHERE account_id = ? RETURNING balance",
        )
        .bind(amount)
        .bind(account_id)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(balance)
    }

    /// Remove currency from an account, failing atomically on shortfall
    pub async fn debit_balance(&self, account_id: &str, amount: f64) -> EconomyResult<f64> {
        require_non_negative("amount", amount)?;
        let mut tx = self.pool.begin().await?;
        let balance = debit_balance_tx(&mut tx, account_id, amount).await?;
        tx.commit().await?;
        Ok(balance)
    }

    /// Accounts ordered by cumulative damage dealt (highest first)
    pub async fn ranking(&self, limit: i64) -> EconomyResult<Vec<AccountRow>> {
        let rows = sqlx::query_as::<_, AccountRow>(
            "SELECT account_id, nickname, balance, total_damage, created_at
             FROM accounts ORDER BY total_damage DESC, account_id LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // ========================================================================
    // Inventory Operations
    // ========================================================================

    /// All positive-quantity items owned by the account.
    /// Lazily creates the account row on first touch.
    pub async fn get_inventory(&self, account_id: &str) -> EconomyResult<Vec<InventoryItemRow>> {
        self.ensure_account(account_id).await?;
        let rows = sqlx::query_as::<_, InventoryItemRow>(
            "SELECT account_id, item_id, quantity FROM inventory_items
             WHERE account_id = ? AND quantity > 0.0
             ORDER BY item_id",
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Current quantity of one item (0 when the account never held it)
    pub async fn get_item_quantity(&self, account_id: &str, item_id: &str) -> EconomyResult<f64> {
        let quantity: Option<f64> = sqlx::query_scalar(
            "SELECT quantity FROM inventory_items WHERE account_id = ? AND item_id = ?",
        )
        .bind(account_id)
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(quantity.unwrap_or(0.0))
    }

    /// Apply a batch of signed quantity deltas to one account in one atomic
    /// step. If any resulting quantity would go negative the whole batch
    /// fails with `InsufficientInventory` and nothing is changed.
    pub async fn adjust_inventory(
        &self,
        account_id: &str,
        deltas: &[(String, f64)],
    ) -> EconomyResult<()> {
        if deltas.is_empty() {
            return Err(EconomyError::Validation("empty delta batch".into()));
        }
        let mut tx = self.pool.begin().await?;
        ensure_account_tx(&mut tx, account_id).await?;
        apply_inventory_deltas(&mut tx, account_id, deltas).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Move currency and/or item quantity between two accounts in one
    /// transaction. Used by internal tooling and admin flows.
    pub async fn transfer(
        &self,
        from_account: &str,
        to_account: &str,
        amount: f64,
        item: Option<(&str, f64)>,
    ) -> EconomyResult<()> {
        require_non_negative("amount", amount)?;
        if let Some((_, quantity)) = item {
            require_non_negative("quantity", quantity)?;
        }
        if from_account == to_account {
            return Err(EconomyError::InvalidOperation(
                "transfer to the same account".into(),
            ));
        }

        let mut tx = self.pool.begin().await?;
        ensure_account_tx(&mut tx, from_account).await?;
        ensure_account_tx(&mut tx, to_account).await?;

        if amount > 0.0 {
            debit_balance_tx(&mut tx, from_account, amount).await?;
            sqlx::query("UPDATE accounts SET balance = balance + ? WHERE account_id = ?")
                .bind(amount)
                .bind(to_account)
                .execute(&mut *tx)
                .await?;
        }

        if let Some((item_id, quantity)) = item {
            if quantity > 0.0 {
                apply_inventory_deltas(
                    &mut tx,
                    from_account,
                    &[(item_id.to_string(), -quantity)],
                )
                .await?;
                apply_inventory_deltas(&mut tx, to_account, &[(item_id.to_string(), quantity)])
                    .await?;
            }
        }

        tx.commit().await?;
        Ok(())
    }

    // ========================================================================
    // Marketplace Operations (listings with inventory escrow)
    // ========================================================================

    /// Create a listing, moving `quantity` of the seller's stock into escrow
    pub async fn create_listing(
        &self,
        seller_id: &str,
        item_id: &str,
        price_per_unit: f64,
        quantity: f64,
    ) -> EconomyResult<i64> {
        require_positive_price(price_per_unit)?;
        require_positive_integer("quantity", quantity)?;

        let mut tx = self.pool.begin().await?;
        ensure_account_tx(&mut tx, seller_id).await?;

        // Reserve the stock first; shortfall aborts before the insert
        apply_inventory_deltas(&mut tx, seller_id, &[(item_id.to_string(), -quantity)]).await?;

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO listings (seller_id, item_id, price_per_unit, quantity, created_at)
             VALUES (?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(seller_id)
        .bind(item_id)
        .bind(price_per_unit)
        .bind(quantity)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        info!(
            "Listing {} created: {} x{} at {} by {}",
            id, item_id, quantity, price_per_unit, seller_id
        );
        Ok(id)
    }

    /// Get a listing by id
    pub async fn get_listing(&self, id: i64) -> EconomyResult<Option<ListingRow>> {
        let row = sqlx::query_as::<_, ListingRow>(
            "SELECT id, seller_id, item_id, price_per_unit, quantity, created_at
             FROM listings WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Browse listings: the viewer's own or everyone else's, optionally
    /// narrowed to one item type, newest first
    pub async fn list_listings(
        &self,
        viewer_id: &str,
        mine: bool,
        item_id: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> EconomyResult<Vec<ListingRow>> {
        // Only fixed SQL fragments are selected here; every value is bound
        let seller_clause = if mine {
            "seller_id = ?"
        } else {
            "seller_id != ?"
        };
        let item_clause = if item_id.is_some() {
            "AND item_id = ?"
        } else {
            ""
        };
        let sql = format!(
            "SELECT id, seller_id, item_id, price_per_unit, quantity, created_at
             FROM listings WHERE {seller_clause} {item_clause}
             ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?"
        );

        let mut query = sqlx::query_as::<_, ListingRow>(&sql).bind(viewer_id);
        if let Some(item) = item_id {
            query = query.bind(item);
        }
        let rows = query
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Purchase `quantity` units from a listing.
    ///
    /// One transaction: lock the listing, then the buyer, then the seller;
    /// debit the buyer the full total, credit the seller the total minus the
    /// configured fee, hand the goods to the buyer, shrink or delete the
    /// listing, append the trade log entry. Any failure rolls back all of it.
    pub async fn purchase_listing(
        &self,
        buyer_id: &str,
        listing_id: i64,
        quantity: f64,
    ) -> EconomyResult<TradeReceipt> {
        require_positive_integer("quantity", quantity)?;

        let mut tx = self.pool.begin().await?;

        let listing = sqlx::query_as::<_, ListingRow>(
            "SELECT id, seller_id, item_id, price_per_unit, quantity, created_at
             FROM listings WHERE id = ?",
        )
        .bind(listing_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| EconomyError::NotFound(format!("listing {listing_id}")))?;

        if listing.seller_id == buyer_id {
            return Err(EconomyError::InvalidOperation(
                "cannot purchase your own listing".into(),
            ));
        }
        if quantity > listing.quantity {
            return Err(EconomyError::InsufficientQuantity {
                requested: quantity,
                available: listing.quantity,
            });
        }

        let total = listing.price_per_unit * quantity;
        let fee = total * self.fee_rate;
        let seller_receives = total - fee;

        ensure_account_tx(&mut tx, buyer_id).await?;
        debit_balance_tx(&mut tx, buyer_id, total).await?;

        sqlx::query("UPDATE accounts SET balance = balance + ? WHERE account_id = ?")
            .bind(seller_receives)
            .bind(&listing.seller_id)
            .execute(&mut *tx)
            .await?;

        apply_inventory_deltas(&mut tx, buyer_id, &[(listing.item_id.clone(), quantity)]).await?;

        if (listing.quantity - quantity).abs() < f64::EPSILON {
            sqlx::query("DELETE FROM listings WHERE id = ?")
                .bind(listing_id)
                .execute(&mut *tx)
                .await?;
        } else {
            sqlx::query("UPDATE listings SET quantity = quantity - ? WHERE id = ?")
                .bind(quantity)
                .bind(listing_id)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query(
            "INSERT INTO trade_log (seller_id, buyer_id, item_id, price_per_unit, quantity, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&listing.seller_id)
        .bind(buyer_id)
        .bind(&listing.item_id)
        .bind(listing.price_per_unit)
        .bind(quantity)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        info!(
            "Listing {} purchase: {} bought {} x{} for {} (fee {})",
            listing_id, buyer_id, listing.item_id, quantity, total, fee
        );

        Ok(TradeReceipt {
            listing_id,
            seller_id: listing.seller_id,
            item_id: listing.item_id,
            price_per_unit: listing.price_per_unit,
            quantity,
            total,
            fee,
        })
    }

    /// Cancel `quantity` units of the caller's own listing, returning the
    /// escrowed stock to their inventory
    pub async fn cancel_listing(
        &self,
        seller_id: &str,
        listing_id: i64,
        quantity: f64,
    ) -> EconomyResult<()> {
        require_positive_integer("quantity", quantity)?;

        let mut tx = self.pool.begin().await?;

        let listing = sqlx::query_as::<_, ListingRow>(
            "SELECT id, seller_id, item_id, price_per_unit, quantity, created_at
             FROM listings WHERE id = ?",
        )
        .bind(listing_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| EconomyError::NotFound(format!("listing {listing_id}")))?;

        if listing.seller_id != seller_id {
            warn!(
                "Listing {} cancel rejected: {} is not the seller",
                listing_id, seller_id
            );
            return Err(EconomyError::Forbidden(
                "only the seller may cancel a listing".into(),
            ));
        }
        if quantity > listing.quantity {
            return Err(EconomyError::InsufficientQuantity {
                requested: quantity,
                available: listing.quantity,
            });
        }

        apply_inventory_deltas(&mut tx, seller_id, &[(listing.item_id.clone(), quantity)])
            .await?;

        if (listing.quantity - quantity).abs() < f64::EPSILON {
            sqlx::query("DELETE FROM listings WHERE id = ?")
                .bind(listing_id)
                .execute(&mut *tx)
                .await?;
        } else {
            sqlx::query("UPDATE listings SET quantity = quantity - ? WHERE id = ?")
                .bind(quantity)
                .bind(listing_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        info!(
            "Listing {} cancelled: {} x{} returned to {}",
            listing_id, listing.item_id, quantity, seller_id
        );
        Ok(())
    }

    /// Most recent trade log entries (audit view)
    pub async fn recent_trades(&self, limit: i64) -> EconomyResult<Vec<TradeLogRow>> {
        let rows = sqlx::query_as::<_, TradeLogRow>(
            "SELECT id, seller_id, buyer_id, item_id, price_per_unit, quantity, created_at
             FROM trade_log ORDER BY id DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // ========================================================================
    // Reward Application
    // ========================================================================

    /// Record one damage event: accumulate the damage stat, accrue the coin
    /// reward, and credit the dropped item if the gate produced one -- all in
    /// a single transaction.
    pub async fn apply_damage_event(
        &self,
        account_id: &str,
        damage: f64,
        coin_gain: f64,
        dropped_item: Option<&str>,
    ) -> EconomyResult<()> {
        require_non_negative("damage", damage)?;
        require_non_negative("coin_gain", coin_gain)?;

        let mut tx = self.pool.begin().await?;
        sqlx::query(
            "INSERT INTO accounts (account_id, balance, total_damage, created_at)
             VALUES (?, ?, ?, ?)
             ON CONFLICT(account_id) DO UPDATE SET
                balance = balance + excluded.balance,
                total_damage = total_damage + excluded.total_damage",
        )
        .bind(account_id)
        .bind(coin_gain)
        .bind(damage)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        if let Some(item_id) = dropped_item {
            apply_inventory_deltas(&mut tx, account_id, &[(item_id.to_string(), 1.0)]).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Apply a paid pull: debit the full cost once, then credit every drawn
    /// item. A failed debit applies zero draws.
    pub async fn apply_gacha(
        &self,
        account_id: &str,
        total_cost: f64,
        drawn_items: &[String],
    ) -> EconomyResult<f64> {
        require_non_negative("total_cost", total_cost)?;

        let mut tx = self.pool.begin().await?;
        ensure_account_tx(&mut tx, account_id).await?;
        let balance = debit_balance_tx(&mut tx, account_id, total_cost).await?;

        for item_id in drawn_items {
            apply_inventory_deltas(&mut tx, account_id, &[(item_id.clone(), 1.0)]).await?;
        }

        tx.commit().await?;
        Ok(balance)
    }
}

// ============================================================================
// Transaction helpers (shared steps inside an open transaction)
// ============================================================================

async fn ensure_account_tx(
    tx: &mut Transaction<'_, Sqlite>,
    account_id: &str,
) -> EconomyResult<()> {
    sqlx::query(
        "INSERT INTO accounts (account_id, created_at) VALUES (?, ?)
         ON CONFLICT(account_id) DO NOTHING",
    )
    .bind(account_id)
    .bind(Utc::now())
    .execute(&mut **tx)
    .await?;
    Ok(())
}

async fn debit_balance_tx(
    tx: &mut Transaction<'_, Sqlite>,
    account_id: &str,
    amount: f64,
) -> EconomyResult<f64> {
    let balance: f64 = sqlx::query_scalar("SELECT balance FROM accounts WHERE account_id = ?")
        .bind(account_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| EconomyError::NotFound(format!("account {account_id}")))?;

    if balance < amount {
        return Err(EconomyError::InsufficientFunds {
            have: balance,
            need: amount,
        });
    }

    let new_balance: f64 = sqlx::query_scalar(
        "UPDATE accounts SET balance = balance - ? WHERE account_id = ? RETURNING balance",
    )
    .bind(amount)
    .bind(account_id)
    .fetch_one(&mut **tx)
    .await?;
    Ok(new_balance)
}

/// Apply signed deltas to one account's inventory inside an open transaction.
/// Reads see earlier writes of the same transaction, so repeated item ids in
/// one batch accumulate correctly.
async fn apply_inventory_deltas(
    tx: &mut Transaction<'_, Sqlite>,
    account_id: &str,
    deltas: &[(String, f64)],
) -> EconomyResult<()> {
    for (item_id, delta) in deltas {
        if !delta.is_finite() {
            return Err(EconomyError::Validation(format!(
                "non-finite delta for '{item_id}'"
            )));
        }
        let have: f64 = sqlx::query_scalar(
            "SELECT quantity FROM inventory_items WHERE account_id = ? AND item_id = ?",
        )
        .bind(account_id)
        .bind(item_id)
        .fetch_optional(&mut **tx)
        .await?
        .unwrap_or(0.0);

        let next = have + delta;
        if next < 0.0 {
            return Err(EconomyError::InsufficientInventory {
                item: item_id.clone(),
                have,
                need: -delta,
            });
        }

        sqlx::query(
            "INSERT INTO inventory_items (account_id, item_id, quantity) VALUES (?, ?, ?)
             ON CONFLICT(account_id, item_id) DO UPDATE SET quantity = excluded.quantity",
        )
        .bind(account_id)
        .bind(item_id)
        .bind(next)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

// ============================================================================
// Input validation (rejected before any I/O)
// ============================================================================

fn require_non_negative(name: &str, value: f64) -> EconomyResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(EconomyError::Validation(format!(
            "{name} must be a non-negative number, got {value}"
        )));
    }
    Ok(())
}

fn require_positive_price(value: f64) -> EconomyResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(EconomyError::Validation(format!(
            "price_per_unit must be positive, got {value}"
        )));
    }
    Ok(())
}

fn require_positive_integer(name: &str, value: f64) -> EconomyResult<()> {
    if !value.is_finite() || value <= 0.0 || value.fract() != 0.0 {
        return Err(EconomyError::Validation(format!(
            "{name} must be a positive whole number, got {value}"
        )));
    }
    Ok(())
}

// ============================================================================
// Row types (for sqlx query_as mapping)
// ============================================================================

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AccountRow {
    pub account_id: String,
    pub nickname: Option<String>,
    pub balance: f64,
    pub total_damage: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InventoryItemRow {
    pub account_id: String,
    pub item_id: String,
    pub quantity: f64,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ListingRow {
    pub id: i64,
    pub seller_id: String,
    pub item_id: String,
    pub price_per_unit: f64,
    pub quantity: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TradeLogRow {
    pub id: i64,
    pub seller_id: String,
    pub buyer_id: String,
    pub item_id: String,
    pub price_per_unit: f64,
    pub quantity: f64,
    pub created_at: DateTime<Utc>,
}

/// Outcome of a successful purchase
#[derive(Debug, Clone, Serialize)]
pub struct TradeReceipt {
    pub listing_id: i64,
    pub seller_id: String,
    pub item_id: String,
    pub price_per_unit: f64,
    pub quantity: f64,
    pub total: f64,
    pub fee: f64,
}
