//! Gacha Engine — currency-gated reward pulls
//!
//! A pull costs a flat 500 coins. Multi-pulls debit the whole cost once and
//! then perform independent categorical draws, each credited individually;
//! when the debit fails nothing is drawn or credited. The debit, the item
//! credits and the balance check all live in one ledger transaction.

use std::sync::Arc;

use tracing::info;

use crate::error::{EconomyError, EconomyResult};
use crate::reward::{RewardSampler, SampledItem};
use crate::storage::ledger::LedgerStore;

/// Flat currency cost of a single pull
pub const PULL_COST: f64 = 500.0;
/// Upper bound on pulls per request
pub const MAX_PULLS_PER_REQUEST: u32 = 100;

/// Wraps the sampler with a fixed-cost gate and applies results via the Ledger
pub struct GachaEngine {
    sampler: Arc<RewardSampler>,
    ledger: Arc<LedgerStore>,
}

impl GachaEngine {
    pub fn new(sampler: Arc<RewardSampler>, ledger: Arc<LedgerStore>) -> Self {
        Self { sampler, ledger }
    }

    /// One paid pull: debit 500, draw once, credit the item
    pub async fn pull(&self, account_id: &str) -> EconomyResult<SampledItem> {
        let mut items = self.pull_many(account_id, 1).await?;
        items
            .pop()
            .ok_or_else(|| EconomyError::InvariantViolation("single pull yielded no item".into()))
    }

    /// `count` paid pulls: debit `500 × count` once, then `count` independent
    /// draws, each credited. A failed debit applies zero draws.
    pub async fn pull_many(
        &self,
        account_id: &str,
        count: u32,
    ) -> EconomyResult<Vec<SampledItem>> {
        if count == 0 || count > MAX_PULLS_PER_REQUEST {
            return Err(EconomyError::Validation(format!(
                "pull count must be in 1..={MAX_PULLS_PER_REQUEST}, got {count}"
            )));
        }

        let draws = (0..count)
            .map(|_| self.sampler.pull())
            .collect::<EconomyResult<Vec<_>>>()?;

        let item_ids: Vec<String> = draws.iter().map(|item| item.item_id.clone()).collect();
        let total_cost = PULL_COST * f64::from(count);
        let balance = self
            .ledger
            .apply_gacha(account_id, total_cost, &item_ids)
            .await?;

        info!(
            "Gacha: {} pulled {} item(s) for {} (balance now {})",
            account_id, count, total_cost, balance
        );
        Ok(draws)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::catalog::{CatalogEntry, CatalogStore};

    async fn engine() -> (GachaEngine, tempfile::TempDir) {
        let tmp = tempfile::tempdir().unwrap();
        let catalog =
            CatalogStore::new(tmp.path().join("catalog"), 10 * 1024 * 1024).unwrap();
        for (id, rarity) in [("ore_iron", 0), ("PrototechFrame", 11)] {
            catalog
                .put_item(&CatalogEntry {
                    item_id: id.into(),
                    display_name: id.into(),
                    category: "Test".into(),
                    description: String::new(),
                    rarity,
                })
                .unwrap();
        }
        let sampler = Arc::new(RewardSampler::new());
        sampler.refresh(&catalog).unwrap();
        let ledger = Arc::new(LedgerStore::in_memory(0.10).await.unwrap());
        (GachaEngine::new(sampler, ledger), tmp)
    }

    #[tokio::test]
    async fn test_single_pull_debits_flat_cost() {
        let (engine, _tmp) = engine().await;
        engine.ledger.credit_balance("a", 600.0).await.unwrap();

        let item = engine.pull("a").await.unwrap();
        assert!(!item.item_id.is_empty());

        let account = engine.ledger.get_account("a").await.unwrap().unwrap();
        assert_eq!(account.balance, 100.0);

        let total: f64 = engine
            .ledger
            .get_inventory("a")
            .await
            .unwrap()
            .iter()
            .map(|row| row.quantity)
            .sum();
        assert_eq!(total, 1.0);
    }

    #[tokio::test]
    async fn test_unaffordable_pull_draws_nothing() {
        let (engine, _tmp) = engine().await;
        engine.ledger.credit_balance("a", 499.0).await.unwrap();

        let err = engine.pull("a").await.unwrap_err();
        assert!(matches!(err, EconomyError::InsufficientFunds { .. }));
        assert_eq!(
            engine.ledger.get_account("a").await.unwrap().unwrap().balance,
            499.0
        );
        assert!(engine.ledger.get_inventory("a").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_multi_pull_debits_once_credits_each() {
        let (engine, _tmp) = engine().await;
        engine.ledger.credit_balance("a", 5_000.0).await.unwrap();

        let items = engine.pull_many("a", 10).await.unwrap();
        assert_eq!(items.len(), 10);

        let account = engine.ledger.get_account("a").await.unwrap().unwrap();
        assert_eq!(account.balance, 0.0);

        let total: f64 = engine
            .ledger
            .get_inventory("a")
            .await
            .unwrap()
            .iter()
            .map(|row| row.quantity)
            .sum();
        assert_eq!(total, 10.0);
    }

    #[tokio::test]
    async fn test_multi_pull_shortfall_is_all_or_nothing() {
        let (engine, _tmp) = engine().await;
        engine.ledger.credit_balance("a", 4_999.0).await.unwrap();

        let err = engine.pull_many("a", 10).await.unwrap_err();
        assert!(matches!(err, EconomyError::InsufficientFunds { have, need }
            if have == 4_999.0 && need == 5_000.0));
        assert!(engine.ledger.get_inventory("a").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_pull_count_bounds() {
        let (engine, _tmp) = engine().await;
        assert!(matches!(
            engine.pull_many("a", 0).await.unwrap_err(),
            EconomyError::Validation(_)
        ));
        assert!(matches!(
            engine
                .pull_many("a", MAX_PULLS_PER_REQUEST + 1)
                .await
                .unwrap_err(),
            EconomyError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn test_pull_without_table_fails_before_debit() {
        let sampler = Arc::new(RewardSampler::new());
        let ledger = Arc::new(LedgerStore::in_memory(0.10).await.unwrap());
        ledger.credit_balance("a", 1_000.0).await.unwrap();
        let engine = GachaEngine::new(sampler, ledger);

        let err = engine.pull("a").await.unwrap_err();
        assert!(matches!(err, EconomyError::NotInitialized));
        assert_eq!(
            engine.ledger.get_account("a").await.unwrap().unwrap().balance,
            1_000.0
        );
    }
}
