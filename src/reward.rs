//! Reward Sampler — rarity-weighted categorical random selection
//!
//! Both the passive drop engine and the paid gacha engine draw from the same
//! weighted table. The table is an immutable snapshot built from the catalog:
//! `refresh()` swaps in a new snapshot atomically while in-flight pulls keep
//! drawing from the one they already hold, so a catalog reload never blocks
//! or corrupts a draw.
//!
//! Weight law: `weight(rarity) = 0.4^rarity`. Rarity 0 carries the maximum
//! weight; each additional rarity step cuts the selection probability by 2.5x.
//! Selection is a binary search over a strictly increasing cumulative-weight
//! array: `O(n)` to build, `O(log n)` per pull.

use std::sync::Arc;

use parking_lot::RwLock;
use rand::Rng;
use serde::Serialize;
use tracing::info;

use crate::error::{EconomyError, EconomyResult};
use crate::storage::catalog::{CatalogEntry, CatalogStore};

/// Base of the rarity weight law, in (0, 1); smaller = steeper falloff
pub const RARITY_WEIGHT_BASE: f64 = 0.4;

/// One weighted draw result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampledItem {
    pub item_id: String,
    pub rarity: u32,
}

/// Immutable weight table snapshot.
///
/// Entries are sorted by ascending rarity so a rarity cutoff is a prefix of
/// the table: capped draws stay `O(log n)` without rebuilding anything.
#[derive(Debug, Default)]
pub struct WeightTable {
    /// `(item_id, rarity)` ordered by ascending rarity, then item id
    entries: Vec<(String, u32)>,
    /// Strictly increasing cumulative weights aligned to `entries`
    cumulative: Vec<f64>,
    version: u64,
}

impl WeightTable {
    fn build(items: &[CatalogEntry], version: u64) -> Self {
        let mut entries: Vec<(String, u32)> = items
            .iter()
            .map(|item| (item.item_id.clone(), item.rarity))
            .collect();
        entries.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));

        let mut cumulative = Vec::with_capacity(entries.len());
        let mut total = 0.0;
        for (_, rarity) in &entries {
            total += RARITY_WEIGHT_BASE.powi(*rarity as i32);
            cumulative.push(total);
        }

        Self {
            entries,
            cumulative,
            version,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Sum of unnormalized weights over the whole table
    pub fn total_weight(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Selection probability of entry `index` over the full table
    pub fn normalized_weight(&self, index: usize) -> f64 {
        let prev = if index == 0 {
            0.0
        } else {
            self.cumulative[index - 1]
        };
        (self.cumulative[index] - prev) / self.total_weight()
    }

    /// Number of leading entries with rarity <= `max_rarity`
    fn prefix_len(&self, max_rarity: u32) -> usize {
        self.entries.partition_point(|(_, rarity)| *rarity <= max_rarity)
    }

    /// Draw from the first `prefix` entries: `u ~ Uniform(0, prefix total)`,
    /// then the smallest cumulative weight above `u` wins.
    fn draw<R: Rng>(&self, rng: &mut R, prefix: usize) -> Option<SampledItem> {
        if prefix == 0 {
            return None;
        }
        let bound = self.cumulative[prefix - 1];
        let u = rng.gen::<f64>() * bound;
        let index = self.cumulative[..prefix].partition_point(|&c| c <= u);
        let (item_id, rarity) = &self.entries[index.min(prefix - 1)];
        Some(SampledItem {
            item_id: item_id.clone(),
            rarity: *rarity,
        })
    }
}

/// Rarity-weighted sampler over the current catalog snapshot
pub struct RewardSampler {
    table: RwLock<Arc<WeightTable>>,
}

impl Default for RewardSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl RewardSampler {
    /// Empty sampler; `refresh()` must run before the first pull
    pub fn new() -> Self {
        Self {
            table: RwLock::new(Arc::new(WeightTable::default())),
        }
    }

    /// Rebuild the weight table from the catalog and swap it in atomically.
    /// Returns the number of items in the new table.
    pub fn refresh(&self, catalog: &CatalogStore) -> EconomyResult<usize> {
        let items = catalog.get_all_items()?;
        let version = self.table.read().version + 1;
        let table = Arc::new(WeightTable::build(&items, version));
        let len = table.len();
        *self.table.write() = table;
        info!("Reward table refreshed: {} items (version {})", len, version);
        Ok(len)
    }

    /// Current snapshot; stays valid across concurrent refreshes
    pub fn snapshot(&self) -> Arc<WeightTable> {
        self.table.read().clone()
    }

    pub fn table_len(&self) -> usize {
        self.table.read().len()
    }

    pub fn table_version(&self) -> u64 {
        self.table.read().version
    }

    /// One categorical draw over the full catalog
    pub fn pull(&self) -> EconomyResult<SampledItem> {
        let table = self.snapshot();
        if table.is_empty() {
            return Err(EconomyError::NotInitialized);
        }
        let len = table.len();
        table
            .draw(&mut rand::thread_rng(), len)
            .ok_or_else(|| EconomyError::InvariantViolation("empty draw from non-empty table".into()))
    }

    /// One draw restricted to items with rarity <= `max_rarity`.
    /// `Ok(None)` when the cutoff leaves no candidates.
    pub fn pull_capped(&self, max_rarity: u32) -> EconomyResult<Option<SampledItem>> {
        let table = self.snapshot();
        if table.is_empty() {
            return Err(EconomyError::NotInitialized);
        }
        let prefix = table.prefix_len(max_rarity);
        Ok(table.draw(&mut rand::thread_rng(), prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn entry(item_id: &str, rarity: u32) -> CatalogEntry {
        CatalogEntry {
            item_id: item_id.into(),
            display_name: item_id.into(),
            category: "Test".into(),
            description: String::new(),
            rarity,
        }
    }

    fn table(specs: &[(&str, u32)]) -> WeightTable {
        let items: Vec<_> = specs.iter().map(|(id, r)| entry(id, *r)).collect();
        WeightTable::build(&items, 1)
    }

    #[test]
    fn test_entries_sorted_by_rarity() {
        let t = table(&[("rare", 11), ("common", 0), ("mid", 4)]);
        let rarities: Vec<u32> = t.entries.iter().map(|(_, r)| *r).collect();
        assert_eq!(rarities, vec![0, 4, 11]);
    }

    #[test]
    fn test_cumulative_strictly_increasing_and_normalized() {
        let t = table(&[("a", 0), ("b", 1), ("c", 2), ("d", 5), ("e", 11)]);
        for pair in t.cumulative.windows(2) {
            assert!(pair[1] > pair[0]);
        }
        let sum: f64 = (0..t.len()).map(|i| t.normalized_weight(i)).sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_weight_law() {
        let t = table(&[("common", 0), ("rare", 3)]);
        // weight(0) = 1.0, weight(3) = 0.4^3 = 0.064
        assert!((t.total_weight() - 1.064).abs() < 1e-12);
        let ratio = t.normalized_weight(0) / t.normalized_weight(1);
        assert!((ratio - 1.0 / RARITY_WEIGHT_BASE.powi(3)).abs() < 1e-9);
    }

    #[test]
    fn test_draw_favors_common_items() {
        let t = table(&[("common", 0), ("rare", 6)]);
        let mut rng = StdRng::seed_from_u64(42);
        let mut commons = 0;
        for _ in 0..10_000 {
            let item = t.draw(&mut rng, t.len()).unwrap();
            if item.item_id == "common" {
                commons += 1;
            }
        }
        // P(common) = 1 / (1 + 0.4^6) ≈ 0.9959
        assert!(commons > 9_800, "commons = {commons}");
    }

    #[test]
    fn test_rarity_cutoff_is_a_prefix() {
        let t = table(&[("a", 0), ("b", 2), ("c", 2), ("d", 7)]);
        assert_eq!(t.prefix_len(0), 1);
        assert_eq!(t.prefix_len(2), 3);
        assert_eq!(t.prefix_len(6), 3);
        assert_eq!(t.prefix_len(7), 4);

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1_000 {
            let item = t.draw(&mut rng, t.prefix_len(2)).unwrap();
            assert!(item.rarity <= 2);
        }
    }

    #[test]
    fn test_empty_prefix_yields_nothing() {
        let t = table(&[("a", 3)]);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(t.draw(&mut rng, 0).is_none());
    }

    #[test]
    fn test_pull_before_refresh_fails() {
        let sampler = RewardSampler::new();
        assert!(matches!(
            sampler.pull().unwrap_err(),
            EconomyError::NotInitialized
        ));
        assert!(matches!(
            sampler.pull_capped(5).unwrap_err(),
            EconomyError::NotInitialized
        ));
    }

    #[test]
    fn test_refresh_swaps_without_disturbing_held_snapshot() {
        let tmp = tempfile::tempdir().unwrap();
        let catalog =
            CatalogStore::new(tmp.path().join("catalog"), 10 * 1024 * 1024).unwrap();
        catalog.put_item(&entry("first", 0)).unwrap();

        let sampler = RewardSampler::new();
        sampler.refresh(&catalog).unwrap();
        let held = sampler.snapshot();
        assert_eq!(held.len(), 1);

        catalog.put_item(&entry("second", 1)).unwrap();
        sampler.refresh(&catalog).unwrap();

        // The held snapshot is unchanged; the sampler serves the new one
        assert_eq!(held.len(), 1);
        assert_eq!(sampler.table_len(), 2);
        assert!(sampler.table_version() > held.version());

        let item = sampler.pull().unwrap();
        assert!(item.item_id == "first" || item.item_id == "second");
    }
}
