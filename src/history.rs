use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use log::warn;

use crate::store;
use crate::types::{DrawResult, HistoryData, HistoryEntry, PrizeStat};

/// Append-only ledger of past draws plus derived per-name counts, backed by
/// a JSON file. The file is the source of truth: every operation reads it
/// fresh and writes it back whole.
pub struct HistoryLedger {
    path: PathBuf,
}

impl HistoryLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        HistoryLedger { path: path.into() }
    }

    /// Read the ledger. A missing or unreadable file yields the empty
    /// default, which is also materialized on disk. Never fails toward the
    /// caller.
    pub fn load(&self) -> HistoryData {
        match store::read_json::<HistoryData>(&self.path) {
            Ok(data) => data,
            Err(err) => {
                if self.path.exists() {
                    warn!("failed to load draw history: {:#}", err);
                }
                let data = HistoryData::default();
                if let Err(err) = store::write_json_atomic(&self.path, &data) {
                    warn!("failed to write default draw history: {:#}", err);
                }
                data
            }
        }
    }

    /// Append one draw to the ledger.
    ///
    /// The statistics map is recomputed from the complete draw list rather
    /// than incremented, so it stays consistent even if the file was edited
    /// externally. The updated ledger is persisted atomically.
    pub fn append(&self, result: &DrawResult) -> Result<()> {
        let mut data = self.load();
        data.draws.push(HistoryEntry::from(result));
        data.statistics = Self::recompute_statistics(&data.draws);
        store::write_json_atomic(&self.path, &data)
    }

    /// Reset the ledger to empty. All history is lost.
    pub fn clear(&self) -> Result<()> {
        store::write_json_atomic(&self.path, &HistoryData::default())
    }

    /// All draws in append order, oldest first.
    pub fn all_records(&self) -> Vec<HistoryEntry> {
        self.load().draws
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn recompute_statistics(draws: &[HistoryEntry]) -> BTreeMap<String, PrizeStat> {
        let mut statistics: BTreeMap<String, PrizeStat> = BTreeMap::new();
        for draw in draws {
            statistics.entry(draw.prize.name.clone()).or_default().count += 1;
        }
        statistics
    }
}
