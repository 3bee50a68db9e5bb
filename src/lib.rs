//! Core of a capsule-toy ("gacha") machine: weighted prize selection,
//! spin-animation frame sequencing, and a persisted draw history with
//! derived statistics.
//!
//! The UI layer owns windows, timers and rendering; this crate owns the
//! bookkeeping. Both persisted documents (prize config and draw history)
//! are plain JSON files, written atomically so an interrupted process
//! never leaves a half-written file behind.
//!
//! One round, end to end:
//!
//! ```no_run
//! use gacha_core::{DrawEngine, HistoryLedger, Playback, PrizeStore};
//!
//! let store = PrizeStore::open("config/config.json");
//! let ledger = HistoryLedger::new("config/history.json");
//! let mut engine = DrawEngine::new();
//! let mut playback = Playback::new();
//!
//! let result = engine.draw(&store)?;
//! let frames = engine.animation_frames(&store, result.index, 1500, 50);
//! playback.start(frames)?;
//! while let Some(frame) = playback.tick() {
//!     // hand `frame` to the display layer, then wait one interval
//! }
//! ledger.append(&result)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod engine;
mod history;
mod prizes;
mod store;
mod types;

pub use engine::{statistics, DrawEngine, DrawError, Playback};
pub use history::HistoryLedger;
pub use prizes::{PrizeError, PrizeStore, MAX_PRIZES};
pub use types::{
    ConfigFile, DrawResult, HistoryData, HistoryEntry, Prize, PrizeStat, PrizeSummary, Settings,
    StatisticsSummary,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::temp_path;
    use std::fs;

    // The whole round trip the UI drives: draw, animate, record.
    #[test]
    fn draw_animate_record() {
        let config_path = temp_path("lib-config.json");
        let history_path = temp_path("lib-history.json");
        let _ = fs::remove_file(&config_path);
        let _ = fs::remove_file(&history_path);

        let store = PrizeStore::open(&config_path);
        let ledger = HistoryLedger::new(&history_path);
        let mut engine = DrawEngine::seeded(2024);
        let mut playback = Playback::new();

        for _ in 0..20 {
            let result = engine.draw(&store).unwrap();
            assert!(result.index < store.len());

            let frames = engine.animation_frames(&store, result.index, 500, 50);
            assert_eq!(frames.len(), 11);
            playback.start(frames).unwrap();

            // A second draw request mid-animation is rejected.
            assert_eq!(playback.start(vec![0]), Err(DrawError::Busy));
            while playback.tick().is_some() {}
            assert_eq!(playback.finished(), Some(result.index));

            ledger.append(&result).unwrap();
        }

        let data = ledger.load();
        assert_eq!(data.draws.len(), 20);
        let counted: u64 = data.statistics.values().map(|s| s.count).sum();
        assert_eq!(counted, 20);

        // Editing a prize later must not rewrite what was recorded.
        let mut store = store;
        let first_recorded = data.draws[0].prize.clone();
        store.update(0, "Edited", 1, "edited.png").unwrap();
        store.save().unwrap();
        assert_eq!(ledger.all_records()[0].prize, first_recorded);

        ledger.clear().unwrap();
        assert!(ledger.all_records().is_empty());
    }
}
