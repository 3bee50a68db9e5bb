use std::collections::BTreeMap;
use std::fmt;

use chrono::Local;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::prizes::PrizeStore;
use crate::types::{DrawResult, PrizeSummary, StatisticsSummary};

/// Rejected draw request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawError {
    /// The prize list is empty.
    NoPrizes,
    /// A previous draw is still animating.
    Busy,
}

impl fmt::Display for DrawError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawError::NoPrizes => write!(f, "no prizes available"),
            DrawError::Busy => write!(f, "a draw is already in progress"),
        }
    }
}

impl std::error::Error for DrawError {}

/// Weighted-random prize selection plus spin-animation frame sequencing.
///
/// Holds its own random source. `R` defaults to [`StdRng`]; tests inject a
/// seeded generator through [`with_rng`](DrawEngine::with_rng) or reseed the
/// default one with [`seed`](DrawEngine::seed).
pub struct DrawEngine<R: Rng = StdRng> {
    rng: R,
}

impl DrawEngine<StdRng> {
    pub fn new() -> Self {
        DrawEngine {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        DrawEngine {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Reset the random source to a known seed for reproducibility.
    pub fn seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }
}

impl Default for DrawEngine<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> DrawEngine<R> {
    pub fn with_rng(rng: R) -> Self {
        DrawEngine { rng }
    }

    /// Draw one prize from the store's current list.
    ///
    /// Each prize's probability is `weight / total`. A list whose weights
    /// sum to zero is drawn from uniformly; an empty list is an error.
    pub fn draw(&mut self, store: &PrizeStore) -> Result<DrawResult, DrawError> {
        let weights = store.weights();
        if weights.is_empty() {
            return Err(DrawError::NoPrizes);
        }

        let total: u64 = weights.iter().map(|&w| u64::from(w)).sum();
        let index = if total == 0 {
            self.rng.gen_range(0..weights.len())
        } else {
            // Bucket selection: first index whose cumulative weight reaches r.
            let r = self.rng.gen_range(1..=total);
            let mut cumulative = 0u64;
            let mut chosen = 0;
            for (i, &weight) in weights.iter().enumerate() {
                cumulative += u64::from(weight);
                if r <= cumulative {
                    chosen = i;
                    break;
                }
            }
            chosen
        };

        // weights() and prizes() share list order, so the index is in range.
        let prize = store.prizes()[index].clone();
        Ok(DrawResult {
            prize,
            index,
            timestamp: Local::now().to_rfc3339(),
        })
    }

    /// Build the frame sequence for the spin animation:
    /// `duration_ms / interval_ms` uniformly random indices followed by
    /// `final_index`. The caller plays it back on its own timer.
    ///
    /// An empty prize list yields an empty sequence.
    pub fn animation_frames(
        &mut self,
        store: &PrizeStore,
        final_index: usize,
        duration_ms: u32,
        interval_ms: u32,
    ) -> Vec<usize> {
        let total = store.len();
        if total == 0 {
            return Vec::new();
        }
        let spin_frames = if interval_ms == 0 {
            0
        } else {
            (duration_ms / interval_ms) as usize
        };
        let mut frames = Vec::with_capacity(spin_frames + 1);
        for _ in 0..spin_frames {
            frames.push(self.rng.gen_range(0..total));
        }
        frames.push(final_index);
        frames
    }

    /// Run `count` draws back to back, for probability checks.
    pub fn simulate_draws(
        &mut self,
        store: &PrizeStore,
        count: usize,
    ) -> Result<Vec<DrawResult>, DrawError> {
        let mut results = Vec::with_capacity(count);
        for _ in 0..count {
            results.push(self.draw(store)?);
        }
        Ok(results)
    }
}

/// Count and percentage per prize name over a set of results.
pub fn statistics(results: &[DrawResult]) -> StatisticsSummary {
    let total = results.len();
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for result in results {
        *counts.entry(result.prize.name.clone()).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(name, count)| {
            let percentage = if total > 0 {
                (count as f64 / total as f64 * 10_000.0).round() / 100.0
            } else {
                0.0
            };
            (name, PrizeSummary { count, percentage })
        })
        .collect()
}

/// Spin-animation playback, advanced by the caller's timer tick.
///
/// Purely cosmetic bookkeeping: skipping ticks (or the whole animation)
/// affects nothing but the display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Playback {
    Idle,
    Playing { frames: Vec<usize>, cursor: usize },
    Done { final_index: usize },
}

impl Playback {
    pub fn new() -> Self {
        Playback::Idle
    }

    /// Begin playing a frame sequence. Rejected while one is in flight;
    /// an empty sequence leaves the machine idle.
    pub fn start(&mut self, frames: Vec<usize>) -> Result<(), DrawError> {
        if self.is_busy() {
            return Err(DrawError::Busy);
        }
        *self = if frames.is_empty() {
            Playback::Idle
        } else {
            Playback::Playing { frames, cursor: 0 }
        };
        Ok(())
    }

    /// Advance one frame. Returns the frame to display, or `None` once
    /// playback has finished (or never started).
    pub fn tick(&mut self) -> Option<usize> {
        match self {
            Playback::Playing { frames, cursor } => {
                let frame = frames[*cursor];
                *cursor += 1;
                if *cursor == frames.len() {
                    *self = Playback::Done { final_index: frame };
                }
                Some(frame)
            }
            _ => None,
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, Playback::Playing { .. })
    }

    /// The landing frame, once playback has run to completion.
    pub fn finished(&self) -> Option<usize> {
        match self {
            Playback::Done { final_index } => Some(*final_index),
            _ => None,
        }
    }

    pub fn reset(&mut self) {
        *self = Playback::Idle;
    }
}

impl Default for Playback {
    fn default() -> Self {
        Playback::Idle
    }
}
