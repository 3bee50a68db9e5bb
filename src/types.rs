use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

fn default_name() -> String {
    "Unnamed".to_string()
}

fn default_weight() -> u32 {
    1
}

fn default_image() -> String {
    "resources/images/prize1.png".to_string()
}

/// A single prize definition.
///
/// Missing fields in a config file are filled with defaults at parse time
/// instead of failing the whole load.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Prize {
    #[serde(default = "default_name")]
    pub name: String,
    /// Relative draw likelihood. Zero is allowed; an all-zero list falls
    /// back to uniform selection.
    #[serde(default = "default_weight")]
    pub weight: u32,
    /// Path to a presentation asset. Opaque to the core.
    #[serde(default = "default_image")]
    pub image: String,
}

impl Prize {
    pub fn new(name: impl Into<String>, weight: u32, image: impl Into<String>) -> Self {
        Prize {
            name: name.into(),
            weight,
            image: image.into(),
        }
    }
}

/// The outcome of one draw: a snapshot of the selected prize, its index in
/// the list at draw time, and the moment the draw was finalized.
///
/// Later edits to the prize list do not touch a result already produced.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DrawResult {
    pub prize: Prize,
    pub index: usize,
    /// RFC 3339, assigned once at draw time.
    pub timestamp: String,
}

/// One persisted history entry, rebuilt from a [`DrawResult`] on append.
///
/// The prize fields are stored redundantly so records stay readable even
/// after the prize configuration changes or the prize is removed.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct HistoryEntry {
    pub prize: Prize,
    pub timestamp: String,
    pub index: usize,
}

impl From<&DrawResult> for HistoryEntry {
    fn from(result: &DrawResult) -> Self {
        HistoryEntry {
            prize: result.prize.clone(),
            timestamp: result.timestamp.clone(),
            index: result.index,
        }
    }
}

/// Per-name draw count as persisted in the history file.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct PrizeStat {
    pub count: u64,
}

/// The whole history file: `{draws: [...], statistics: {...}}`.
///
/// Statistics are keyed by prize name, so two prizes sharing a name merge
/// into one entry.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct HistoryData {
    #[serde(default)]
    pub draws: Vec<HistoryEntry>,
    #[serde(default)]
    pub statistics: BTreeMap<String, PrizeStat>,
}

/// Count plus share of the total, for display layers.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PrizeSummary {
    pub count: u64,
    /// Percentage of all draws, rounded to two decimals.
    pub percentage: f64,
}

/// Per-name summary derived from a set of draw results.
pub type StatisticsSummary = BTreeMap<String, PrizeSummary>;

fn default_animation_speed() -> u32 {
    10
}

fn default_sound_enabled() -> bool {
    true
}

fn default_language() -> String {
    "zh_CN".to_string()
}

/// Application settings stored alongside the prizes. The core fills in
/// defaults and carries them through a save but does not interpret them.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Settings {
    #[serde(default = "default_animation_speed")]
    pub animation_speed: u32,
    #[serde(default = "default_sound_enabled")]
    pub sound_enabled: bool,
    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            animation_speed: default_animation_speed(),
            sound_enabled: default_sound_enabled(),
            language: default_language(),
        }
    }
}

/// On-disk shape of the config file. Top-level keys the core does not know
/// about are kept in `extra` and written back verbatim on save.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ConfigFile {
    #[serde(default)]
    pub prizes: Vec<Prize>,
    #[serde(default)]
    pub settings: Settings,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}
