use std::fmt;
use std::path::{Path, PathBuf};

use log::warn;

use crate::store;
use crate::types::{ConfigFile, Prize, Settings};

/// Upper bound on the prize list size.
pub const MAX_PRIZES: usize = 100;

/// Rejected prize-list operation.
#[derive(Debug)]
pub enum PrizeError {
    /// The list already holds [`MAX_PRIZES`] entries.
    ListFull,
    /// Index past the end of the prize list.
    OutOfRange,
    /// The config file could not be written.
    Io(anyhow::Error),
}

impl fmt::Display for PrizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrizeError::ListFull => write!(f, "prize list is full ({} entries)", MAX_PRIZES),
            PrizeError::OutOfRange => write!(f, "prize index out of range"),
            PrizeError::Io(err) => write!(f, "failed to save prize config: {}", err),
        }
    }
}

impl std::error::Error for PrizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PrizeError::Io(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

/// Owner of the prize list, backed by a JSON config file.
///
/// The list is only changed through [`add`](PrizeStore::add),
/// [`update`](PrizeStore::update), [`remove`](PrizeStore::remove) and
/// [`set_prizes`](PrizeStore::set_prizes), and is persisted as a whole on
/// [`save`](PrizeStore::save).
pub struct PrizeStore {
    path: PathBuf,
    prizes: Vec<Prize>,
    settings: Settings,
}

impl PrizeStore {
    /// Construct a store bound to `path` and load it.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let mut store = PrizeStore {
            path: path.into(),
            prizes: Vec::new(),
            settings: Settings::default(),
        };
        store.load();
        store
    }

    /// Built-in default prize list, used when no usable config exists.
    fn default_prizes() -> Vec<Prize> {
        vec![
            Prize::new("First Prize", 10, "resources/images/prize1.png"),
            Prize::new("Second Prize", 30, "resources/images/prize2.png"),
            Prize::new("Third Prize", 60, "resources/images/prize3.png"),
        ]
    }

    /// (Re)load the prize list from the config file.
    ///
    /// A missing, unreadable or empty config is replaced by the built-in
    /// defaults, which are written back so the file exists afterwards.
    /// Never fails toward the caller.
    pub fn load(&mut self) {
        match store::read_json::<ConfigFile>(&self.path) {
            Ok(config) => {
                self.prizes = config.prizes;
                self.settings = config.settings;
            }
            Err(err) => {
                if self.path.exists() {
                    warn!("failed to load prize config: {:#}", err);
                }
                self.prizes = Vec::new();
                self.settings = Settings::default();
            }
        }

        if self.prizes.is_empty() {
            self.prizes = Self::default_prizes();
            if let Err(err) = self.save() {
                warn!("failed to write default prize config: {}", err);
            }
        }
    }

    /// Persist the current prize list.
    ///
    /// Merge-on-write: the existing file is re-read and only the `prizes`
    /// key is replaced, so settings and unknown top-level keys survive.
    pub fn save(&self) -> Result<(), PrizeError> {
        let mut config = store::read_json::<ConfigFile>(&self.path).unwrap_or_default();
        config.prizes = self.prizes.clone();
        store::write_json_atomic(&self.path, &config).map_err(PrizeError::Io)
    }

    /// Append a prize. Rejected once the list holds [`MAX_PRIZES`] entries.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        weight: u32,
        image: impl Into<String>,
    ) -> Result<(), PrizeError> {
        if self.prizes.len() >= MAX_PRIZES {
            return Err(PrizeError::ListFull);
        }
        self.prizes.push(Prize::new(name, weight, image));
        Ok(())
    }

    /// Replace the prize at `index`.
    pub fn update(
        &mut self,
        index: usize,
        name: impl Into<String>,
        weight: u32,
        image: impl Into<String>,
    ) -> Result<(), PrizeError> {
        match self.prizes.get_mut(index) {
            Some(slot) => {
                *slot = Prize::new(name, weight, image);
                Ok(())
            }
            None => Err(PrizeError::OutOfRange),
        }
    }

    /// Remove the prize at `index`.
    pub fn remove(&mut self, index: usize) -> Result<(), PrizeError> {
        if index >= self.prizes.len() {
            return Err(PrizeError::OutOfRange);
        }
        self.prizes.remove(index);
        Ok(())
    }

    /// Weights in list order. Draw results index into the same order.
    pub fn weights(&self) -> Vec<u32> {
        self.prizes.iter().map(|p| p.weight).collect()
    }

    pub fn prizes(&self) -> &[Prize] {
        &self.prizes
    }

    pub fn get(&self, index: usize) -> Option<&Prize> {
        self.prizes.get(index)
    }

    /// Replace the whole list in memory. Does not persist.
    pub fn set_prizes(&mut self, prizes: Vec<Prize>) {
        self.prizes = prizes;
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn len(&self) -> usize {
        self.prizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prizes.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::temp_path;
    use std::fs;

    #[test]
    fn missing_config_yields_defaults_and_creates_file() {
        let path = temp_path("prizes-missing.json");
        let _ = fs::remove_file(&path);

        let store = PrizeStore::open(&path);
        assert_eq!(store.len(), 3);
        assert_eq!(store.weights(), vec![10, 30, 60]);
        assert_eq!(store.prizes()[0].name, "First Prize");
        assert!(path.exists());
    }

    #[test]
    fn malformed_config_is_replaced_by_defaults() {
        let path = temp_path("prizes-malformed.json");
        fs::write(&path, "{broken").unwrap();

        let store = PrizeStore::open(&path);
        assert_eq!(store.weights(), vec![10, 30, 60]);

        // The broken file was rewritten with something loadable.
        let reopened = PrizeStore::open(&path);
        assert_eq!(reopened.weights(), vec![10, 30, 60]);
    }

    #[test]
    fn save_load_round_trip() {
        let path = temp_path("prizes-round-trip.json");
        let _ = fs::remove_file(&path);

        let mut store = PrizeStore::open(&path);
        store.set_prizes(vec![
            Prize::new("Nothing", 0, "resources/images/none.png"),
            Prize::new("Sticker", 45, "resources/images/sticker.png"),
            Prize::new("Figure", 5, "resources/images/figure.png"),
        ]);
        store.save().unwrap();

        let reopened = PrizeStore::open(&path);
        assert_eq!(reopened.prizes(), store.prizes());
        assert_eq!(reopened.weights(), vec![0, 45, 5]);
    }

    #[test]
    fn round_trip_at_max_capacity() {
        let path = temp_path("prizes-max.json");
        let _ = fs::remove_file(&path);

        let mut store = PrizeStore::open(&path);
        store.set_prizes(Vec::new());
        for i in 0..MAX_PRIZES {
            store.add(format!("P{}", i), i as u32, "p.png").unwrap();
        }
        assert!(matches!(
            store.add("overflow", 1, "p.png"),
            Err(PrizeError::ListFull)
        ));
        store.save().unwrap();

        let reopened = PrizeStore::open(&path);
        assert_eq!(reopened.len(), MAX_PRIZES);
        assert_eq!(reopened.prizes()[99].name, "P99");
        assert_eq!(reopened.prizes()[99].weight, 99);
    }

    #[test]
    fn update_and_remove_are_bounds_checked() {
        let path = temp_path("prizes-bounds.json");
        let _ = fs::remove_file(&path);

        let mut store = PrizeStore::open(&path);
        assert!(matches!(
            store.update(3, "X", 1, "x.png"),
            Err(PrizeError::OutOfRange)
        ));
        assert!(matches!(store.remove(3), Err(PrizeError::OutOfRange)));
        assert_eq!(store.len(), 3);

        store.update(1, "Renamed", 99, "new.png").unwrap();
        assert_eq!(store.get(1).unwrap().name, "Renamed");
        assert_eq!(store.get(1).unwrap().weight, 99);

        store.remove(0).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.prizes()[0].name, "Renamed");
    }

    #[test]
    fn save_preserves_unrelated_keys() {
        let path = temp_path("prizes-merge.json");
        fs::write(
            &path,
            r#"{
                "prizes": [{"name": "Old", "weight": 1, "image": "old.png"}],
                "settings": {"animation_speed": 25, "sound_enabled": false, "language": "en_US"},
                "window": {"width": 800, "height": 600}
            }"#,
        )
        .unwrap();

        let mut store = PrizeStore::open(&path);
        assert_eq!(store.settings().animation_speed, 25);
        store.set_prizes(vec![Prize::new("New", 7, "new.png")]);
        store.save().unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["prizes"][0]["name"], "New");
        assert_eq!(raw["settings"]["animation_speed"], 25);
        assert_eq!(raw["settings"]["language"], "en_US");
        assert_eq!(raw["window"]["width"], 800);
    }

    #[test]
    fn partial_prize_entries_are_filled_on_load() {
        let path = temp_path("prizes-partial.json");
        fs::write(&path, r#"{"prizes": [{"name": "OnlyName"}, {"weight": 4}]}"#).unwrap();

        let store = PrizeStore::open(&path);
        assert_eq!(store.prizes()[0].name, "OnlyName");
        assert_eq!(store.prizes()[0].weight, 1);
        assert_eq!(store.prizes()[1].name, "Unnamed");
        assert_eq!(store.prizes()[1].weight, 4);
        assert_eq!(store.prizes()[1].image, "resources/images/prize1.png");
    }
}
