//! Local persistence for preferences and recent searches.
//!
//! Everything lives in one small JSON document. Stores only know how to load,
//! persist and reset that document; the list rules are shared here.

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fmt::Debug,
    fs,
    path::{Path, PathBuf},
};
use tracing::warn;

use crate::model::Unit;

pub const MAX_RECENT_SEARCHES: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentSearchEntry {
    pub city: String,
    pub country: String,
    pub timestamp: DateTime<Utc>,
    pub display_name: String,
}

impl RecentSearchEntry {
    pub fn new(city: &str, country: &str, timestamp: DateTime<Utc>) -> Self {
        let display_name =
            if country.is_empty() { city.to_string() } else { format!("{city}, {country}") };

        Self { city: city.to_string(), country: country.to_string(), timestamp, display_name }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// `None` until the user picks a unit.
    pub temperature_unit: Option<Unit>,
    pub alerts_dismissed: bool,
    pub preferred_location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreData {
    pub settings: Settings,
    pub recent_searches: Vec<RecentSearchEntry>,
}

impl StoreData {
    /// Newest first, at most [`MAX_RECENT_SEARCHES`], one entry per city
    /// regardless of case.
    pub fn push_recent(&mut self, entry: RecentSearchEntry) {
        let key = entry.city.to_lowercase();
        self.recent_searches.retain(|e| e.city.to_lowercase() != key);
        self.recent_searches.insert(0, entry);
        self.recent_searches.truncate(MAX_RECENT_SEARCHES);
    }
}

/// Persistence collaborator.
pub trait PreferenceStore: Send + Sync + Debug {
    /// Current document; unreadable storage reads as empty.
    fn load(&self) -> StoreData;

    fn persist(&mut self, data: &StoreData) -> Result<()>;

    /// Forget everything.
    fn reset(&mut self) -> Result<()>;

    fn stored_unit(&self) -> Option<Unit> {
        self.load().settings.temperature_unit
    }

    fn set_active_unit(&mut self, unit: Unit) -> Result<()> {
        let mut data = self.load();
        data.settings.temperature_unit = Some(unit);
        self.persist(&data)
    }

    fn recent_searches(&self) -> Vec<RecentSearchEntry> {
        self.load().recent_searches
    }

    fn add_recent_search(&mut self, city: &str, country: &str) -> Result<Vec<RecentSearchEntry>> {
        let mut data = self.load();
        data.push_recent(RecentSearchEntry::new(city, country, Utc::now()));
        self.persist(&data)?;
        Ok(data.recent_searches)
    }

    fn clear_recent_searches(&mut self) -> Result<()> {
        let mut data = self.load();
        data.recent_searches.clear();
        self.persist(&data)
    }

    fn alerts_dismissed(&self) -> bool {
        self.load().settings.alerts_dismissed
    }

    fn set_alerts_dismissed(&mut self, dismissed: bool) -> Result<()> {
        let mut data = self.load();
        data.settings.alerts_dismissed = dismissed;
        self.persist(&data)
    }

    fn preferred_location(&self) -> Option<String> {
        self.load().settings.preferred_location
    }

    fn set_preferred_location(&mut self, city: Option<String>) -> Result<()> {
        let mut data = self.load();
        data.settings.preferred_location = city;
        self.persist(&data)
    }

    fn clear_all(&mut self) -> Result<()> {
        self.reset()
    }
}

/// JSON file under the platform data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn open_default() -> Result<Self> {
        Ok(Self::at(Self::default_path()?))
    }

    pub fn default_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skycast", "skycast")
            .ok_or_else(|| anyhow!("Could not determine platform data directory"))?;

        Ok(dirs.data_dir().join("store.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<StoreData> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read store file: {}", self.path.display()))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse store file: {}", self.path.display()))
    }
}

impl PreferenceStore for FileStore {
    fn load(&self) -> StoreData {
        if !self.path.exists() {
            return StoreData::default();
        }

        self.read().unwrap_or_else(|err| {
            warn!(error = %format!("{err:#}"), "ignoring unreadable store");
            StoreData::default()
        })
    }

    fn persist(&mut self, data: &StoreData) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create data directory: {}", parent.display())
            })?;
        }

        let json = serde_json::to_string_pretty(data).context("Failed to serialize store")?;

        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write store file: {}", self.path.display()))
    }

    fn reset(&mut self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("Failed to remove store file: {}", self.path.display()))?;
        }
        Ok(())
    }
}

/// Process-local store, for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: StoreData,
}

impl MemoryStore {
    pub fn new(data: StoreData) -> Self {
        Self { data }
    }
}

impl PreferenceStore for MemoryStore {
    fn load(&self) -> StoreData {
        self.data.clone()
    }

    fn persist(&mut self, data: &StoreData) -> Result<()> {
        self.data = data.clone();
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        self.data = StoreData::default();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cities(entries: &[RecentSearchEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.city.as_str()).collect()
    }

    #[test]
    fn display_name_includes_country_when_known() {
        let now = Utc::now();

        assert_eq!(RecentSearchEntry::new("Kanpur", "IN", now).display_name, "Kanpur, IN");
        assert_eq!(RecentSearchEntry::new("Kanpur", "", now).display_name, "Kanpur");
    }

    #[test]
    fn recent_searches_are_capped_and_newest_first() {
        let mut store = MemoryStore::default();
        for city in ["A1", "B2", "C3", "D4", "E5", "F6"] {
            store.add_recent_search(city, "").unwrap();
        }

        assert_eq!(cities(&store.recent_searches()), vec!["F6", "E5", "D4", "C3", "B2"]);
    }

    #[test]
    fn recent_searches_dedupe_ignoring_case() {
        let mut store = MemoryStore::default();
        store.add_recent_search("London", "GB").unwrap();
        store.add_recent_search("Paris", "FR").unwrap();
        let list = store.add_recent_search("LONDON", "GB").unwrap();

        assert_eq!(cities(&list), vec!["LONDON", "Paris"]);
    }

    #[test]
    fn unit_is_unset_until_chosen() {
        let mut store = MemoryStore::default();
        assert_eq!(store.stored_unit(), None);

        store.set_active_unit(Unit::Fahrenheit).unwrap();
        assert_eq!(store.stored_unit(), Some(Unit::Fahrenheit));
    }

    #[test]
    fn clear_all_forgets_settings_and_searches() {
        let mut store = MemoryStore::default();
        store.set_active_unit(Unit::Fahrenheit).unwrap();
        store.set_alerts_dismissed(true).unwrap();
        store.add_recent_search("Oslo", "NO").unwrap();

        store.clear_all().unwrap();

        assert_eq!(store.load(), StoreData::default());
    }

    #[test]
    fn file_store_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::at(dir.path().join("data").join("store.json"));

        store.set_active_unit(Unit::Fahrenheit).unwrap();
        store.add_recent_search("Tokyo", "JP").unwrap();
        store.set_preferred_location(Some("Tokyo".into())).unwrap();

        let reopened = FileStore::at(store.path());
        assert_eq!(reopened.stored_unit(), Some(Unit::Fahrenheit));
        assert_eq!(cities(&reopened.recent_searches()), vec!["Tokyo"]);
        assert_eq!(reopened.preferred_location().as_deref(), Some("Tokyo"));
    }

    #[test]
    fn corrupt_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "{not json").unwrap();

        let store = FileStore::at(&path);
        assert_eq!(store.load(), StoreData::default());
    }

    #[test]
    fn file_store_reset_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::at(dir.path().join("store.json"));
        store.set_alerts_dismissed(true).unwrap();
        assert!(store.path().exists());

        store.clear_all().unwrap();

        assert!(!store.path().exists());
        assert!(!store.alerts_dismissed());
    }
}
