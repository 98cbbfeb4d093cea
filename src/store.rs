//! Persistence backends for search state and configurations
//!
//! The [`ConfigStore`] trait is the scheduler's only persistence surface.
//! [`FsConfigStore`] lays everything out as JSON files under the hyperband
//! directory; [`InMemoryStore`] backs tests.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::{BestMarker, ConfigStatus, Configuration, EpochRecord, SchedulerConfig, SearchPhase};
use crate::error::{Error, Result};
use crate::hyperband::SearchState;

/// File literally spared by clean mode 2.
pub const SCHEDULER_CONFIG_FILE: &str = "hyperband_config.json";

const STATE_FILE: &str = "state.json";
const BEST_FILE: &str = "best.json";
const CONFIG_FILE: &str = "config.json";
const HISTORY_FILE: &str = "history.json";
const STATUS_FILE: &str = "status.json";

/// Persistence collaborator for the scheduler.
///
/// Single-writer: nothing here guards against concurrent schedulers sharing
/// a backend.
pub trait ConfigStore {
    /// Load the persisted scheduler configuration, if any. Never written.
    fn load_scheduler_config(&self) -> Result<Option<SchedulerConfig>>;

    /// Load the persisted search state, if any.
    fn load_state(&self) -> Result<Option<SearchState>>;

    /// Persist the full search state in one write.
    fn save_state(&mut self, state: &SearchState) -> Result<()>;

    /// Persist a materialized configuration, overwriting any previous copy.
    /// Does not touch the configuration's status or history.
    fn save_config(&mut self, config: &Configuration) -> Result<()>;

    /// Current status of a configuration; `Pending` when never recorded.
    fn status(&self, name: &str) -> Result<ConfigStatus>;

    fn set_status(&mut self, name: &str, status: ConfigStatus) -> Result<()>;

    /// Training history, oldest epoch first; empty when never trained.
    fn history(&self, name: &str) -> Result<Vec<EpochRecord>>;

    /// Append one epoch row to a configuration's history.
    fn append_history(&mut self, name: &str, row: EpochRecord) -> Result<()>;

    /// The persisted best marker; its presence means the search completed.
    fn best(&self) -> Result<Option<BestMarker>>;

    /// Persist the best marker, flipping the search to `Done`.
    fn link_best(&mut self, marker: &BestMarker) -> Result<()>;

    /// Global phase, derived from the best marker.
    fn phase(&self) -> Result<SearchPhase> {
        Ok(if self.best()?.is_some() { SearchPhase::Done } else { SearchPhase::Searching })
    }
}

/// JSON-file store rooted at the hyperband directory.
///
/// Layout: `state.json` and `best.json` at the root, plus one sub-directory
/// per configuration (named by its canonical name) holding `config.json`,
/// `history.json`, and `status.json`.
#[derive(Debug, Clone)]
pub struct FsConfigStore {
    root: PathBuf,
}

impl FsConfigStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding a configuration's persisted unit.
    pub fn config_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Clean mode 2: delete everything under the root except the scheduler
    /// configuration file.
    pub fn clean_except_config(&self) -> Result<()> {
        if !self.root.exists() {
            return Ok(());
        }
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let path = entry.path();
            if entry.file_name() == SCHEDULER_CONFIG_FILE {
                continue;
            }
            if path.is_dir() {
                fs::remove_dir_all(&path)?;
            } else {
                fs::remove_file(&path)?;
            }
        }
        Ok(())
    }

    /// Clean mode 1: delete every configuration directory except the best
    /// one. Fails when no best marker has been linked yet.
    pub fn clean_except_best(&self) -> Result<()> {
        let best = self.best()?.ok_or_else(|| Error::NoBest(self.root.clone()))?;
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_dir() && entry.file_name().to_string_lossy() != best.name {
                fs::remove_dir_all(&path)?;
            }
        }
        Ok(())
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let data = fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&data)?))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(value)?)?;
    Ok(())
}

impl ConfigStore for FsConfigStore {
    fn load_scheduler_config(&self) -> Result<Option<SchedulerConfig>> {
        read_json(&self.root.join(SCHEDULER_CONFIG_FILE))
    }

    fn load_state(&self) -> Result<Option<SearchState>> {
        read_json(&self.root.join(STATE_FILE))?.map(SearchState::from_wire).transpose()
    }

    fn save_state(&mut self, state: &SearchState) -> Result<()> {
        write_json(&self.root.join(STATE_FILE), &state.to_wire())
    }

    fn save_config(&mut self, config: &Configuration) -> Result<()> {
        write_json(&self.config_dir(&config.name).join(CONFIG_FILE), config)
    }

    fn status(&self, name: &str) -> Result<ConfigStatus> {
        Ok(read_json(&self.config_dir(name).join(STATUS_FILE))?.unwrap_or(ConfigStatus::Pending))
    }

    fn set_status(&mut self, name: &str, status: ConfigStatus) -> Result<()> {
        write_json(&self.config_dir(name).join(STATUS_FILE), &status)
    }

    fn history(&self, name: &str) -> Result<Vec<EpochRecord>> {
        Ok(read_json(&self.config_dir(name).join(HISTORY_FILE))?.unwrap_or_default())
    }

    fn append_history(&mut self, name: &str, row: EpochRecord) -> Result<()> {
        let mut history = self.history(name)?;
        history.push(row);
        write_json(&self.config_dir(name).join(HISTORY_FILE), &history)
    }

    fn best(&self) -> Result<Option<BestMarker>> {
        read_json(&self.root.join(BEST_FILE))
    }

    fn link_best(&mut self, marker: &BestMarker) -> Result<()> {
        write_json(&self.root.join(BEST_FILE), marker)
    }
}

/// In-memory store for tests.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    scheduler_config: Option<SchedulerConfig>,
    state: Option<SearchState>,
    configs: HashMap<String, Configuration>,
    statuses: HashMap<String, ConfigStatus>,
    histories: HashMap<String, Vec<EpochRecord>>,
    best: Option<BestMarker>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scheduler_config(mut self, config: SchedulerConfig) -> Self {
        self.scheduler_config = Some(config);
        self
    }

    /// Names of every configuration saved so far, sorted.
    pub fn config_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.configs.keys().cloned().collect();
        names.sort();
        names
    }
}

impl ConfigStore for InMemoryStore {
    fn load_scheduler_config(&self) -> Result<Option<SchedulerConfig>> {
        Ok(self.scheduler_config.clone())
    }

    fn load_state(&self) -> Result<Option<SearchState>> {
        Ok(self.state.clone())
    }

    fn save_state(&mut self, state: &SearchState) -> Result<()> {
        self.state = Some(state.clone());
        Ok(())
    }

    fn save_config(&mut self, config: &Configuration) -> Result<()> {
        self.configs.insert(config.name.clone(), config.clone());
        Ok(())
    }

    fn status(&self, name: &str) -> Result<ConfigStatus> {
        Ok(self.statuses.get(name).copied().unwrap_or(ConfigStatus::Pending))
    }

    fn set_status(&mut self, name: &str, status: ConfigStatus) -> Result<()> {
        self.statuses.insert(name.to_string(), status);
        Ok(())
    }

    fn history(&self, name: &str) -> Result<Vec<EpochRecord>> {
        Ok(self.histories.get(name).cloned().unwrap_or_default())
    }

    fn append_history(&mut self, name: &str, row: EpochRecord) -> Result<()> {
        self.histories.entry(name.to_string()).or_default().push(row);
        Ok(())
    }

    fn best(&self) -> Result<Option<BestMarker>> {
        Ok(self.best.clone())
    }

    fn link_best(&mut self, marker: &BestMarker) -> Result<()> {
        self.best = Some(marker.clone());
        Ok(())
    }
}
