//! Training collaborator interface
//!
//! The scheduler never trains anything itself: sampling, fitting, the
//! early-stop signal, and reward history all live behind [`ModelAdapter`].

use std::process::Command;

use crate::config::{ConfigStatus, Configuration};
use crate::error::{Error, Result};
use crate::params::{HyperparameterSpace, ParamMap};
use crate::store::{ConfigStore, FsConfigStore};

/// Training-side collaborator consumed by the scheduler.
pub trait ModelAdapter {
    /// Sample one random hyperparameter assignment. `defaults` are the
    /// run's fixed values; implementations may condition on them.
    fn sample_params(&mut self, defaults: &ParamMap) -> ParamMap;

    /// Train the configuration for `n_iters` additional iterations,
    /// appending to its persisted training history.
    fn fit(&mut self, config: &Configuration, n_iters: usize) -> Result<()>;

    /// Whether the configuration has signaled early stopping. Checked both
    /// before and after every fit call.
    fn stopped_early(&self, config: &Configuration) -> Result<bool>;

    /// Best reward so far and the epoch that achieved it.
    fn best_reward(&self, config: &Configuration) -> Result<(f64, usize)>;
}

/// Adapter that drives an external trainer executable.
///
/// The configuration's model path is run as a command per fit:
/// `<model> --config <dir> --data <path> --epochs N`. The trainer appends
/// rows to the configuration's persisted history and flips its status to
/// `StoppedEarly` when it gives up; this adapter only reads those back.
pub struct CommandAdapter {
    space: HyperparameterSpace,
    store: FsConfigStore,
}

impl CommandAdapter {
    pub fn new(space: HyperparameterSpace, store: FsConfigStore) -> Self {
        Self { space, store }
    }
}

impl ModelAdapter for CommandAdapter {
    fn sample_params(&mut self, _defaults: &ParamMap) -> ParamMap {
        let mut rng = rand::rng();
        self.space.sample_random(&mut rng)
    }

    fn fit(&mut self, config: &Configuration, n_iters: usize) -> Result<()> {
        let status = Command::new(&config.model_path)
            .arg("--config")
            .arg(self.store.config_dir(&config.name))
            .arg("--data")
            .arg(&config.data_path)
            .arg("--epochs")
            .arg(n_iters.to_string())
            .status()?;

        if !status.success() {
            return Err(Error::TrainerFailed { name: config.name.clone(), status });
        }
        Ok(())
    }

    fn stopped_early(&self, config: &Configuration) -> Result<bool> {
        Ok(self.store.status(&config.name)? == ConfigStatus::StoppedEarly)
    }

    fn best_reward(&self, config: &Configuration) -> Result<(f64, usize)> {
        let history = self.store.history(&config.name)?;
        let mut best: Option<(f64, usize)> = None;
        for row in &history {
            match best {
                Some((reward, _)) if row.reward <= reward => {}
                _ => best = Some((row.reward, row.epoch)),
            }
        }
        best.ok_or_else(|| Error::EmptyHistory(config.name.clone()))
    }
}

/// Test support: a deterministic scripted adapter.
#[doc(hidden)]
pub mod testing {
    use std::collections::{HashMap, HashSet};

    use super::ModelAdapter;
    use crate::config::Configuration;
    use crate::error::Result;
    use crate::params::{ParamMap, ParameterValue};

    /// Samples sequential `id=N` parameter maps and replays scripted
    /// rewards; records every fit call for assertions.
    #[derive(Debug, Default)]
    pub struct ScriptedAdapter {
        next_id: i64,
        /// Every `(config name, n_iters)` fit call, in order.
        pub fit_calls: Vec<(String, usize)>,
        /// Cumulative iterations trained per configuration.
        pub epochs_run: HashMap<String, usize>,
        rewards: HashMap<String, f64>,
        stop_during_fit: HashSet<String>,
        stopped: HashSet<String>,
    }

    impl ScriptedAdapter {
        pub fn new() -> Self {
            Self::default()
        }

        /// Fix the reward reported for a configuration name.
        pub fn with_reward(mut self, name: &str, reward: f64) -> Self {
            self.rewards.insert(name.to_string(), reward);
            self
        }

        /// Make a configuration signal early stop during its next fit.
        pub fn stop_during_fit(mut self, name: &str) -> Self {
            self.stop_during_fit.insert(name.to_string());
            self
        }

        pub fn sample_calls(&self) -> usize {
            self.next_id as usize
        }

        fn reward_for(&self, name: &str) -> f64 {
            if let Some(reward) = self.rewards.get(name) {
                return *reward;
            }
            // Default: the numeric suffix of `id=N`
            name.rsplit('=').next().and_then(|id| id.parse().ok()).unwrap_or(0.0)
        }
    }

    impl ModelAdapter for ScriptedAdapter {
        fn sample_params(&mut self, _defaults: &ParamMap) -> ParamMap {
            let mut params = ParamMap::new();
            params.insert("id".to_string(), ParameterValue::Int(self.next_id));
            self.next_id += 1;
            params
        }

        fn fit(&mut self, config: &Configuration, n_iters: usize) -> Result<()> {
            self.fit_calls.push((config.name.clone(), n_iters));
            *self.epochs_run.entry(config.name.clone()).or_default() += n_iters;
            if self.stop_during_fit.contains(&config.name) {
                self.stopped.insert(config.name.clone());
            }
            Ok(())
        }

        fn stopped_early(&self, config: &Configuration) -> Result<bool> {
            Ok(self.stopped.contains(&config.name))
        }

        fn best_reward(&self, config: &Configuration) -> Result<(f64, usize)> {
            let epoch = self.epochs_run.get(&config.name).copied().unwrap_or(0);
            Ok((self.reward_for(&config.name), epoch))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ScriptedAdapter;
    use super::*;
    use crate::config::EpochRecord;
    use std::path::Path;
    use tempfile::TempDir;

    fn config(name: &str) -> Configuration {
        Configuration {
            name: name.to_string(),
            params: ParamMap::new(),
            model_path: "model".into(),
            data_path: "data".into(),
        }
    }

    #[test]
    fn test_command_adapter_best_reward_from_history() {
        let dir = TempDir::new().expect("tempdir");
        let mut store = FsConfigStore::new(dir.path());
        store.append_history("a=1", EpochRecord::new(1, 0.3)).expect("append");
        store.append_history("a=1", EpochRecord::new(2, 0.8)).expect("append");
        store.append_history("a=1", EpochRecord::new(3, 0.8)).expect("append");
        store.append_history("a=1", EpochRecord::new(4, 0.5)).expect("append");

        let adapter = CommandAdapter::new(HyperparameterSpace::new(), store);
        let (reward, epoch) = adapter.best_reward(&config("a=1")).expect("best");
        assert!((reward - 0.8).abs() < f64::EPSILON);
        // Ties keep the earliest epoch
        assert_eq!(epoch, 2);
    }

    #[test]
    fn test_command_adapter_empty_history_is_error() {
        let dir = TempDir::new().expect("tempdir");
        let store = FsConfigStore::new(dir.path());
        let adapter = CommandAdapter::new(HyperparameterSpace::new(), store);
        assert!(matches!(
            adapter.best_reward(&config("a=1")),
            Err(Error::EmptyHistory(_))
        ));
    }

    #[test]
    fn test_command_adapter_reads_persisted_stop_flag() {
        let dir = TempDir::new().expect("tempdir");
        let mut store = FsConfigStore::new(dir.path());
        store.set_status("a=1", ConfigStatus::StoppedEarly).expect("set");

        let adapter = CommandAdapter::new(HyperparameterSpace::new(), store);
        assert!(adapter.stopped_early(&config("a=1")).expect("query"));
        assert!(!adapter.stopped_early(&config("a=2")).expect("query"));
    }

    #[test]
    fn test_command_adapter_samples_from_space() {
        let dir = TempDir::new().expect("tempdir");
        let mut space = HyperparameterSpace::new();
        space.add(
            "lr",
            crate::params::ParameterDomain::Continuous { low: 0.0, high: 1.0, log_scale: false },
        );
        let mut adapter = CommandAdapter::new(space, FsConfigStore::new(dir.path()));

        let params = adapter.sample_params(&ParamMap::new());
        assert!(params.contains_key("lr"));
    }

    #[test]
    fn test_command_adapter_fit_failure_propagates() {
        let dir = TempDir::new().expect("tempdir");
        let mut adapter =
            CommandAdapter::new(HyperparameterSpace::new(), FsConfigStore::new(dir.path()));

        // A trainer path that cannot be spawned surfaces as an error.
        let missing = Configuration {
            name: "a=1".to_string(),
            params: ParamMap::new(),
            model_path: Path::new("/nonexistent/trainer").to_path_buf(),
            data_path: "data".into(),
        };
        assert!(adapter.fit(&missing, 1).is_err());
    }

    #[test]
    fn test_scripted_adapter_sequential_ids() {
        let mut adapter = ScriptedAdapter::new();
        let a = adapter.sample_params(&ParamMap::new());
        let b = adapter.sample_params(&ParamMap::new());
        assert_eq!(crate::params::canonical_name(&a), "id=0");
        assert_eq!(crate::params::canonical_name(&b), "id=1");
        assert_eq!(adapter.sample_calls(), 2);
    }
}
