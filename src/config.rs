//! Configurations and their persisted records

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::params::{canonical_name, ParamMap};

/// Scheduler configuration persisted as `hyperband_config.json`.
///
/// Read-only input: the scheduler never writes this file. When present, its
/// values override anything supplied on the command line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Trainer executable driven once per fit call
    pub model: PathBuf,
    /// Training data handed to the trainer
    pub data: PathBuf,
    /// Maximum training epochs per configuration
    pub train_epoch: usize,
    /// Hyperparameter defaults merged over sampled parameters
    #[serde(default)]
    pub vars: ParamMap,
    /// Search space sampled for the initial populations
    #[serde(default)]
    pub space: crate::params::HyperparameterSpace,
}

/// Lifecycle of a single configuration during the search.
///
/// Replaces the flag-file conventions of earlier tooling (an empty
/// `stopped_early` file meaning "stopped") with an explicit persisted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigStatus {
    /// Materialized but never trained
    Pending,
    /// A fit call is in flight
    Training,
    /// The trainer signaled early stopping; no further training
    StoppedEarly,
    /// Finished its most recent round normally
    Completed,
}

/// Global phase of the search; `Done` doubles as the completion flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchPhase {
    Searching,
    Done,
}

/// One row of a configuration's training history.
///
/// Extra metric columns are carried alongside the reward and reported back
/// verbatim for the winning epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochRecord {
    pub epoch: usize,
    pub reward: f64,
    #[serde(flatten)]
    pub metrics: BTreeMap<String, f64>,
}

impl EpochRecord {
    pub fn new(epoch: usize, reward: f64) -> Self {
        Self { epoch, reward, metrics: BTreeMap::new() }
    }
}

/// Persisted pointer to the winning configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestMarker {
    pub name: String,
    pub reward: f64,
    pub epoch: usize,
}

/// A named, persisted hyperparameter assignment with model/data bindings.
///
/// The scheduler never mutates a configuration's parameters after creation;
/// only its membership in the current round's active set changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    pub name: String,
    pub params: ParamMap,
    pub model_path: PathBuf,
    pub data_path: PathBuf,
}

impl Configuration {
    /// Materialize a sampled parameter map into a full configuration.
    ///
    /// The name is derived from the sampled map alone; `defaults` are merged
    /// in afterwards and win on conflict.
    pub fn materialize(sampled: ParamMap, defaults: &ParamMap, model: &Path, data: &Path) -> Self {
        let name = canonical_name(&sampled);
        let mut params = sampled;
        for (k, v) in defaults {
            params.insert(k.clone(), v.clone());
        }
        Self { name, params, model_path: model.to_path_buf(), data_path: data.to_path_buf() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParameterValue;

    fn sampled() -> ParamMap {
        let mut params = ParamMap::new();
        params.insert("lr".to_string(), ParameterValue::Float(0.01));
        params.insert("depth".to_string(), ParameterValue::Int(3));
        params
    }

    #[test]
    fn test_materialize_name_from_sampled_params_only() {
        let mut defaults = ParamMap::new();
        defaults.insert("seed".to_string(), ParameterValue::Int(7));

        let config = Configuration::materialize(
            sampled(),
            &defaults,
            Path::new("/models/m"),
            Path::new("/data/d"),
        );

        // Name ignores merged defaults
        assert_eq!(config.name, "depth=3,lr=0.01");
        // Merged params carry both
        assert_eq!(config.params.get("seed"), Some(&ParameterValue::Int(7)));
        assert_eq!(config.params.len(), 3);
    }

    #[test]
    fn test_materialize_defaults_win_on_conflict() {
        let mut defaults = ParamMap::new();
        defaults.insert("lr".to_string(), ParameterValue::Float(0.5));

        let config =
            Configuration::materialize(sampled(), &defaults, Path::new("m"), Path::new("d"));

        assert_eq!(config.params.get("lr"), Some(&ParameterValue::Float(0.5)));
        // But the name still reflects the sampled value
        assert_eq!(config.name, "depth=3,lr=0.01");
    }

    #[test]
    fn test_scheduler_config_defaults() {
        let json = r#"{"model": "m", "data": "d", "train_epoch": 8}"#;
        let config: SchedulerConfig = serde_json::from_str(json).unwrap();
        assert!(config.vars.is_empty());
        assert!(config.space.is_empty());
        assert_eq!(config.train_epoch, 8);
    }

    #[test]
    fn test_scheduler_config_with_vars() {
        let json = r#"{"model": "m", "data": "d", "train_epoch": 8, "vars": {"cpu": 1}}"#;
        let config: SchedulerConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.vars.get("cpu"), Some(&ParameterValue::Int(1)));
    }

    #[test]
    fn test_epoch_record_extra_metrics_roundtrip() {
        let json = r#"{"epoch": 3, "reward": 0.91, "loss": 0.2, "accuracy": 0.88}"#;
        let row: EpochRecord = serde_json::from_str(json).unwrap();
        assert_eq!(row.epoch, 3);
        assert!((row.reward - 0.91).abs() < f64::EPSILON);
        assert_eq!(row.metrics.len(), 2);
        assert!((row.metrics["loss"] - 0.2).abs() < f64::EPSILON);

        let back = serde_json::to_string(&row).unwrap();
        let again: EpochRecord = serde_json::from_str(&back).unwrap();
        assert_eq!(row, again);
    }

    #[test]
    fn test_config_status_serde() {
        for status in [
            ConfigStatus::Pending,
            ConfigStatus::Training,
            ConfigStatus::StoppedEarly,
            ConfigStatus::Completed,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            let parsed: ConfigStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(status, parsed);
        }
    }
}
