//! Hyperband bracket sweep
//!
//! Based on Li et al. (2018) - Hyperband: A Novel Bandit-Based Approach.
//!
//! The scheduler owns the persisted search state and runs a multi-round
//! elimination tournament: brackets in decreasing order of `s`, each bracket
//! training its surviving configurations for geometrically growing budgets
//! and keeping the top `floor(n_configs / eta)` after every round.

use std::path::PathBuf;

use crate::adapter::ModelAdapter;
use crate::config::{ConfigStatus, Configuration, EpochRecord};
use crate::error::{Error, Result};
use crate::hyperband::best::BestRecord;
use crate::hyperband::schedule::Schedule;
use crate::hyperband::state::SearchState;
use crate::params::ParamMap;
use crate::progress::ProgressReporter;
use crate::store::ConfigStore;

/// Arguments for one search run, before merging with the persisted
/// scheduler configuration.
#[derive(Debug, Clone, Default)]
pub struct RunArgs {
    pub model_path: Option<PathBuf>,
    pub data_path: Option<PathBuf>,
    pub train_epoch: Option<usize>,
}

/// Outcome of [`HyperbandScheduler::run`].
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// A best marker already existed; no training was performed.
    AlreadyComplete(crate::config::BestMarker),
    /// The sweep finished and linked a new best configuration.
    Completed {
        best: crate::config::BestMarker,
        /// Full history row at the winning epoch, when recorded.
        metrics: Option<EpochRecord>,
    },
}

/// One candidate for survival within a round. Never persisted.
struct RoundResult {
    reward: f64,
    config: Configuration,
}

/// The search orchestrator.
///
/// Owns the store for the duration of a run; training itself is delegated
/// entirely to the [`ModelAdapter`].
pub struct HyperbandScheduler<S: ConfigStore> {
    store: S,
    model_path: PathBuf,
    data_path: PathBuf,
    defaults: ParamMap,
    schedule: Schedule,
}

impl<S: ConfigStore> HyperbandScheduler<S> {
    /// Build a scheduler, merging the persisted scheduler configuration over
    /// the supplied arguments. Persisted values win; persisted `vars` are
    /// merged over the supplied defaults.
    ///
    /// Fails when model path, data path, or a positive train-epoch is still
    /// unset after the merge. Nothing is persisted before this check.
    pub fn new(store: S, args: RunArgs, mut defaults: ParamMap) -> Result<Self> {
        let mut model_path = args.model_path;
        let mut data_path = args.data_path;
        let mut train_epoch = args.train_epoch;

        if let Some(persisted) = store.load_scheduler_config()? {
            model_path = Some(persisted.model);
            data_path = Some(persisted.data);
            train_epoch = Some(persisted.train_epoch);
            for (key, value) in persisted.vars {
                defaults.insert(key, value);
            }
        }

        let model_path = model_path.ok_or(Error::MissingArgument("model"))?;
        let data_path = data_path.ok_or(Error::MissingArgument("data"))?;
        let train_epoch = train_epoch
            .filter(|&epochs| epochs > 0)
            .ok_or(Error::MissingArgument("train-epoch"))?;

        Ok(Self { store, model_path, data_path, defaults, schedule: Schedule::new(train_epoch) })
    }

    pub fn schedule(&self) -> Schedule {
        self.schedule
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run the full search. Idempotent: a completed search (best marker
    /// present) returns immediately without touching the adapter.
    pub fn run<A, P>(&mut self, adapter: &mut A, reporter: &mut P) -> Result<RunOutcome>
    where
        A: ModelAdapter + ?Sized,
        P: ProgressReporter + ?Sized,
    {
        if let Some(best) = self.store.best()? {
            reporter.already_complete(&best);
            return Ok(RunOutcome::AlreadyComplete(best));
        }

        let state = self.materialize_state(adapter, reporter)?;

        let mut best = BestRecord::new();
        for bracket in self.schedule.brackets() {
            let population = state.bracket(bracket.s).unwrap_or(&[]);
            let mut active = self.materialize_configs(population)?;
            reporter.bracket_started(bracket.s, active.len());

            let n = active.len();
            for i in 0..bracket.rounds() {
                let budget = bracket.round(i, n);
                reporter.round_started(bracket.s, i, budget.n_iters, active.len());

                let mut results: Vec<RoundResult> = Vec::new();
                for config in &active {
                    if adapter.stopped_early(config)? {
                        reporter.config_skipped(&config.name);
                        continue;
                    }

                    reporter.config_training(&config.name, budget.n_iters);
                    self.store.set_status(&config.name, ConfigStatus::Training)?;
                    adapter.fit(config, budget.n_iters)?;

                    let (reward, epoch) = adapter.best_reward(config)?;
                    best.observe(reward, config, epoch);

                    // Early-stopped configs still count toward the global
                    // best but never compete for survival.
                    if adapter.stopped_early(config)? {
                        self.store.set_status(&config.name, ConfigStatus::StoppedEarly)?;
                    } else {
                        self.store.set_status(&config.name, ConfigStatus::Completed)?;
                        results.push(RoundResult { reward, config: config.clone() });
                    }
                }

                // Stable sort: equal rewards keep their round order.
                results.sort_by(|a, b| b.reward.total_cmp(&a.reward));
                results.truncate(budget.survivors());
                active = results.into_iter().map(|r| r.config).collect();
            }
        }

        self.finalize(best, reporter)
    }

    /// Load the persisted search state or generate it from scratch.
    ///
    /// Generation is all-or-nothing: populations for every bracket are
    /// sampled first, then the whole state is persisted in a single write,
    /// so a crash mid-generation restarts generation cleanly.
    fn materialize_state<A, P>(&mut self, adapter: &mut A, reporter: &mut P) -> Result<SearchState>
    where
        A: ModelAdapter + ?Sized,
        P: ProgressReporter + ?Sized,
    {
        if let Some(state) = self.store.load_state()? {
            reporter.state_loaded(state.len());
            return Ok(state);
        }

        let mut state = SearchState::new();
        for bracket in self.schedule.brackets() {
            let population =
                (0..bracket.n).map(|_| adapter.sample_params(&self.defaults)).collect();
            state.insert(bracket.s, population);
        }
        self.store.save_state(&state)?;
        reporter.state_generated(state.len());
        Ok(state)
    }

    /// Turn a bracket's sampled populations into persisted configurations.
    fn materialize_configs(&mut self, population: &[ParamMap]) -> Result<Vec<Configuration>> {
        let mut configs = Vec::with_capacity(population.len());
        for sampled in population {
            let config = Configuration::materialize(
                sampled.clone(),
                &self.defaults,
                &self.model_path,
                &self.data_path,
            );
            self.store.save_config(&config)?;
            configs.push(config);
        }
        Ok(configs)
    }

    fn finalize<P>(&mut self, best: BestRecord, reporter: &mut P) -> Result<RunOutcome>
    where
        P: ProgressReporter + ?Sized,
    {
        let marker = best.into_marker().ok_or(Error::NoTrials)?;
        self.store.link_best(&marker)?;

        let metrics =
            self.store.history(&marker.name)?.into_iter().find(|row| row.epoch == marker.epoch);
        reporter.completed(&marker, metrics.as_ref());
        Ok(RunOutcome::Completed { best: marker, metrics })
    }
}
