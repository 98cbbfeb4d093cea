//! Cosmetic progress reporting
//!
//! The scheduler reports every lifecycle event through [`ProgressReporter`];
//! none of it affects control flow.

use indicatif::ProgressBar;

use crate::config::{BestMarker, EpochRecord};

/// Feedback hooks for a search run. All methods default to no-ops.
pub trait ProgressReporter {
    fn already_complete(&mut self, _best: &BestMarker) {}
    fn state_loaded(&mut self, _brackets: usize) {}
    fn state_generated(&mut self, _brackets: usize) {}
    fn bracket_started(&mut self, _s: usize, _population: usize) {}
    fn round_started(&mut self, _s: usize, _i: usize, _n_iters: usize, _active: usize) {}
    fn config_skipped(&mut self, _name: &str) {}
    fn config_training(&mut self, _name: &str, _n_iters: usize) {}
    fn completed(&mut self, _best: &BestMarker, _metrics: Option<&EpochRecord>) {}
}

/// Reporter that stays silent; used by tests and `--quiet` runs.
#[derive(Debug, Default)]
pub struct NullReporter;

impl ProgressReporter for NullReporter {}

/// Terminal reporter: one progress bar per round plus event lines.
#[derive(Debug, Default)]
pub struct BarReporter {
    bar: Option<ProgressBar>,
}

impl BarReporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn finish_bar(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

impl ProgressReporter for BarReporter {
    fn already_complete(&mut self, best: &BestMarker) {
        println!("Best config {} already exists, terminating Hyperband", best.name);
    }

    fn state_loaded(&mut self, brackets: usize) {
        println!("Loaded Hyperband initial parameters for {brackets} brackets");
    }

    fn state_generated(&mut self, brackets: usize) {
        println!("Generated Hyperband initial parameters for {brackets} brackets");
    }

    fn bracket_started(&mut self, s: usize, population: usize) {
        self.finish_bar();
        println!("Sweeping s = {s} ({population} configs)");
    }

    fn round_started(&mut self, _s: usize, i: usize, n_iters: usize, active: usize) {
        self.finish_bar();
        println!("Round i = {i}: {n_iters} epochs per config");
        self.bar = Some(ProgressBar::new(active as u64));
    }

    fn config_skipped(&mut self, _name: &str) {
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }

    fn config_training(&mut self, name: &str, n_iters: usize) {
        if let Some(bar) = &self.bar {
            bar.println(format!("Training {name} for {n_iters} epochs"));
            bar.inc(1);
        }
    }

    fn completed(&mut self, best: &BestMarker, metrics: Option<&EpochRecord>) {
        self.finish_bar();
        println!("Best config {} => reward {} at epoch {}", best.name, best.reward, best.epoch);
        if let Some(row) = metrics {
            for (metric, value) in &row.metrics {
                println!("  {metric}: {value}");
            }
        }
    }
}
