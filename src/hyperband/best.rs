//! Global best tracking

use crate::config::{BestMarker, Configuration};

/// Running maximum over every round result in the search.
///
/// A fold with strict `>` on reward: ties keep the earliest observation.
/// Seeded at negative infinity so the first real reward always wins.
#[derive(Debug, Clone, Default)]
pub struct BestRecord {
    reward: f64,
    config: Option<Configuration>,
    epoch: usize,
}

impl BestRecord {
    pub fn new() -> Self {
        Self { reward: f64::NEG_INFINITY, config: None, epoch: 0 }
    }

    /// Fold in one observation.
    pub fn observe(&mut self, reward: f64, config: &Configuration, epoch: usize) {
        if reward > self.reward {
            self.reward = reward;
            self.config = Some(config.clone());
            self.epoch = epoch;
        }
    }

    pub fn reward(&self) -> f64 {
        self.reward
    }

    pub fn config(&self) -> Option<&Configuration> {
        self.config.as_ref()
    }

    /// Finalize into a persistable marker; `None` if nothing was observed.
    pub fn into_marker(self) -> Option<BestMarker> {
        self.config.map(|config| BestMarker {
            name: config.name,
            reward: self.reward,
            epoch: self.epoch,
        })
    }
}
