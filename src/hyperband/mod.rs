//! Hyperband successive-halving scheduler
//!
//! Based on Li et al. (2018) - Hyperband: A Novel Bandit-Based Approach.
//!
//! The module splits into pure budget math ([`Schedule`]), the persisted
//! initial populations ([`SearchState`]), global best tracking
//! ([`BestRecord`]), and the orchestrating [`HyperbandScheduler`].

mod best;
mod schedule;
mod scheduler;
mod state;

pub use best::BestRecord;
pub use schedule::{BracketDescriptor, RoundBudget, Schedule, ETA};
pub use scheduler::{HyperbandScheduler, RunArgs, RunOutcome};
pub use state::{SearchState, WireState};
