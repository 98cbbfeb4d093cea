//! buscar - Hyperband hyperparameter search
//!
//! A bandit-style scheduler over configurations of a trainable model:
//! brackets trade population size against per-configuration budget, and each
//! bracket runs an elimination tournament where the weakest fraction is
//! dropped every round. State is persisted after generation, so interrupted
//! searches resume with the exact same initial populations, and a completed
//! search is a durable no-op.
//!
//! Training itself is delegated to a pluggable [`adapter::ModelAdapter`];
//! persistence to a pluggable [`store::ConfigStore`].

pub mod adapter;
pub mod cli;
pub mod config;
pub mod error;
pub mod hyperband;
pub mod params;
pub mod progress;
pub mod store;

pub use error::{Error, Result};
pub use hyperband::{HyperbandScheduler, RunArgs, RunOutcome, Schedule, SearchState, ETA};
