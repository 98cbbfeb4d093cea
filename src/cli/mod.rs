//! Command-line surface for the `buscar` binary

mod commands;

pub use commands::run_command;

use std::path::PathBuf;

use clap::Parser;

/// Search model parameter space with Hyperband
#[derive(Debug, Parser)]
#[command(name = "buscar", version, about = "Search model parameter space with Hyperband")]
pub struct Cli {
    /// Hyperband directory
    pub hyperband_path: PathBuf,

    /// Path to the trainer executable
    #[arg(long)]
    pub model: Option<PathBuf>,

    /// Path to the training data
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Maximum training epochs per configuration
    #[arg(long)]
    pub train_epoch: Option<usize>,

    /// Hyperparameter default as key=value; repeatable
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,

    /// 1 = remove the configs that are not best, 2 = remove all files except
    /// hyperband_config.json
    #[arg(long)]
    pub clean: Option<u8>,

    /// Suppress progress output
    #[arg(long, short)]
    pub quiet: bool,
}

/// Log level for CLI output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Suppress all output
    Quiet,
    /// Normal output level
    Normal,
}

/// Print a message unless the level is quiet
pub fn log(level: LogLevel, msg: &str) {
    if level != LogLevel::Quiet {
        println!("{msg}");
    }
}
