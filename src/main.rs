//! Buscar CLI
//!
//! Hyperband hyperparameter search entry point.
//!
//! # Usage
//!
//! ```bash
//! # Run (or resume) a search
//! buscar runs/hb --model trainer/train.sh --data data/train.h5 --train-epoch 81
//!
//! # No-op once the search completed
//! buscar runs/hb
//!
//! # Remove everything except hyperband_config.json
//! buscar runs/hb --clean 2
//! ```

use std::process::ExitCode;

use buscar::cli::{run_command, Cli};
use clap::Parser;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
