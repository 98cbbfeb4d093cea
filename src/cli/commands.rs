//! CLI command implementations

use crate::adapter::CommandAdapter;
use crate::cli::{log, Cli, LogLevel};
use crate::error::{Error, Result};
use crate::hyperband::{HyperbandScheduler, RunArgs, RunOutcome};
use crate::params::{ParamMap, ParameterValue};
use crate::progress::{BarReporter, NullReporter};
use crate::store::{ConfigStore, FsConfigStore};

/// Execute a CLI invocation: a clean mode, or a full search run.
pub fn run_command(cli: Cli) -> Result<()> {
    let level = if cli.quiet { LogLevel::Quiet } else { LogLevel::Normal };
    let store = FsConfigStore::new(&cli.hyperband_path);

    // Clean modes never run a search.
    match cli.clean {
        Some(1) => {
            store.clean_except_best()?;
            log(level, "Removed all configs except the best");
            return Ok(());
        }
        Some(2) => {
            store.clean_except_config()?;
            log(level, "Removed all files except hyperband_config.json");
            return Ok(());
        }
        Some(mode) => return Err(Error::InvalidCleanMode(mode)),
        None => {}
    }

    let space = store.load_scheduler_config()?.map(|config| config.space).unwrap_or_default();
    let defaults = parse_defaults(&cli.set)?;
    let args = RunArgs {
        model_path: cli.model,
        data_path: cli.data,
        train_epoch: cli.train_epoch,
    };

    let mut adapter = CommandAdapter::new(space, store.clone());
    let mut scheduler = HyperbandScheduler::new(store, args, defaults)?;

    let outcome = if cli.quiet {
        scheduler.run(&mut adapter, &mut NullReporter)?
    } else {
        scheduler.run(&mut adapter, &mut BarReporter::new())?
    };

    // The reporter already narrated the run; nothing further for quiet mode.
    match outcome {
        RunOutcome::AlreadyComplete(_) | RunOutcome::Completed { .. } => Ok(()),
    }
}

/// Parse repeated `--set key=value` assignments into a parameter map.
fn parse_defaults(assignments: &[String]) -> Result<ParamMap> {
    let mut defaults = ParamMap::new();
    for assignment in assignments {
        let (key, value) = assignment
            .split_once('=')
            .ok_or_else(|| Error::InvalidAssignment(assignment.clone()))?;
        defaults.insert(key.to_string(), ParameterValue::parse(value));
    }
    Ok(defaults)
}
