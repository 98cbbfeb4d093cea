//! Integration tests for the CLI surface

use buscar::cli::{run_command, Cli};
use buscar::config::BestMarker;
use buscar::error::Error;
use buscar::store::{ConfigStore, FsConfigStore, SCHEDULER_CONFIG_FILE};
use clap::Parser;
use std::fs;
use tempfile::TempDir;

fn cli(args: &[&str]) -> Cli {
    let mut full = vec!["buscar"];
    full.extend_from_slice(args);
    Cli::try_parse_from(full).expect("parse")
}

#[test]
fn test_clean_mode_2_spares_only_the_config_file() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().to_string_lossy().into_owned();

    fs::write(dir.path().join(SCHEDULER_CONFIG_FILE), "{}").expect("write");
    fs::write(dir.path().join("state.json"), "{}").expect("write");
    fs::create_dir(dir.path().join("lr=0.01")).expect("mkdir");
    fs::write(dir.path().join("lr=0.01").join("history.json"), "[]").expect("write");

    run_command(cli(&[path.as_str(), "--clean", "2", "--quiet"])).expect("clean");

    let remaining: Vec<String> = fs::read_dir(dir.path())
        .expect("read_dir")
        .map(|e| e.expect("entry").file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(remaining, vec![SCHEDULER_CONFIG_FILE.to_string()]);
}

#[test]
fn test_clean_mode_2_never_searches() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().to_string_lossy().into_owned();

    // Even with full run arguments, clean exits before any search.
    run_command(cli(&[
        path.as_str(),
        "--model",
        "m",
        "--data",
        "d",
        "--train-epoch",
        "8",
        "--clean",
        "2",
        "--quiet",
    ]))
    .expect("clean");

    assert!(!dir.path().join("state.json").exists());
}

#[test]
fn test_clean_mode_1_keeps_best_config_dir() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().to_string_lossy().into_owned();

    fs::create_dir(dir.path().join("a=1")).expect("mkdir");
    fs::create_dir(dir.path().join("a=2")).expect("mkdir");
    let mut store = FsConfigStore::new(dir.path());
    store
        .link_best(&BestMarker { name: "a=2".to_string(), reward: 0.9, epoch: 4 })
        .expect("link");

    run_command(cli(&[path.as_str(), "--clean", "1", "--quiet"])).expect("clean");

    assert!(!dir.path().join("a=1").exists());
    assert!(dir.path().join("a=2").exists());
}

#[test]
fn test_clean_mode_1_without_best_fails() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().to_string_lossy().into_owned();
    assert!(matches!(
        run_command(cli(&[path.as_str(), "--clean", "1", "--quiet"])),
        Err(Error::NoBest(_))
    ));
}

#[test]
fn test_unknown_clean_mode_is_rejected() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().to_string_lossy().into_owned();
    assert!(matches!(
        run_command(cli(&[path.as_str(), "--clean", "3", "--quiet"])),
        Err(Error::InvalidCleanMode(3))
    ));
}

#[test]
fn test_search_requires_model_argument() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().to_string_lossy().into_owned();
    assert!(matches!(
        run_command(cli(&[path.as_str(), "--data", "d", "--train-epoch", "8", "--quiet"])),
        Err(Error::MissingArgument("model"))
    ));
}

#[test]
fn test_invalid_set_assignment_is_rejected() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().to_string_lossy().into_owned();
    assert!(matches!(
        run_command(cli(&[
            path.as_str(),
            "--model",
            "m",
            "--data",
            "d",
            "--train-epoch",
            "8",
            "--set",
            "broken",
            "--quiet",
        ])),
        Err(Error::InvalidAssignment(_))
    ));
}
