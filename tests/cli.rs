//! Command-line surface tests for find-large

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn find_large() -> Command {
    let mut cmd = Command::cargo_bin("find-large").unwrap();
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_subcommands() {
    find_large()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("files"))
        .stdout(predicate::str::contains("dirs"))
        .stdout(predicate::str::contains("vids"));
}

#[test]
fn test_missing_subcommand_exits_with_one() {
    find_large().assert().code(1);
}

#[test]
fn test_json_conflicts_with_no_table() {
    let dir = TempDir::new().unwrap();
    find_large()
        .current_dir(dir.path())
        .args(["files", "--json", "--no-table"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_status_line_goes_to_stderr() {
    let dir = TempDir::new().unwrap();
    find_large()
        .current_dir(dir.path())
        .args(["dirs", "-s", "250", "--no-table"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(
            "Searching for directories larger than 250.00 MB",
        ));
}

#[test]
fn test_bad_config_file_fails() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("broken.toml");
    std::fs::write(&config, "jobs = [not valid").unwrap();
    find_large()
        .current_dir(dir.path())
        .args(["files", "--config"])
        .arg(&config)
        .assert()
        .code(1)
        .stderr(predicate::str::starts_with("find-large: configuration error"));
}
