//! Integration tests for the ppm binary
//!
//! None of these need a Python interpreter: every case fails, finishes
//! before an installer would run, or reuses a pre-created environment.

use assert_cmd::{cargo::cargo_bin_cmd, Command};
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixture_config_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("ppm.toml")
}

/// Command running inside `project`, with settings from the fixture and a scratch home
fn ppm_cmd(project: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("ppm");
    cmd.current_dir(project.path())
        .env("PPM_CONFIG", fixture_config_path())
        .env("HOME", project.path())
        .env_remove("PPM_INIT_YES")
        .env_remove("PPM_LOG");
    cmd
}

fn project() -> TempDir {
    TempDir::new().unwrap()
}

#[test]
fn test_version() {
    ppm_cmd(&project())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ppm"));
}

#[test]
fn test_help() {
    ppm_cmd(&project())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("keeps the dependencies of pyproject.toml"));
}

#[test]
fn test_no_subcommand_prints_help_and_fails() {
    ppm_cmd(&project())
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn test_invalid_command() {
    ppm_cmd(&project()).arg("invalid").assert().failure();
}

#[test]
fn test_uninstall_requires_a_name() {
    ppm_cmd(&project()).arg("uninstall").assert().failure();
}

#[test]
fn test_config_show() {
    ppm_cmd(&project())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration:"))
        .stdout(predicate::str::contains(".ppm.env"));
}

#[test]
fn test_config_path_honors_override() {
    ppm_cmd(&project())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ppm.toml"));
}

#[test]
fn test_config_get() {
    ppm_cmd(&project())
        .args(["config", "get", "manifest-path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pyproject.toml"));
}

#[test]
fn test_config_get_unknown_key() {
    ppm_cmd(&project())
        .args(["config", "get", "cache-path"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn test_config_set_writes_settings_file() {
    let dir = project();
    let settings = dir.path().join("settings").join("ppm.toml");
    ppm_cmd(&dir)
        .env("PPM_CONFIG", &settings)
        .args(["config", "set", "env-path", "venvs/app"])
        .assert()
        .success();

    let content = fs::read_to_string(&settings).unwrap();
    assert!(content.contains("env-path = \"venvs/app\""));
}

#[test]
fn test_run_missing_script() {
    ppm_cmd(&project())
        .args(["run", "missing.py"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.py not found"));
}

#[test]
fn test_uninstall_without_environment() {
    let dir = project();
    fs::write(
        dir.path().join("pyproject.toml"),
        "[project]\nname = \"demo\"\nversion = \"0.1.0\"\ndependencies = [\"requests==2.26.0\"]\n",
    )
    .unwrap();
    let before = fs::read_to_string(dir.path().join("pyproject.toml")).unwrap();

    ppm_cmd(&dir)
        .args(["uninstall", "requests"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No environment found"));

    let after = fs::read_to_string(dir.path().join("pyproject.toml")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_install_with_malformed_manifest_creates_nothing() {
    let dir = project();
    fs::write(dir.path().join("pyproject.toml"), "[project\nname = ").unwrap();

    ppm_cmd(&dir)
        .arg("install")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse manifest"));

    assert!(!dir.path().join(".ppm.env").exists());
}

#[test]
fn test_install_without_manifest_points_to_init() {
    let dir = project();
    ppm_cmd(&dir)
        .args(["install", "requests"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ppm init"));

    assert!(!dir.path().join(".ppm.env").exists());
}

#[test]
fn test_manifest_flag_overrides_settings() {
    let dir = project();
    ppm_cmd(&dir)
        .args(["-c", "configs/other.toml", "install"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("other.toml"));
}

#[test]
fn test_init_declined_keeps_existing_manifest() {
    let dir = project();
    let manifest = dir.path().join("pyproject.toml");
    let original = "# mine\n[project]\nname = \"keep-me\"\n";
    fs::write(&manifest, original).unwrap();
    // An existing environment is reused, so no interpreter is needed
    fs::create_dir(dir.path().join(".ppm.env")).unwrap();

    ppm_cmd(&dir)
        .arg("init")
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Environment ready"));

    assert_eq!(fs::read_to_string(&manifest).unwrap(), original);
}

#[test]
fn test_cli_without_environment() {
    let dir = project();
    ppm_cmd(&dir)
        .arg("cli")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No environment found"));

    assert!(!dir.path().join(".ppm.env").exists());
}
