use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

/// Nothing listens here, so requests fail fast with a connection error
const UNREACHABLE: &str = "http://127.0.0.1:1";

fn extratos_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("extratos"));
    cmd.env_remove("EXTRATOS_API_URL");
    cmd
}

/// Config dir whose config.toml makes a single attempt per request
fn single_attempt_config(temp_dir: &TempDir) -> std::path::PathBuf {
    let config_path = temp_dir.path().join("extratos-config");
    fs::create_dir_all(&config_path).unwrap();
    fs::write(
        config_path.join("config.toml"),
        format!("[api]\nbase_url = \"{UNREACHABLE}\"\ntimeout_secs = 5\nretry_attempts = 1\n"),
    )
    .unwrap();
    config_path
}

#[test]
fn test_help() {
    extratos_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Port worker payroll statements client and dashboard",
        ));
}

#[test]
fn test_version() {
    extratos_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("extratos"));
}

#[test]
fn test_init_creates_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("extratos-config");

    extratos_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized extratos config"));

    let content = fs::read_to_string(config_path.join("config.toml")).unwrap();
    assert!(content.contains("base_url = \"http://localhost:3000\""));
}

#[test]
fn test_init_fails_if_exists() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("extratos-config");

    extratos_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .success();

    extratos_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_status_without_init_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("nonexistent");

    extratos_cmd()
        .args(["-C", config_path.to_str().unwrap(), "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not found, using defaults"))
        .stdout(predicate::str::contains("http://localhost:3000 (default)"))
        .stdout(predicate::str::contains("Retry attempts:   2"));
}

#[test]
fn test_status_reads_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = single_attempt_config(&temp_dir);

    extratos_cmd()
        .args(["-C", config_path.to_str().unwrap(), "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Extratos Status"))
        .stdout(predicate::str::contains(format!("{UNREACHABLE} (config.toml)")))
        .stdout(predicate::str::contains("Retry attempts:   1"));
}

#[test]
fn test_env_overrides_config_and_flag_overrides_env() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = single_attempt_config(&temp_dir);

    extratos_cmd()
        .env("EXTRATOS_API_URL", "http://env.example:9000/")
        .args(["-C", config_path.to_str().unwrap(), "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "http://env.example:9000 (EXTRATOS_API_URL)",
        ));

    extratos_cmd()
        .env("EXTRATOS_API_URL", "http://env.example:9000")
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "--api-url",
            "http://flag.example",
            "status",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://flag.example (--api-url)"));
}

#[test]
fn test_upload_rejects_non_pdf_before_any_request() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = single_attempt_config(&temp_dir);
    let file = temp_dir.path().join("notes.txt");
    fs::write(&file, "not a statement").unwrap();

    extratos_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "upload",
            file.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Only PDF files are accepted"))
        .stderr(predicate::str::contains("notes.txt"));
}

#[test]
fn test_upload_requires_files() {
    extratos_cmd().arg("upload").assert().failure();
}

#[test]
fn test_upload_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = single_attempt_config(&temp_dir);

    extratos_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "upload",
            temp_dir.path().join("missing.pdf").to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("IO error"));
}

#[test]
fn test_list_reports_unreachable_api() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = single_attempt_config(&temp_dir);

    extratos_cmd()
        .args(["-C", config_path.to_str().unwrap(), "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Request to /analitico failed"));
}

#[test]
fn test_list_rejects_bad_date() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = single_attempt_config(&temp_dir);

    extratos_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "list",
            "--data-inicio",
            "01/03/2024",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date '01/03/2024'"));
}

#[test]
fn test_dashboard_unknown_preset() {
    extratos_cmd()
        .args(["dashboard", "--preset", "next-year"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown preset 'next-year'"));
}

#[test]
fn test_dashboard_rejects_inverted_range() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = single_attempt_config(&temp_dir);

    extratos_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "dashboard",
            "--from",
            "2024-03-31",
            "--to",
            "2024-03-01",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date range"));
}

#[test]
fn test_dashboard_preset_conflicts_with_month() {
    extratos_cmd()
        .args(["dashboard", "--preset", "this-month", "--mes", "JAN"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}
