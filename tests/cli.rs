use assert_cmd::Command;
use predicates::str::contains;
use std::fs;
use std::path::PathBuf;

/// Helper to get a temporary home directory
fn temp_home_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("create temp dir")
}

/// Helper to get config file path in the temp dir
fn config_file_path(dir: &tempfile::TempDir) -> PathBuf {
    dir.path().join(".billing-monitor").join("config.json")
}

const BINARY_NAME: &str = "billing-monitor";

/// The binary with a private $HOME and no backend overrides from the caller's shell.
fn billing_monitor(home: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.env("HOME", home.path())
        .env_remove("BILLING_MONITOR_API_URL")
        .env_remove("BILLING_MONITOR_ENVIRONMENT");
    cmd
}

#[test]
/// Help command should display usage information.
fn cli_help_displays_usage() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(contains("Live monitor for the billing backend"))
        .stdout(contains("snapshot"));
}

#[test]
/// Storing an API URL writes the config file, and `show` reports it.
fn config_set_api_url_persists_and_shows() {
    let tmp = temp_home_dir();
    let config_path = config_file_path(&tmp);
    assert!(!config_path.exists());

    billing_monitor(&tmp)
        .args(["config", "set-api-url", "https://billing.example.com/api/"])
        .assert()
        .success()
        .stdout(contains("https://billing.example.com/api"));

    let saved = fs::read_to_string(&config_path).unwrap();
    assert!(saved.contains("\"api_url\": \"https://billing.example.com/api\""));

    billing_monitor(&tmp)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(contains("Backend"))
        .stdout(contains("https://billing.example.com/api"));
}

#[test]
/// A value that is not an http(s) URL is rejected and nothing is written.
fn config_set_api_url_rejects_invalid_urls() {
    let tmp = temp_home_dir();

    billing_monitor(&tmp)
        .args(["config", "set-api-url", "billing.example.com"])
        .assert()
        .failure();

    assert!(!config_file_path(&tmp).exists());
}

#[test]
/// Without any configuration the local backend is used.
fn config_show_defaults_to_local_backend() {
    let tmp = temp_home_dir();

    billing_monitor(&tmp)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(contains("(not set)"))
        .stdout(contains("http://localhost:5000/api"));
}

#[test]
/// Clear command should delete an existing config file.
fn config_clear_deletes_config_file() {
    let tmp = temp_home_dir();
    let config_path = config_file_path(&tmp);
    fs::create_dir_all(config_path.parent().unwrap()).unwrap();
    fs::write(&config_path, "{}").unwrap();
    assert!(config_path.exists());

    billing_monitor(&tmp)
        .args(["config", "clear"])
        .assert()
        .success()
        .stdout(contains("Clearing stored configuration"));

    assert!(!config_path.exists());
}

#[test]
/// A future date is rejected before any request is made.
fn snapshot_rejects_future_dates() {
    let tmp = temp_home_dir();

    billing_monitor(&tmp)
        .args([
            "snapshot",
            "--date",
            "2999-01-01",
            "--api-url",
            "http://127.0.0.1:9",
        ])
        .assert()
        .failure()
        .stderr(contains("No es posible consultar una fecha futura."));
}

#[test]
/// An unreachable backend is reported with the generic message.
fn snapshot_reports_unreachable_backend() {
    let tmp = temp_home_dir();

    billing_monitor(&tmp)
        .args(["snapshot", "--api-url", "http://127.0.0.1:9"])
        .assert()
        .failure()
        .stderr(contains("Error al obtener datos del servidor"));
}
