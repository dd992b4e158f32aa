use assert_cmd::Command;
use chromedriver_sync::test_utils::{CatalogPage, driver_archive};
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn cmd(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("chromedriver-sync").unwrap();
    cmd.arg("--config").arg(config).arg("--no-progress").env_remove("RUST_LOG");
    cmd
}

async fn catalog_server() -> MockServer {
    let server = MockServer::start().await;
    let url = format!("{}/131.0.6778.85/linux64/chromedriver-linux64.zip", server.uri());
    let page = CatalogPage::new()
        .channel("stable", "131.0.6778.85", &[("chromedriver", "linux64", url.as_str())])
        .channel("beta", "132.0.6834.32", &[])
        .render();

    Mock::given(method("GET"))
        .and(path("/catalog/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/131.0.6778.85/linux64/chromedriver-linux64.zip"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(driver_archive("linux64", b"driver")))
        .mount(&server)
        .await;
    server
}

#[test]
fn test_help() {
    Command::cargo_bin("chromedriver-sync")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--rollback"))
        .stdout(predicate::str::contains("--target-dir"));
}

#[test]
fn test_conflicting_modes_rejected() {
    Command::cargo_bin("chromedriver-sync")
        .unwrap()
        .args(["--check", "--status"])
        .assert()
        .failure();
}

#[tokio::test]
async fn test_update_installs_and_remembers_settings() {
    let server = catalog_server().await;
    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("drivers");
    let config = temp.path().join("settings.toml");

    cmd(&config)
        .arg("--yes")
        .arg("--target-dir")
        .arg(&dest)
        .args(["--platform", "linux64"])
        .arg("--driver")
        .arg(temp.path().join("missing-chromedriver"))
        .arg("--staging-dir")
        .arg(temp.path().join("staging"))
        .arg("--catalog-url")
        .arg(format!("{}/catalog/", server.uri()))
        .assert()
        .success()
        .stdout(predicate::str::contains("Installed ChromeDriver"))
        .stdout(predicate::str::contains("131.0.6778.85"));

    assert_eq!(fs::read(dest.join("chromedriver")).unwrap(), b"driver");
    let settings = fs::read_to_string(&config).unwrap();
    assert!(settings.contains("platform = \"linux64\""));
    assert!(settings.contains("last_update"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_current_driver_is_not_asked_for_directory() {
    use std::os::unix::fs::PermissionsExt;

    let server = catalog_server().await;
    let temp = TempDir::new().unwrap();
    let driver = temp.path().join("chromedriver-131");
    fs::write(&driver, "#!/bin/sh\necho 'ChromeDriver 131.0.6778.85 (abc)'\n").unwrap();
    fs::set_permissions(&driver, fs::Permissions::from_mode(0o755)).unwrap();

    cmd(&temp.path().join("settings.toml"))
        .current_dir(temp.path())
        .args(["--platform", "linux64"])
        .arg("--driver")
        .arg(&driver)
        .arg("--catalog-url")
        .arg(format!("{}/catalog/", server.uri()))
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("up to date"))
        .stdout(predicate::str::contains("Install ChromeDriver into").not());

    assert!(!temp.path().join("chromedriver-download").exists());
}

#[tokio::test]
async fn test_default_directories_install_on_linux() {
    let server = catalog_server().await;
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("chromedriver"), b"old driver").unwrap();

    cmd(&temp.path().join("settings.toml"))
        .current_dir(temp.path())
        .args(["--platform", "linux64"])
        .arg("--driver")
        .arg(temp.path().join("missing-chromedriver"))
        .arg("--catalog-url")
        .arg(format!("{}/catalog/", server.uri()))
        .write_stdin("\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Install ChromeDriver into"))
        .stdout(predicate::str::contains("Installed ChromeDriver"));

    assert_eq!(fs::read(temp.path().join("chromedriver")).unwrap(), b"driver");
    assert_eq!(fs::read(temp.path().join("chromedriver.bak")).unwrap(), b"old driver");
}

#[tokio::test]
async fn test_check_reports_available_update() {
    let server = catalog_server().await;
    let temp = TempDir::new().unwrap();

    cmd(&temp.path().join("settings.toml"))
        .arg("--check")
        .arg("--target-dir")
        .arg(temp.path())
        .args(["--platform", "linux64"])
        .arg("--driver")
        .arg(temp.path().join("missing-chromedriver"))
        .arg("--catalog-url")
        .arg(format!("{}/catalog/", server.uri()))
        .assert()
        .success()
        .stdout(predicate::str::contains("not installed"))
        .stdout(predicate::str::contains("An update is available"));

    assert!(!temp.path().join("chromedriver").exists());
}

#[tokio::test]
async fn test_status_json() {
    let server = catalog_server().await;
    let temp = TempDir::new().unwrap();

    let output = cmd(&temp.path().join("settings.toml"))
        .args(["--status", "--json"])
        .arg("--catalog-url")
        .arg(format!("{}/catalog/", server.uri()))
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["stable"]["version"], "131.0.6778.85");
    assert_eq!(json["beta"]["version"], "132.0.6834.32");
}

#[test]
fn test_rollback_without_backup_fails() {
    let temp = TempDir::new().unwrap();

    cmd(&temp.path().join("settings.toml"))
        .arg("--rollback")
        .arg("--target-dir")
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No backup found"));
}

#[test]
fn test_rollback_restores_backup() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("chromedriver.exe"), b"broken").unwrap();
    fs::write(temp.path().join("chromedriver.exe.bak"), b"working").unwrap();

    cmd(&temp.path().join("settings.toml"))
        .arg("--rollback")
        .arg("--target-dir")
        .arg(temp.path())
        .args(["--platform", "win64"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Restored previous ChromeDriver"));

    assert_eq!(fs::read(temp.path().join("chromedriver.exe")).unwrap(), b"working");
    assert!(!temp.path().join("chromedriver.exe.bak").exists());
}
