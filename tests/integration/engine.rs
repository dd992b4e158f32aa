use chromedriver_sync::constants::DEFAULT_STAGING_DIR;
use chromedriver_sync::engine::{
    EngineOptions, EngineState, UpdateEngine, UpdateError, UpdateOutcome, UpdateRequest,
};
use chromedriver_sync::installer::{ArtifactInstaller, InstallError};
use chromedriver_sync::test_utils::{CatalogPage, driver_archive, init_test_logging};
use chromedriver_sync::version::Classification;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const STABLE: &str = "131.0.6778.85";
const LOCAL: &str = "130.0.6723.91";

fn engine(platform: &str, force: bool) -> UpdateEngine {
    let installer = ArtifactInstaller::new(platform).unwrap().with_progress(false);
    UpdateEngine::new(
        installer,
        EngineOptions {
            force,
            ..EngineOptions::default()
        },
    )
}

fn request(catalog: String, local: Option<&str>, staging: &Path, dest: &Path) -> UpdateRequest {
    UpdateRequest {
        raw_catalog: catalog,
        local_version: local.map(str::to_string),
        staging_dir: staging.to_path_buf(),
        destination_dir: dest.to_path_buf(),
    }
}

fn stable_page(platform: &str, url: &str) -> String {
    CatalogPage::new().channel("stable", STABLE, &[("chromedriver", platform, url)]).render()
}

async fn serve_driver(server: &MockServer, platform: &str, response: ResponseTemplate) -> String {
    let route = format!("/{STABLE}/{platform}/chromedriver-{platform}.zip");
    Mock::given(method("GET")).and(path(route.as_str())).respond_with(response).mount(server).await;
    format!("{}{}", server.uri(), route)
}

#[tokio::test]
async fn test_outdated_driver_is_installed() {
    init_test_logging(None);
    let server = MockServer::start().await;
    let url = serve_driver(
        &server,
        "win64",
        ResponseTemplate::new(200).set_body_bytes(driver_archive("win64", b"driver 131")),
    )
    .await;
    let catalog = CatalogPage::new()
        .channel("stable", STABLE, &[("chromedriver", "win64", url.as_str())])
        .channel("beta", "132.0.6834.32", &[])
        .render();

    let staging = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    let mut engine = engine("win64", false);
    let report = engine.run(&request(catalog, Some(LOCAL), staging.path(), dest.path())).await.unwrap();

    assert!(report.decision.needs_update);
    assert_eq!(
        report.decision.comparison.as_ref().map(|c| c.classification),
        Some(Classification::LocalOlder)
    );
    let installed = report.installed().unwrap();
    assert_eq!(installed.installed_path.file_name().unwrap(), "chromedriver.exe");
    assert_eq!(fs::read(&installed.installed_path).unwrap(), b"driver 131");
    assert_eq!(installed.backup_path, None);

    assert_eq!(
        engine.transitions(),
        &[
            EngineState::Idle,
            EngineState::CatalogFetched,
            EngineState::VersionCompared,
            EngineState::Downloading,
            EngineState::Extracted,
            EngineState::Installed,
        ]
    );
}

#[tokio::test]
async fn test_missing_local_driver_installs_without_comparison() {
    let server = MockServer::start().await;
    let url = serve_driver(
        &server,
        "linux64",
        ResponseTemplate::new(200).set_body_bytes(driver_archive("linux64", b"driver 131")),
    )
    .await;
    let catalog = stable_page("linux64", &url);

    let staging = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    let mut engine = engine("linux64", false);
    let report = engine.run(&request(catalog, None, staging.path(), dest.path())).await.unwrap();

    assert_eq!(report.decision.comparison, None);
    assert!(report.decision.needs_update);
    assert!(dest.path().join("chromedriver").is_file());
}

#[tokio::test]
async fn test_existing_driver_is_backed_up() {
    let server = MockServer::start().await;
    let url = serve_driver(
        &server,
        "win64",
        ResponseTemplate::new(200).set_body_bytes(driver_archive("win64", b"driver 131")),
    )
    .await;
    let catalog = stable_page("win64", &url);

    let staging = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    fs::write(dest.path().join("chromedriver.exe"), b"driver 130").unwrap();

    let mut engine = engine("win64", false);
    let report = engine.run(&request(catalog, Some(LOCAL), staging.path(), dest.path())).await.unwrap();

    let backup = report.installed().unwrap().backup_path.clone().unwrap();
    assert_eq!(backup, dest.path().join("chromedriver.exe.bak"));
    assert_eq!(fs::read(backup).unwrap(), b"driver 130");
}

#[tokio::test]
async fn test_default_staging_beside_linux_install() {
    let server = MockServer::start().await;
    let url = serve_driver(
        &server,
        "linux64",
        ResponseTemplate::new(200).set_body_bytes(driver_archive("linux64", b"driver 131")),
    )
    .await;
    let catalog = stable_page("linux64", &url);

    // Working directory doubles as the install target.
    let cwd = TempDir::new().unwrap();
    fs::write(cwd.path().join("chromedriver"), b"driver 130").unwrap();
    let staging = cwd.path().join(DEFAULT_STAGING_DIR);

    let mut engine = engine("linux64", false);
    let report = engine.run(&request(catalog, Some(LOCAL), &staging, cwd.path())).await.unwrap();

    let installed = report.installed().unwrap();
    assert_eq!(installed.installed_path, cwd.path().join("chromedriver"));
    assert_eq!(fs::read(&installed.installed_path).unwrap(), b"driver 131");
    assert_eq!(fs::read(cwd.path().join("chromedriver.bak")).unwrap(), b"driver 130");
    assert!(staging.join("chromedriver-linux64").join("chromedriver").is_file());
}

#[tokio::test]
async fn test_directory_at_install_path_is_not_moved() {
    let server = MockServer::start().await;
    let url = serve_driver(
        &server,
        "linux64",
        ResponseTemplate::new(200).set_body_bytes(driver_archive("linux64", b"driver 131")),
    )
    .await;
    let catalog = stable_page("linux64", &url);

    let cwd = TempDir::new().unwrap();
    let staging = cwd.path().join("chromedriver");

    let mut engine = engine("linux64", false);
    let failure =
        engine.run(&request(catalog, Some(LOCAL), &staging, cwd.path())).await.unwrap_err();

    assert!(matches!(
        failure.error,
        UpdateError::Install(InstallError::TargetNotFile { .. })
    ));
    assert!(staging.join("chromedriver-linux64").join("chromedriver").is_file());
    assert!(!cwd.path().join("chromedriver.bak").exists());
}

#[tokio::test]
async fn test_up_to_date_downloads_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let url = format!("{}/never.zip", server.uri());
    let catalog = stable_page("win64", &url);

    let staging = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    let mut engine = engine("win64", false);
    let report = engine.run(&request(catalog, Some(STABLE), staging.path(), dest.path())).await.unwrap();

    assert_eq!(report.outcome, UpdateOutcome::UpToDate);
    assert_eq!(engine.state(), EngineState::UpToDate);
    assert_eq!(fs::read_dir(dest.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_force_reinstalls_current_version() {
    let server = MockServer::start().await;
    let url = serve_driver(
        &server,
        "win64",
        ResponseTemplate::new(200).set_body_bytes(driver_archive("win64", b"driver 131 again")),
    )
    .await;
    let catalog = stable_page("win64", &url);

    let staging = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    let mut engine = engine("win64", true);
    let report = engine.run(&request(catalog, Some(STABLE), staging.path(), dest.path())).await.unwrap();

    assert!(!report.decision.needs_update);
    assert_eq!(fs::read(&report.installed().unwrap().installed_path).unwrap(), b"driver 131 again");
}

#[tokio::test]
async fn test_download_failure_reports_versions() {
    let server = MockServer::start().await;
    let url = serve_driver(&server, "win64", ResponseTemplate::new(404)).await;
    let catalog = stable_page("win64", &url);

    let staging = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    fs::write(dest.path().join("chromedriver.exe"), b"driver 130").unwrap();

    let mut engine = engine("win64", false);
    let failure =
        engine.run(&request(catalog, Some(LOCAL), staging.path(), dest.path())).await.unwrap_err();

    assert_eq!(failure.local_version.as_deref(), Some(LOCAL));
    assert_eq!(failure.target_version.as_deref(), Some(STABLE));
    assert!(matches!(
        failure.error,
        UpdateError::Install(InstallError::HttpError { status: 404, .. })
    ));
    assert_eq!(engine.transitions().last(), Some(&EngineState::Failed));
    assert!(!engine.transitions().contains(&EngineState::Extracted));
    assert_eq!(fs::read(dest.path().join("chromedriver.exe")).unwrap(), b"driver 130");
    assert!(!dest.path().join("chromedriver.exe.bak").exists());
}
