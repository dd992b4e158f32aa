use chromedriver_sync::installer::{ArtifactInstaller, InstallError, InstallRequest};
use chromedriver_sync::test_utils::{driver_archive, init_test_logging, zip_bytes};
use std::fs;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn serve(server: &MockServer, route: &str, response: ResponseTemplate) -> String {
    Mock::given(method("GET")).and(path(route)).respond_with(response).mount(server).await;
    format!("{}{}", server.uri(), route)
}

fn installer(platform: &str) -> ArtifactInstaller {
    ArtifactInstaller::new(platform).unwrap().with_progress(false)
}

#[tokio::test]
async fn test_fetch_and_extract_unpacks_archive() {
    init_test_logging(None);
    let server = MockServer::start().await;
    let url = serve(
        &server,
        "/131.0.6778.85/win64/chromedriver-win64.zip",
        ResponseTemplate::new(200).set_body_bytes(driver_archive("win64", b"MZ driver")),
    )
    .await;

    let staging = TempDir::new().unwrap();
    let root = installer("win64").fetch_and_extract(&url, staging.path()).await.unwrap();

    assert_eq!(root, staging.path());
    let binary = staging.path().join("chromedriver-win64").join("chromedriver.exe");
    assert_eq!(fs::read(binary).unwrap(), b"MZ driver");
    assert!(staging.path().join("chromedriver-win64").join("LICENSE.chromedriver").exists());
}

#[tokio::test]
async fn test_http_error_writes_nothing() {
    let server = MockServer::start().await;
    let url = serve(&server, "/missing.zip", ResponseTemplate::new(404).set_body_string("Not Found")).await;

    let staging = TempDir::new().unwrap();
    let err = installer("win64").fetch_and_extract(&url, staging.path()).await.unwrap_err();

    match err {
        InstallError::HttpError { status, .. } => assert_eq!(status, 404),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(fs::read_dir(staging.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_corrupt_archive_is_extract_failed() {
    let server = MockServer::start().await;
    let url = serve(
        &server,
        "/corrupt.zip",
        ResponseTemplate::new(200).set_body_bytes(b"PK\x03\x04 truncated".to_vec()),
    )
    .await;

    let staging = TempDir::new().unwrap();
    let err = installer("win64").fetch_and_extract(&url, staging.path()).await.unwrap_err();

    assert!(matches!(err, InstallError::ExtractFailed { .. }));
    assert_eq!(fs::read_dir(staging.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_unreachable_host_is_fetch_failed() {
    let url = "http://127.0.0.1:1/chromedriver.zip";

    let staging = TempDir::new().unwrap();
    let err = installer("win64").fetch_and_extract(url, staging.path()).await.unwrap_err();

    assert!(matches!(err, InstallError::FetchFailed { .. }));
}

#[tokio::test]
async fn test_archive_for_wrong_platform_is_source_missing() {
    let server = MockServer::start().await;
    let url = serve(
        &server,
        "/chromedriver-linux64.zip",
        ResponseTemplate::new(200).set_body_bytes(driver_archive("linux64", b"ELF")),
    )
    .await;

    let staging = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    let err = installer("win64")
        .install(&InstallRequest {
            source_archive_url: url,
            staging_dir: staging.path().to_path_buf(),
            destination_dir: dest.path().to_path_buf(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, InstallError::SourceMissing { .. }));
    assert!(!dest.path().join("chromedriver.exe").exists());
}

#[tokio::test]
async fn test_two_installs_rotate_one_backup() {
    let server = MockServer::start().await;
    let first = serve(
        &server,
        "/v1/chromedriver-linux64.zip",
        ResponseTemplate::new(200).set_body_bytes(driver_archive("linux64", b"driver one")),
    )
    .await;
    let second = serve(
        &server,
        "/v2/chromedriver-linux64.zip",
        ResponseTemplate::new(200).set_body_bytes(driver_archive("linux64", b"driver two")),
    )
    .await;

    let staging = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    let installer = installer("linux64");

    for url in [first, second] {
        installer
            .install(&InstallRequest {
                source_archive_url: url,
                staging_dir: staging.path().to_path_buf(),
                destination_dir: dest.path().to_path_buf(),
            })
            .await
            .unwrap();
    }

    assert_eq!(fs::read(dest.path().join("chromedriver")).unwrap(), b"driver two");
    assert_eq!(fs::read(dest.path().join("chromedriver.bak")).unwrap(), b"driver one");
    let mut names: Vec<String> = fs::read_dir(dest.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["chromedriver", "chromedriver.bak"]);
}

#[tokio::test]
async fn test_traversal_entry_rejected() {
    let server = MockServer::start().await;
    let url = serve(
        &server,
        "/evil.zip",
        ResponseTemplate::new(200).set_body_bytes(zip_bytes(&[
            ("chromedriver-win64/chromedriver.exe", b"MZ".as_slice()),
            ("../../outside.txt", b"escape".as_slice()),
        ])),
    )
    .await;

    let parent = TempDir::new().unwrap();
    let staging = parent.path().join("staging");
    let err = installer("win64").fetch_and_extract(&url, &staging).await.unwrap_err();

    assert!(matches!(err, InstallError::ExtractFailed { .. }));
    assert!(!parent.path().join("outside.txt").exists());
    assert_eq!(fs::read_dir(&staging).unwrap().count(), 0);
}
