use chromedriver_sync::catalog::{self, CatalogClient, Channel, ParseError};
use chromedriver_sync::test_utils::init_test_logging;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const STABLE_BETA: &str = include_str!("../fixtures/catalog_stable_beta.html");
const NO_SECTIONS: &str = include_str!("../fixtures/catalog_no_sections.html");

#[test]
fn test_fixture_has_stable_and_beta_only() {
    init_test_logging(None);

    let catalog = catalog::parse(STABLE_BETA).unwrap();

    let channels: Vec<Channel> = catalog.channels().map(|(channel, _)| channel).collect();
    assert_eq!(channels, vec![Channel::Stable, Channel::Beta]);
    assert_eq!(catalog.stable().unwrap().version(), "131.0.6778.85");
    assert_eq!(catalog.channel(Channel::Beta).unwrap().version(), "132.0.6834.32");
}

#[test]
fn test_fixture_skips_malformed_rows_only() {
    let catalog = catalog::parse(STABLE_BETA).unwrap();
    let stable = catalog.stable().unwrap();

    assert_eq!(stable.platforms_for("chromedriver"), vec!["linux64", "win64"]);
    assert_eq!(stable.platforms_for("chrome"), vec!["linux64", "win64"]);
    assert!(stable.platforms_for("chrome-headless-shell").is_empty());
    assert_eq!(
        stable.download_url("chromedriver", "win64"),
        Some(
            "https://storage.googleapis.com/chrome-for-testing-public/131.0.6778.85/win64/chromedriver-win64.zip"
        )
    );
}

#[test]
fn test_page_without_sections_is_empty_catalog() {
    let catalog = catalog::parse(NO_SECTIONS).unwrap();
    assert!(catalog.is_empty());
}

#[test]
fn test_plain_text_is_parse_error() {
    assert_eq!(catalog::parse(""), Err(ParseError::Empty));
    assert!(matches!(
        catalog::parse("service unavailable"),
        Err(ParseError::NotMarkup { .. })
    ));
}

#[test]
fn test_catalog_serializes_by_channel_name() {
    let catalog = catalog::parse(STABLE_BETA).unwrap();
    let json = serde_json::to_value(&catalog).unwrap();

    assert!(json.get("stable").is_some());
    assert!(json.get("beta").is_some());
    assert!(json.get("dev").is_none());
}

#[tokio::test]
async fn test_fetch_page_from_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/chrome-for-testing/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(STABLE_BETA))
        .mount(&server)
        .await;

    let client = CatalogClient::with_url(format!("{}/chrome-for-testing/", server.uri())).unwrap();
    let body = client.fetch_page().await.unwrap();

    assert_eq!(catalog::parse(&body).unwrap().len(), 2);
}

#[tokio::test]
async fn test_fetch_page_non_success_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = CatalogClient::with_url(server.uri()).unwrap();
    let err = client.fetch_page().await.unwrap_err();

    assert!(err.to_string().contains("503"));
}
