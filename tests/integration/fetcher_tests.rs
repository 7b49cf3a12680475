//! Tests for the reqwest-backed fetcher against wiremock servers

use crate::common::{fetcher_config, mount_page, user_agent};
use std::time::Duration;
use sumi_drift::config::FetcherConfig;
use sumi_drift::crawler::{extract_links, Fetcher, FetcherFactory, HttpFetcher, HttpFetcherFactory};
use sumi_drift::DriftError;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn page_url(server: &MockServer, page_path: &str) -> Url {
    Url::parse(&format!("{}{}", server.uri(), page_path)).expect("Failed to build URL")
}

#[tokio::test]
async fn test_fetch_returns_body_and_links() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_page(&mock_server, "/", &[format!("{}/a", base_url), "/b".to_string()]).await;

    let mut fetcher = HttpFetcher::new(&fetcher_config(), &user_agent()).expect("Failed to build fetcher");
    let page = fetcher.fetch(&page_url(&mock_server, "/")).await.expect("Fetch failed");

    assert_eq!(page.status_code, 200);
    assert_eq!(page.final_url, page_url(&mock_server, "/"));
    assert_eq!(page.content_type.as_deref(), Some("text/html"));
    assert!(!page.truncated);

    let links = extract_links(&page.final_url, &page.body).expect("Extraction failed");
    assert_eq!(links.len(), 2);
    assert!(links.contains(&page_url(&mock_server, "/a")));
    assert!(links.contains(&page_url(&mock_server, "/b")));
}

#[tokio::test]
async fn test_fetch_sends_user_agent() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(header(
            "user-agent",
            "TestBot/1.0.0 (+https://example.com/contact; test@example.com)",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&mock_server)
        .await;

    let mut fetcher = HttpFetcher::new(&fetcher_config(), &user_agent()).unwrap();
    let result = fetcher.fetch(&page_url(&mock_server, "/")).await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_fetch_follows_redirects() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", format!("{}/new", base_url).as_str()))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/new", &["/elsewhere".to_string()]).await;

    let mut fetcher = HttpFetcher::new(&fetcher_config(), &user_agent()).unwrap();
    let page = fetcher.fetch(&page_url(&mock_server, "/old")).await.unwrap();

    assert_eq!(page.final_url, page_url(&mock_server, "/new"));
}

#[tokio::test]
async fn test_redirect_limit() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/loop"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", format!("{}/loop", base_url).as_str()))
        .mount(&mock_server)
        .await;

    let config = FetcherConfig {
        max_redirects: 3,
        ..fetcher_config()
    };
    let mut fetcher = HttpFetcher::new(&config, &user_agent()).unwrap();
    let result = fetcher.fetch(&page_url(&mock_server, "/loop")).await;

    assert!(matches!(result, Err(DriftError::RedirectLimit { .. })));
}

#[tokio::test]
async fn test_non_success_status_is_an_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let mut fetcher = HttpFetcher::new(&fetcher_config(), &user_agent()).unwrap();

    let missing = fetcher.fetch(&page_url(&mock_server, "/missing")).await;
    assert!(matches!(missing, Err(DriftError::HttpStatus { status: 404, .. })));

    let broken = fetcher.fetch(&page_url(&mock_server, "/broken")).await;
    assert!(matches!(broken, Err(DriftError::HttpStatus { status: 503, .. })));
}

#[tokio::test]
async fn test_timeout() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html></html>")
                .set_delay(Duration::from_secs(4)),
        )
        .mount(&mock_server)
        .await;

    let config = FetcherConfig {
        timeout_secs: 1,
        ..fetcher_config()
    };
    let mut fetcher = HttpFetcher::new(&config, &user_agent()).unwrap();
    let result = fetcher.fetch(&page_url(&mock_server, "/slow")).await;

    assert!(matches!(result, Err(DriftError::Timeout { .. })));
    assert!(result.unwrap_err().is_fetch_error());
}

#[tokio::test]
async fn test_connection_refused() {
    // Bind then drop a server so the port is very likely closed.
    let uri = {
        let mock_server = MockServer::start().await;
        mock_server.uri()
    };

    let mut fetcher = HttpFetcher::new(&fetcher_config(), &user_agent()).unwrap();
    let result = fetcher.fetch(&Url::parse(&format!("{}/", uri)).unwrap()).await;

    assert!(result.is_err());
    assert!(result.unwrap_err().is_fetch_error());
}

#[tokio::test]
async fn test_body_is_capped() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/big"))
        .respond_with(ResponseTemplate::new(200).set_body_string("x".repeat(5000)))
        .mount(&mock_server)
        .await;

    let config = FetcherConfig {
        max_body_bytes: 100,
        ..fetcher_config()
    };
    let mut fetcher = HttpFetcher::new(&config, &user_agent()).unwrap();
    let page = fetcher.fetch(&page_url(&mock_server, "/big")).await.unwrap();

    assert_eq!(page.body.len(), 100);
    assert!(page.truncated);
}

#[tokio::test]
async fn test_body_exactly_at_cap_is_not_truncated() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/exact"))
        .respond_with(ResponseTemplate::new(200).set_body_string("y".repeat(64)))
        .mount(&mock_server)
        .await;

    let config = FetcherConfig {
        max_body_bytes: 64,
        ..fetcher_config()
    };
    let mut fetcher = HttpFetcher::new(&config, &user_agent()).unwrap();
    let page = fetcher.fetch(&page_url(&mock_server, "/exact")).await.unwrap();

    assert_eq!(page.body.len(), 64);
    assert!(!page.truncated);
}

#[tokio::test]
async fn test_cookies_persist_until_rotation() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "session=abc123; Path=/")
                .set_body_string("<html></html>"),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/private"))
        .and(header("cookie", "session=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&mock_server)
        .await;

    let factory = HttpFetcherFactory::new(fetcher_config(), user_agent());

    let mut fetcher = factory.build().unwrap();
    fetcher.fetch(&page_url(&mock_server, "/login")).await.unwrap();
    let with_cookie = fetcher.fetch(&page_url(&mock_server, "/private")).await;
    assert!(with_cookie.is_ok());

    // A rebuilt fetcher starts with an empty cookie jar.
    let mut fresh = factory.build().unwrap();
    let without_cookie = fresh.fetch(&page_url(&mock_server, "/private")).await;
    assert!(matches!(without_cookie, Err(DriftError::HttpStatus { status: 404, .. })));
}
