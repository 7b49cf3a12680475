//! Shared helpers for the integration tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use sumi_drift::config::{FetcherConfig, UserAgentConfig, WalkerConfig};
use sumi_drift::crawler::{FetchedPage, Fetcher, FetcherFactory};
use sumi_drift::DriftError;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Walker configuration with maintenance switched off
pub fn walker_config(seed: &str, history_size: usize, steps_per_leg: usize) -> WalkerConfig {
    WalkerConfig {
        seed: seed.to_string(),
        history_size,
        steps_per_leg,
        reseed_probability: 0.0,
        cookie_rotation_period: u64::MAX,
        ..WalkerConfig::default()
    }
}

pub fn fetcher_config() -> FetcherConfig {
    FetcherConfig {
        timeout_secs: 2,
        max_body_bytes: 1_000_000,
        max_redirects: 10,
    }
}

pub fn user_agent() -> UserAgentConfig {
    UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: "https://example.com/contact".to_string(),
        contact_email: "test@example.com".to_string(),
    }
}

/// Builds an HTML page whose body is one anchor per link
pub fn html_with_links(links: &[String]) -> String {
    let anchors: String = links
        .iter()
        .map(|l| format!("<a href=\"{}\">{}</a>\n", l, l))
        .collect();
    format!("<html><head><title>t</title></head><body>{}</body></html>", anchors)
}

/// Mounts an HTML page at `page_path` linking to `links`
pub async fn mount_page(server: &MockServer, page_path: &str, links: &[String]) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(html_with_links(links), "text/html"),
        )
        .mount(server)
        .await;
}

/// In-memory web whose n-th fetch can be made to fail
#[derive(Default)]
pub struct StubWeb {
    pages: HashMap<String, Vec<String>>,
    fail_on: Vec<usize>,
    calls: AtomicUsize,
    failed: Mutex<Vec<String>>,
}

impl StubWeb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, links: &[&str]) -> Self {
        self.pages
            .insert(url.to_string(), links.iter().map(|l| l.to_string()).collect());
        self
    }

    pub fn fail_on_call(mut self, call: usize) -> Self {
        self.fail_on.push(call);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn failed_urls(&self) -> Vec<String> {
        self.failed.lock().unwrap().clone()
    }
}

pub struct StubFetcher {
    web: Arc<StubWeb>,
}

#[async_trait]
impl Fetcher for StubFetcher {
    async fn fetch(&mut self, url: &Url) -> Result<FetchedPage, DriftError> {
        let call = self.web.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.web.fail_on.contains(&call) {
            self.web.failed.lock().unwrap().push(url.to_string());
            return Err(DriftError::Timeout {
                url: url.to_string(),
            });
        }

        let links = self
            .web
            .pages
            .get(url.as_str())
            .ok_or(DriftError::HttpStatus {
                url: url.to_string(),
                status: 404,
            })?;

        Ok(FetchedPage {
            final_url: url.clone(),
            status_code: 200,
            content_type: Some("text/html".to_string()),
            body: html_with_links(links).into_bytes(),
            truncated: false,
        })
    }
}

#[derive(Clone)]
pub struct StubFactory {
    pub web: Arc<StubWeb>,
}

impl StubFactory {
    pub fn new(web: StubWeb) -> Self {
        Self { web: Arc::new(web) }
    }
}

impl FetcherFactory for StubFactory {
    type Fetcher = StubFetcher;

    fn build(&self) -> Result<StubFetcher, DriftError> {
        Ok(StubFetcher {
            web: Arc::clone(&self.web),
        })
    }
}
