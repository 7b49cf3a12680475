//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the walker, including:
//! - Building HTTP clients with a cookie jar and user agent string
//! - GET requests with redirect following and a whole-request timeout
//! - Truncating response bodies to a fixed byte budget
//! - Error classification
//!
//! The walker only sees the [`Fetcher`] trait. A fresh fetcher (and so a
//! fresh cookie jar) is obtained from a [`FetcherFactory`] whenever cookies
//! are rotated.

use crate::config::{FetcherConfig, UserAgentConfig};
use crate::url::strip_fragment;
use crate::DriftError;
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client, Response};
use std::time::Duration;
use url::Url;

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects, without fragment
    pub final_url: Url,
    /// HTTP status code
    pub status_code: u16,
    /// Content-Type header value, if any
    pub content_type: Option<String>,
    /// Body bytes, at most the configured limit
    pub body: Vec<u8>,
    /// True if the body was cut at the limit
    pub truncated: bool,
}

/// Fetches pages on behalf of the walker
///
/// Implementations keep session state (cookies) across calls on the same
/// instance and must fail with a distinguishable error on network failure,
/// timeout or a non-success status.
#[async_trait]
pub trait Fetcher: Send {
    async fn fetch(&mut self, url: &Url) -> Result<FetchedPage, DriftError>;
}

/// Builds fresh fetchers; called once at startup and on every cookie rotation
pub trait FetcherFactory: Send + Sync {
    type Fetcher: Fetcher;

    fn build(&self) -> Result<Self::Fetcher, DriftError>;
}

/// Builds an HTTP client with proper configuration
///
/// The client follows up to `max_redirects` redirects, keeps cookies for
/// its own lifetime and aborts any request after `timeout_secs`.
///
/// # Example
///
/// ```no_run
/// use sumi_drift::config::{FetcherConfig, UserAgentConfig};
/// use sumi_drift::crawler::build_http_client;
///
/// let client = build_http_client(&FetcherConfig::default(), &UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    config: &FetcherConfig,
    user_agent: &UserAgentConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(Duration::from_secs(config.timeout_secs))
        .redirect(Policy::limited(config.max_redirects))
        .cookie_store(true)
        .gzip(true)
        .brotli(true)
        .build()
}

/// reqwest-backed fetcher with its own cookie jar
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    max_body_bytes: usize,
}

impl HttpFetcher {
    pub fn new(config: &FetcherConfig, user_agent: &UserAgentConfig) -> Result<Self, DriftError> {
        let client = build_http_client(config, user_agent).map_err(DriftError::ClientBuild)?;
        Ok(Self {
            client,
            max_body_bytes: config.max_body_bytes,
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&mut self, url: &Url) -> Result<FetchedPage, DriftError> {
        let mut response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        let final_url = strip_fragment(response.url());

        if !status.is_success() {
            return Err(DriftError::HttpStatus {
                url: final_url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let (body, truncated) = read_capped(&mut response, self.max_body_bytes)
            .await
            .map_err(|e| classify_error(&final_url, e))?;

        if truncated {
            tracing::debug!("Truncated body of {} at {} bytes", final_url, body.len());
        }

        Ok(FetchedPage {
            final_url,
            status_code: status.as_u16(),
            content_type,
            body,
            truncated,
        })
    }
}

/// Factory producing [`HttpFetcher`]s from the loaded configuration
#[derive(Debug, Clone, Default)]
pub struct HttpFetcherFactory {
    fetcher: FetcherConfig,
    user_agent: UserAgentConfig,
}

impl HttpFetcherFactory {
    pub fn new(fetcher: FetcherConfig, user_agent: UserAgentConfig) -> Self {
        Self {
            fetcher,
            user_agent,
        }
    }
}

impl FetcherFactory for HttpFetcherFactory {
    type Fetcher = HttpFetcher;

    fn build(&self) -> Result<HttpFetcher, DriftError> {
        HttpFetcher::new(&self.fetcher, &self.user_agent)
    }
}

/// A body that arrives in chunks
#[async_trait]
trait ChunkSource: Send {
    type Chunk: AsRef<[u8]> + Send;
    type Error: Send;

    async fn next_chunk(&mut self) -> Result<Option<Self::Chunk>, Self::Error>;
}

#[async_trait]
impl ChunkSource for Response {
    type Chunk = Vec<u8>;
    type Error = reqwest::Error;

    async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>, reqwest::Error> {
        Ok(self.chunk().await?.map(|chunk| chunk.to_vec()))
    }
}

/// Reads at most `limit` bytes of the body, chunk by chunk
///
/// The rest of the body is never downloaded: reading stops as soon as the
/// limit is reached. When the limit lands exactly on a chunk boundary, one
/// more read decides whether the body was truncated; if that read fails the
/// body is reported as truncated rather than discarded.
async fn read_capped<S: ChunkSource>(source: &mut S, limit: usize) -> Result<(Vec<u8>, bool), S::Error> {
    let mut body = Vec::new();
    while let Some(chunk) = source.next_chunk().await? {
        let chunk = chunk.as_ref();
        let remaining = limit.saturating_sub(body.len());
        if chunk.len() >= remaining {
            body.extend_from_slice(&chunk[..remaining]);
            let truncated = chunk.len() > remaining || !matches!(source.next_chunk().await, Ok(None));
            return Ok((body, truncated));
        }
        body.extend_from_slice(chunk);
    }
    Ok((body, false))
}

/// Maps a reqwest error onto the crawl error kinds
fn classify_error(url: &Url, error: reqwest::Error) -> DriftError {
    if error.is_timeout() {
        DriftError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_redirect() {
        DriftError::RedirectLimit {
            url: url.to_string(),
        }
    } else {
        DriftError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}
