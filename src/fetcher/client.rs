//! HTTP client construction and plain GET retrieval
//!
//! Failures are classified but never retried here; the crawler decides
//! whether a failed URL is fatal.

use crate::config::{FetcherConfig, UserAgentConfig};
use crate::GleanError;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;

/// Maximum redirect hops followed for a single GET
const MAX_REDIRECTS: usize = 10;

/// Builds an HTTP client with proper configuration
///
/// The same client serves robots.txt lookups and page fetches, so both
/// carry the configured `User-Agent` and timeout.
///
/// # Example
///
/// ```no_run
/// use sumi_glean::config::{FetcherConfig, UserAgentConfig};
/// use sumi_glean::fetcher::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), &FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    fetcher: &FetcherConfig,
) -> Result<Client, reqwest::Error> {
    let timeout = Duration::from_secs(fetcher.timeout_secs);

    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(timeout)
        .connect_timeout(timeout)
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL with a plain HTTP GET
///
/// # Errors
///
/// | Condition | Error |
/// |-----------|-------|
/// | Non-2xx status | `HttpStatus` |
/// | Timeout | `Fetch` ("Request timeout") |
/// | Connection refused / DNS failure | `Fetch` ("Connection failed") |
/// | Anything else in transport or body decoding | `Fetch` |
pub async fn http_get(client: &Client, url: &str) -> Result<String, GleanError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| classify_transport_error(url, &e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(GleanError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response
        .text()
        .await
        .map_err(|e| classify_transport_error(url, &e))
}

fn classify_transport_error(url: &str, e: &reqwest::Error) -> GleanError {
    let message = if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        format!("Connection failed: {}", e)
    } else if e.is_builder() {
        format!("Invalid request: {}", e)
    } else {
        e.to_string()
    };

    GleanError::Fetch {
        url: url.to_string(),
        message,
    }
}
