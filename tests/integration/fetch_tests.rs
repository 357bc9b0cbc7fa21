//! Integration tests for the robots-compliant, cached fetcher
//!
//! These tests use wiremock to create mock HTTP servers and tempfile cache
//! directories.

mod common;

use async_trait::async_trait;
use common::{html_page, mount_page, mount_robots, test_config};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use sumi_glean::fetcher::{cache_key, Fetcher, PageStore, Renderer};
use sumi_glean::GleanError;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher(cache_dir: Option<&std::path::Path>) -> Fetcher {
    let config = test_config(cache_dir);
    Fetcher::new(&config.user_agent, &config.fetcher).expect("Failed to build fetcher")
}

/// Renderer returning a fixed body and counting calls
struct StaticRenderer {
    body: String,
    calls: AtomicUsize,
}

#[async_trait]
impl Renderer for StaticRenderer {
    async fn render(&self, _url: &str) -> Result<String, GleanError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.body.clone())
    }
}

#[tokio::test]
async fn test_fetch_without_robots_file() {
    let server = MockServer::start().await;
    mount_page(&server, "/", html_page("hello", &[]), 1).await;

    let body = fetcher(None)
        .fetch(&format!("{}/", server.uri()), false)
        .await
        .expect("fetch should succeed when robots.txt is missing");
    assert!(body.contains("hello"));
}

#[tokio::test]
async fn test_cache_round_trip_hits_network_once() {
    let server = MockServer::start().await;
    let cache_dir = TempDir::new().unwrap();
    mount_page(&server, "/contact", html_page("a@x.com", &[]), 1).await;

    let url = format!("{}/contact", server.uri());
    let fetcher = fetcher(Some(cache_dir.path()));

    let first = fetcher.fetch(&url, false).await.unwrap();
    let second = fetcher.fetch(&url, false).await.unwrap();
    assert_eq!(first, second);

    // Flat layout: one file named by the SHA-256 of the URL
    let cached = cache_dir.path().join(cache_key(&url));
    assert_eq!(std::fs::read_to_string(cached).unwrap(), first);
}

#[tokio::test]
async fn test_cache_shared_between_fetchers() {
    let server = MockServer::start().await;
    let cache_dir = TempDir::new().unwrap();
    mount_page(&server, "/", html_page("shared", &[]), 1).await;

    let url = format!("{}/", server.uri());
    let first = fetcher(Some(cache_dir.path())).fetch(&url, false).await.unwrap();
    let second = fetcher(Some(cache_dir.path())).fetch(&url, false).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_robots_denial_wins_over_cache() {
    let server = MockServer::start().await;
    let cache_dir = TempDir::new().unwrap();
    mount_robots(&server, "User-agent: *\nDisallow: /private\n").await;
    mount_page(&server, "/private", html_page("secret", &[]), 0).await;

    let url = format!("{}/private", server.uri());
    PageStore::open(cache_dir.path())
        .unwrap()
        .put(&url, "cached secret")
        .unwrap();

    let result = fetcher(Some(cache_dir.path())).fetch(&url, false).await;
    match result {
        Err(GleanError::PermissionDenied { url: denied }) => assert_eq!(denied, url),
        other => panic!("expected PermissionDenied, got {:?}", other),
    }
}

#[tokio::test]
async fn test_robots_specific_agent_group() {
    let server = MockServer::start().await;
    mount_robots(
        &server,
        "User-agent: TestBot\nDisallow: /\n\nUser-agent: *\nAllow: /\n",
    )
    .await;
    mount_page(&server, "/", html_page("home", &[]), 0).await;

    let result = fetcher(None).fetch(&format!("{}/", server.uri()), false).await;
    assert!(matches!(result, Err(GleanError::PermissionDenied { .. })));
}

#[tokio::test]
async fn test_robots_fetched_once_per_origin() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nAllow: /\n"))
        .expect(1)
        .mount(&server)
        .await;
    for page in ["/a", "/b", "/c"] {
        mount_page(&server, page, html_page(page, &[]), 1).await;
    }

    let fetcher = fetcher(None);
    for page in ["/a", "/b", "/c"] {
        fetcher
            .fetch(&format!("{}{}", server.uri(), page), false)
            .await
            .unwrap();
    }
    assert_eq!(fetcher.robots().cached_origins().await, 1);
}

#[tokio::test]
async fn test_robots_server_error_allows_all() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/", html_page("open", &[]), 2).await;

    let fetcher = fetcher(None);
    let url = format!("{}/", server.uri());
    assert!(fetcher.fetch(&url, false).await.is_ok());
    // The allow-all decision is memoized, robots.txt is not retried
    assert!(fetcher.fetch(&url, false).await.is_ok());
}

#[tokio::test]
async fn test_http_error_status_not_cached() {
    let server = MockServer::start().await;
    let cache_dir = TempDir::new().unwrap();
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .expect(2)
        .mount(&server)
        .await;

    let url = format!("{}/gone", server.uri());
    let fetcher = fetcher(Some(cache_dir.path()));

    for _ in 0..2 {
        match fetcher.fetch(&url, false).await {
            Err(GleanError::HttpStatus { status, .. }) => assert_eq!(status, 404),
            other => panic!("expected HttpStatus, got {:?}", other),
        }
    }
    assert!(fetcher.store().unwrap().get(&url).unwrap().is_none());
}

#[tokio::test]
async fn test_transport_failure_is_fetch_error() {
    // Nothing listens on port 1
    let result = fetcher(None).fetch("http://127.0.0.1:1/", false).await;
    assert!(matches!(result, Err(GleanError::Fetch { .. })));
}

#[tokio::test]
async fn test_render_without_renderer_is_configuration_error() {
    let server = MockServer::start().await;
    mount_page(&server, "/", html_page("static", &[]), 0).await;

    let result = fetcher(None).fetch(&format!("{}/", server.uri()), true).await;
    assert!(matches!(result, Err(GleanError::Configuration(_))));
}

#[tokio::test]
async fn test_render_path_uses_cache_and_robots() {
    let server = MockServer::start().await;
    let cache_dir = TempDir::new().unwrap();
    mount_robots(&server, "User-agent: *\nDisallow: /private\n").await;

    let renderer = Arc::new(StaticRenderer {
        body: "<p>rendered a@x.com</p>".to_string(),
        calls: AtomicUsize::new(0),
    });
    let fetcher = fetcher(Some(cache_dir.path())).with_renderer(renderer.clone());

    let url = format!("{}/app", server.uri());
    let first = fetcher.fetch(&url, true).await.unwrap();
    let second = fetcher.fetch(&url, true).await.unwrap();
    assert_eq!(first, "<p>rendered a@x.com</p>");
    assert_eq!(first, second);
    assert_eq!(renderer.calls.load(Ordering::SeqCst), 1);

    let denied = fetcher.fetch(&format!("{}/private", server.uri()), true).await;
    assert!(matches!(denied, Err(GleanError::PermissionDenied { .. })));
    assert_eq!(renderer.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_slow_robots_does_not_block_other_origins() {
    let slow = MockServer::start().await;
    let fast = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("User-agent: *\nAllow: /\n")
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&slow)
        .await;
    mount_robots(&fast, "User-agent: *\nDisallow: /private\n").await;

    let fetcher = fetcher(None);
    let gate = fetcher.robots();
    let slow_url = format!("{}/", slow.uri());
    let fast_url = format!("{}/private", fast.uri());

    let (slow_allowed, fast_allowed) = tokio::join!(gate.allowed(&slow_url, "TestBot"), async {
        tokio::time::timeout(Duration::from_millis(1000), gate.allowed(&fast_url, "TestBot"))
            .await
    });

    assert!(slow_allowed);
    assert!(matches!(fast_allowed, Ok(false)));
    assert_eq!(gate.cached_origins().await, 2);
}
