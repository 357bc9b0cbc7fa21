//! Shared helpers for the integration tests

#![allow(dead_code)]

use std::path::Path;
use sumi_glean::config::{Config, LlmConfig};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Default configuration, optionally with a cache directory
pub fn test_config(cache_dir: Option<&Path>) -> Config {
    let mut config = Config::default();
    config.user_agent.crawler_name = "TestBot".to_string();
    config.user_agent.crawler_version = "1.0.0".to_string();
    config.fetcher.timeout_secs = 5;
    config.fetcher.cache_dir = cache_dir.map(Path::to_path_buf);
    config
}

/// Language model settings pointing at a mock server
pub fn llm_config(server: &MockServer) -> LlmConfig {
    LlmConfig {
        api_key: Some("test-key".to_string()),
        base_url: format!("{}/v1", server.uri()),
        model: "test/model".to_string(),
        timeout_secs: 5,
        chunk_size: 0,
    }
}

/// HTML page whose body is `content` followed by one anchor per link
pub fn html_page(content: &str, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();
    format!(
        "<html><head><title>Test</title></head><body><main><p>{}</p>{}</main></body></html>",
        content, anchors
    )
}

/// Mounts robots.txt with the given body
pub async fn mount_robots(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Mounts an HTML page that must be requested exactly `hits` times
pub async fn mount_page(server: &MockServer, page_path: &str, body: String, hits: u64) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .expect(hits)
        .mount(server)
        .await;
}

/// Chat-completions reply carrying `content`
pub fn completion(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "id": "gen-1",
        "choices": [
            { "index": 0, "message": { "role": "assistant", "content": content } }
        ]
    }))
}
