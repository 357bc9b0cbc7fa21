//! Integration tests for the end-to-end pipeline

mod common;

use common::{completion, html_page, llm_config, mount_page, mount_robots, test_config};
use sumi_glean::llm::LlmService;
use sumi_glean::output::to_json;
use sumi_glean::pipeline::{ExtractOptions, Pipeline};
use sumi_glean::GleanError;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CONTACT_PAGE: &str = "Email first@example.com and second@example.com; first@example.com again. \
     Call (123) 456-7890 or 987-654-3210. Locations: 123 Main St., 456 Elm Road. \
     This product costs $10 and also $20.";

#[tokio::test]
async fn test_run_pattern_with_custom_fields() {
    let server = MockServer::start().await;
    let cache_dir = TempDir::new().unwrap();
    mount_page(&server, "/contact", html_page(CONTACT_PAGE, &[]), 1).await;

    let pipeline = Pipeline::new(test_config(Some(cache_dir.path()))).unwrap();
    let options = ExtractOptions {
        patterns: vec![("prices".to_string(), r"\$\d+".to_string())],
        ..ExtractOptions::default()
    };

    let url = format!("{}/contact", server.uri());
    let report = pipeline.run(&url, &options).await.unwrap();

    assert_eq!(report.url, url);
    assert_eq!(
        report.contacts.emails,
        vec!["first@example.com", "second@example.com"]
    );
    assert_eq!(report.contacts.phone_numbers, vec!["1234567890", "9876543210"]);
    assert_eq!(report.contacts.addresses, vec!["123 Main St", "456 Elm Road"]);
    assert_eq!(report.custom.as_ref().unwrap()["prices"], vec!["$10", "$20"]);
    assert!(report.summary.is_none());

    // Served from the cache the second time
    let again = pipeline.run(&url, &options).await.unwrap();
    assert_eq!(again, report);
}

#[tokio::test]
async fn test_run_surfaces_robots_denial() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nDisallow: /\n").await;
    mount_page(&server, "/", html_page(CONTACT_PAGE, &[]), 0).await;

    let pipeline = Pipeline::new(test_config(None)).unwrap();
    let result = pipeline
        .run(&format!("{}/", server.uri()), &ExtractOptions::default())
        .await;
    assert!(matches!(result, Err(GleanError::PermissionDenied { .. })));
}

#[tokio::test]
async fn test_service_without_key_fails_before_fetching() {
    let server = MockServer::start().await;
    mount_page(&server, "/", html_page(CONTACT_PAGE, &[]), 0).await;

    let pipeline = Pipeline::new(test_config(None)).unwrap();
    let options = ExtractOptions {
        method: "service".to_string(),
        ..ExtractOptions::default()
    };
    let result = pipeline.run(&format!("{}/", server.uri()), &options).await;
    assert!(matches!(result, Err(GleanError::Configuration(_))));
}

#[tokio::test]
async fn test_run_with_service_and_summary() {
    let site = MockServer::start().await;
    let llm = MockServer::start().await;
    mount_page(&site, "/", html_page("Acme sells anvils. sales@acme.com", &[]), 1).await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(completion(r#"{"emails": ["sales@acme.com"]}"#))
        .expect(2)
        .mount(&llm)
        .await;

    let mut config = test_config(None);
    config.llm = llm_config(&llm);
    let pipeline = Pipeline::new(config).unwrap().open_service().unwrap();
    assert!(pipeline.has_service());

    let options = ExtractOptions {
        method: "service".to_string(),
        summarize: true,
        ..ExtractOptions::default()
    };
    let report = pipeline
        .run(&format!("{}/", site.uri()), &options)
        .await
        .unwrap();

    assert_eq!(report.contacts.emails, vec!["sales@acme.com"]);
    // The summary is the raw reply text
    assert_eq!(
        report.summary.as_deref(),
        Some(r#"{"emails": ["sales@acme.com"]}"#)
    );
}

#[tokio::test]
async fn test_crawl_isolates_page_failures() {
    let site = MockServer::start().await;
    let llm = MockServer::start().await;
    mount_page(&site, "/", html_page("home", &["/a", "/gone"]), 1).await;
    mount_page(&site, "/a", html_page("page a", &[]), 1).await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(410))
        .mount(&site)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&llm)
        .await;

    let mut config = test_config(None);
    config.llm = llm_config(&llm);
    let pipeline = Pipeline::new(config).unwrap().open_service().unwrap();
    let options = ExtractOptions {
        method: "service".to_string(),
        ..ExtractOptions::default()
    };

    let report = pipeline
        .crawl(&format!("{}/", site.uri()), 1, &options)
        .await
        .expect("page failures must not fail the crawl");

    assert!(report.pages.is_empty());
    assert_eq!(report.skipped.len(), 3);
    assert!(report.skipped[0].url.ends_with("/gone"));
    assert!(report.skipped[0].reason.contains("410"));
}

#[tokio::test]
async fn test_crawl_reports_every_page() {
    let site = MockServer::start().await;
    let out_dir = TempDir::new().unwrap();
    mount_page(&site, "/", html_page("home@x.com", &["/team", "/jobs"]), 1).await;
    mount_page(&site, "/team", html_page("team@x.com", &["/"]), 1).await;
    mount_page(&site, "/jobs", html_page("jobs@x.com", &["/team"]), 1).await;

    let pipeline = Pipeline::new(test_config(None)).unwrap();
    let report = pipeline
        .crawl(&format!("{}/", site.uri()), 1, &ExtractOptions::default())
        .await
        .unwrap();

    let emails: Vec<&str> = report
        .pages
        .iter()
        .map(|page| page.contacts.emails[0].as_str())
        .collect();
    assert_eq!(emails, vec!["home@x.com", "team@x.com", "jobs@x.com"]);

    let out = out_dir.path().join("contacts.json");
    to_json(&report.contacts_by_url(), Some(&out)).unwrap();
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    let team = format!("{}/team", site.uri());
    assert_eq!(value[team.as_str()]["emails"][0], "team@x.com");
    assert_eq!(value.as_object().unwrap().len(), 3);
}
