//! Integration tests for service extraction and summaries
//!
//! A wiremock server stands in for the chat-completions API.

mod common;

use common::{completion, llm_config};
use sumi_glean::document::parse_document;
use sumi_glean::extract::{extract, summarize, ExtractionMethod};
use sumi_glean::llm::{LlmService, TextService};
use sumi_glean::GleanError;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAGE: &str = r#"<html><body>
    <nav>Home | About | nav@example.com</nav>
    <main><p>Reach Acme at sales@acme.com or (555) 123-4567.</p></main>
</body></html>"#;

async fn mount_completion(server: &MockServer, reply: ResponseTemplate, hits: u64) {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(reply)
        .expect(hits)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_service_extraction() {
    let server = MockServer::start().await;
    mount_completion(
        &server,
        completion(
            r#"{"emails": ["sales@acme.com", "sales@acme.com"], "phone_numbers": ["(555) 123-4567"], "addresses": [], "social_media": []}"#,
        ),
        1,
    )
    .await;

    let service = LlmService::new(&llm_config(&server)).unwrap();
    let document = parse_document(PAGE, "https://acme.test/");
    let details = extract(&document, ExtractionMethod::service(&service))
        .await
        .unwrap();

    assert_eq!(details.emails, vec!["sales@acme.com"]);
    assert_eq!(details.phone_numbers, vec!["(555) 123-4567"]);
    assert!(details.addresses.is_empty());
}

#[tokio::test]
async fn test_service_extraction_with_fenced_reply() {
    let server = MockServer::start().await;
    mount_completion(
        &server,
        completion("```json\n{\"emails\": [\"sales@acme.com\"]}\n```"),
        1,
    )
    .await;

    let service = LlmService::new(&llm_config(&server)).unwrap();
    let document = parse_document(PAGE, "https://acme.test/");
    let details = extract(&document, ExtractionMethod::service(&service))
        .await
        .unwrap();
    assert_eq!(details.emails, vec!["sales@acme.com"]);
    assert!(details.social_media.is_empty());
}

#[tokio::test]
async fn test_service_non_json_reply_gives_empty_details() {
    let server = MockServer::start().await;
    mount_completion(&server, completion("I'm sorry, I can't find any contacts."), 1).await;

    let service = LlmService::new(&llm_config(&server)).unwrap();
    let document = parse_document(PAGE, "https://acme.test/");
    let details = extract(&document, ExtractionMethod::service(&service))
        .await
        .expect("malformed replies are not errors");
    assert!(details.is_empty());
}

#[tokio::test]
async fn test_service_http_error() {
    let server = MockServer::start().await;
    mount_completion(
        &server,
        ResponseTemplate::new(500).set_body_string("upstream down"),
        1,
    )
    .await;

    let service = LlmService::new(&llm_config(&server)).unwrap();
    let document = parse_document(PAGE, "https://acme.test/");
    let result = extract(&document, ExtractionMethod::service(&service)).await;
    assert!(matches!(result, Err(GleanError::Service(_))));
}

#[tokio::test]
async fn test_service_empty_choices() {
    let server = MockServer::start().await;
    mount_completion(
        &server,
        ResponseTemplate::new(200).set_body_json(serde_json::json!({ "choices": [] })),
        1,
    )
    .await;

    let service = LlmService::new(&llm_config(&server)).unwrap();
    let result = service.complete("instruction", "text", None).await;
    assert!(matches!(result, Err(GleanError::Service(_))));
}

#[tokio::test]
async fn test_chunked_service_extraction() {
    let server = MockServer::start().await;
    mount_completion(&server, completion(r#"{"emails": ["sales@acme.com"]}"#), 3).await;

    let mut config = llm_config(&server);
    config.chunk_size = 20;
    let service = LlmService::new(&config).unwrap();

    // 44 characters of content text split into three chunks
    let document = parse_document(
        "<p>aaaaaaaaaaaaaaaaaaaa bbbbbbbbbbbbbbbbbbb ccc</p>",
        "https://acme.test/",
    );
    let method =
        ExtractionMethod::from_name("service", Some(&service as &dyn TextService), config.chunk_size)
            .unwrap();
    let details = extract(&document, method).await.unwrap();
    assert_eq!(details.emails, vec!["sales@acme.com"]);
}

#[tokio::test]
async fn test_summarize() {
    let server = MockServer::start().await;
    mount_completion(
        &server,
        completion("  **Company Overview** - Acme sells anvils.\n"),
        1,
    )
    .await;

    let service = LlmService::new(&llm_config(&server)).unwrap();
    let summary = summarize(&service, "Acme sells anvils to coyotes.")
        .await
        .unwrap();
    assert_eq!(summary, "**Company Overview** - Acme sells anvils.");
}

#[tokio::test]
async fn test_model_override_and_prompt_shape() {
    let server = MockServer::start().await;
    mount_completion(&server, completion("ok"), 1).await;

    let service = LlmService::new(&llm_config(&server)).unwrap();
    let reply = service
        .complete("Do the thing.", "page text", Some("other/model"))
        .await
        .unwrap();
    assert_eq!(reply, "ok");

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["model"], "other/model");
    assert_eq!(body["messages"][0]["role"], "user");
    assert_eq!(body["messages"][0]["content"], "Do the thing.\n\npage text");
}
