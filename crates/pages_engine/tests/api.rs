use std::time::Duration;

use pages_engine::{
    fetch_answer, fetch_summary, ApiClient, ApiSettings, FailureKind, ReqwestApiClient, NO_SUMMARY,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ReqwestApiClient {
    ReqwestApiClient::new(ApiSettings {
        base_url: server.uri(),
        ..ApiSettings::default()
    })
    .expect("client")
}

#[tokio::test]
async fn summary_posts_exactly_the_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/summary"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({ "url": "https://example.com" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url": "https://example.com",
            "summary": "**Hi**",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let summary = fetch_summary(&client, "https://example.com")
        .await
        .expect("summary ok");
    assert_eq!(summary, "**Hi**");
}

#[tokio::test]
async fn qa_posts_url_and_question() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/qa"))
        .and(body_json(json!({
            "url": "https://example.com",
            "question": "What is it?",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url": "https://example.com",
            "question": "What is it?",
            "answer": "A test page.",
            "sources": ["snippet"],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let answer = fetch_answer(&client, "https://example.com", "What is it?")
        .await
        .expect("answer ok");
    assert_eq!(answer.markdown, "A test page.");
    assert_eq!(answer.sources, vec!["snippet".to_string()]);
}

#[tokio::test]
async fn non_success_status_carries_body_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/summary"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = fetch_summary(&client, "https://example.com")
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(500));
    assert_eq!(err.to_string(), "HTTP 500: boom");
}

#[tokio::test]
async fn client_errors_are_failures_too() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/qa"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Question cannot be empty."))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .post_json("/qa", &json!({ "url": "u", "question": " " }))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(400));
    assert_eq!(err.message, "HTTP 400: Question cannot be empty.");
}

#[tokio::test]
async fn invalid_json_is_a_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/summary"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = fetch_summary(&client, "https://example.com")
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::MalformedResponse);
}

#[tokio::test]
async fn missing_field_falls_back_to_placeholder() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "url": "u" })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let summary = fetch_summary(&client, "u").await.expect("summary ok");
    assert_eq!(summary, NO_SUMMARY);
}

#[tokio::test]
async fn slow_service_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/summary"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(json!({ "summary": "late" })),
        )
        .mount(&server)
        .await;

    let client = ReqwestApiClient::new(ApiSettings {
        base_url: server.uri(),
        request_timeout: Duration::from_millis(50),
        ..ApiSettings::default()
    })
    .expect("client");
    let err = fetch_summary(&client, "u").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn unreachable_service_is_a_network_failure() {
    // Reserve a free port, then release it so nothing is listening there.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let client = ReqwestApiClient::new(ApiSettings {
        base_url,
        connect_timeout: Duration::from_millis(500),
        ..ApiSettings::default()
    })
    .expect("client");
    let err = fetch_summary(&client, "u").await.unwrap_err();
    assert!(matches!(err.kind, FailureKind::Network | FailureKind::Timeout));
    assert!(!err.message.is_empty());
}
