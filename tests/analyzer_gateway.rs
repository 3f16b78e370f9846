use scan_dispatch::analyzer::send_scan_request;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_scan_request_posts_json_with_api_key_header() {
    let server = MockServer::start().await;
    let payload = json!({
        "repo": "acme/widget",
        "plugins": ["secrets"],
    });

    Mock::given(method("POST"))
        .and(path("/api/v1/scan"))
        .and(header("x-api-key", "abc123"))
        .and(header("content-type", "application/json"))
        .and(body_json(&payload))
        .respond_with(ResponseTemplate::new(202).set_body_string("accepted"))
        .expect(1)
        .mount(&server)
        .await;

    let client = reqwest::Client::new();
    let url = format!("{}/api/v1/scan", server.uri());
    let response = send_scan_request(&client, &url, "abc123", &payload)
        .await
        .expect("request should reach the mock analyzer");

    assert_eq!(response.status(), 202);
    assert_eq!(response.text().await.unwrap(), "accepted");
}

#[tokio::test]
async fn test_scan_request_returns_error_status_unmodified() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = reqwest::Client::new();
    let response = send_scan_request(&client, &server.uri(), "abc123", &json!({}))
        .await
        .expect("a 5xx is still a response, not a transport error");

    // No status branching at this layer; the caller interprets the response.
    assert_eq!(response.status(), 503);
}
