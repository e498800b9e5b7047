//! E2E tests for the profile page

mod common;

use common::{PROFILE_PATH, TestServer};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_signed_out_home_renders_without_profile() {
    let server = TestServer::new().await;

    Mock::given(method("GET"))
        .and(path(PROFILE_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server.provider)
        .await;

    let response = server
        .client
        .get(server.url("/"))
        .send()
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), 200);
    let body = response.text().await.expect("response body");
    assert!(body.contains("Sign in with LinkedIn"));
    assert!(!body.contains("class=\"raw\""));
}

#[tokio::test]
async fn test_signed_in_home_fetches_profile_once_with_headers() {
    let server = TestServer::new().await;
    let token = server.create_session_token("li-access-token");

    Mock::given(method("GET"))
        .and(path(PROFILE_PATH))
        .and(header("authorization", "Bearer li-access-token"))
        .and(header("x-li-format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "member-42",
            "numConnections": 321,
            "pictureUrl": "https://media.licdn.com/mpr/member-42.jpg"
        })))
        .expect(1)
        .mount(&server.provider)
        .await;

    let response = server
        .client
        .get(server.url("/"))
        .header("Cookie", format!("session={token}"))
        .send()
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), 200);
    let body = response.text().await.expect("response body");
    assert!(body.contains("<dd>member-42</dd>"));
    assert!(body.contains("<dd>321</dd>"));
    assert!(body.contains("https://media.licdn.com/mpr/member-42.jpg"));
    assert!(!body.contains("Sign in with LinkedIn"));
}

#[tokio::test]
async fn test_bearer_session_header_is_accepted() {
    let server = TestServer::new().await;
    let token = server.create_session_token("header-token");

    Mock::given(method("GET"))
        .and(path(PROFILE_PATH))
        .and(header("authorization", "Bearer header-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "member-7"
        })))
        .expect(1)
        .mount(&server.provider)
        .await;

    let response = server
        .client
        .get(server.url("/"))
        .header("Authorization", format!("Bearer {token}"))
        .send()
        .await
        .expect("request succeeds");

    let body = response.text().await.expect("response body");
    assert!(body.contains("<dd>member-7</dd>"));
}

#[tokio::test]
async fn test_provider_error_body_is_rendered_as_is() {
    let server = TestServer::new().await;
    let token = server.create_session_token("revoked-token");

    Mock::given(method("GET"))
        .and(path(PROFILE_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "errorCode": 0,
            "message": "Invalid access token.",
            "status": 401
        })))
        .expect(1)
        .mount(&server.provider)
        .await;

    let response = server
        .client
        .get(server.url("/"))
        .header("Cookie", format!("session={token}"))
        .send()
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), 200);
    let body = response.text().await.expect("response body");
    assert!(body.contains("Invalid access token."));
}

#[tokio::test]
async fn test_non_json_body_is_rendered_escaped() {
    let server = TestServer::new().await;
    let token = server.create_session_token("li-access-token");

    Mock::given(method("GET"))
        .and(path(PROFILE_PATH))
        .respond_with(ResponseTemplate::new(502).set_body_string("<h1>upstream down</h1>"))
        .expect(1)
        .mount(&server.provider)
        .await;

    let response = server
        .client
        .get(server.url("/"))
        .header("Cookie", format!("session={token}"))
        .send()
        .await
        .expect("request succeeds");

    let body = response.text().await.expect("response body");
    assert!(body.contains("&lt;h1&gt;upstream down&lt;/h1&gt;"));
}

#[tokio::test]
async fn test_tampered_session_is_treated_as_signed_out() {
    let server = TestServer::new().await;
    let token = server.create_session_token("li-access-token");
    let (payload, _) = token.split_once('.').unwrap();

    Mock::given(method("GET"))
        .and(path(PROFILE_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server.provider)
        .await;

    let response = server
        .client
        .get(server.url("/"))
        .header("Cookie", format!("session={payload}.forged-signature"))
        .send()
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), 200);
    let body = response.text().await.expect("response body");
    assert!(body.contains("Sign in with LinkedIn"));
}

#[tokio::test]
async fn test_unreachable_provider_renders_without_profile() {
    // nothing listens on port 1
    let server = TestServer::with_config(|config| {
        config.linkedin.profile_url = format!("http://127.0.0.1:1{PROFILE_PATH}");
    })
    .await;
    let token = server.create_session_token("li-access-token");

    let response = server
        .client
        .get(server.url("/"))
        .header("Cookie", format!("session={token}"))
        .send()
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), 200);
    let body = response.text().await.expect("response body");
    assert!(body.contains("Sign in with LinkedIn"));
    assert!(!body.contains("class=\"raw\""));

    let metrics = server
        .client
        .get(server.url("/metrics"))
        .send()
        .await
        .expect("request succeeds")
        .text()
        .await
        .expect("metrics body");
    assert!(
        metrics.contains("linkedin_profile_profile_fetches_total{status=\"error\"}"),
        "expected a failed profile fetch to be counted, got: {metrics}"
    );
}
