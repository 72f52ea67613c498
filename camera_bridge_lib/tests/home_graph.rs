//! Talks to a mocked HomeGraph API over HTTP.

use std::io::Write;
use std::sync::Arc;

use camera_bridge_lib::config::HomeGraphConfig;
use camera_bridge_lib::credential::Credential;
use camera_bridge_lib::error::{HomeGraphError, RequestSyncError};
use camera_bridge_lib::home_graph::{HomeGraph, HomeGraphClient};
use camera_bridge_lib::report_state::StateReporter;
use camera_bridge_lib::request_sync::SyncRequester;
use google_home::DeviceState;
use google_home::home_graph::ReportStateRequest;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn credential() -> Credential {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{ "client_email": "bridge@example.iam.gserviceaccount.com", "token": "secret-token" }}"#
    )
    .unwrap();

    Credential::load(file.path()).unwrap()
}

fn client(server: &MockServer) -> HomeGraphClient {
    let config = HomeGraphConfig {
        url: server.uri(),
        ..Default::default()
    };

    HomeGraphClient::new(&config, credential()).unwrap()
}

#[tokio::test]
async fn report_state() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/devices:reportStateAndNotification"))
        .and(header("authorization", "Bearer secret-token"))
        .and(body_json(json!({
            "requestId": "ff36a3cc",
            "agentUserId": "123",
            "payload": { "devices": { "states": { "1": { "on": true } } } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "requestId": "ff36a3cc" })))
        .expect(1)
        .mount(&server)
        .await;

    let mut request = ReportStateRequest::new("ff36a3cc", "123");
    request.add_state("1", DeviceState::new(true));

    client(&server).report_state(&request).await.unwrap();
}

#[tokio::test]
async fn report_state_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/devices:reportStateAndNotification"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Permission denied"))
        .mount(&server)
        .await;

    let request = ReportStateRequest::new("ff36a3cc", "123");
    let err = client(&server).report_state(&request).await.unwrap_err();

    match err {
        HomeGraphError::Status { status, body, .. } => {
            assert_eq!(status.as_u16(), 403);
            assert_eq!(body, "Permission denied");
        }
        err => panic!("Unexpected error: {err}"),
    }
}

#[tokio::test]
async fn reporter_sends_state_changes() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/devices:reportStateAndNotification"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let reporter = StateReporter::new("123", Some(Arc::new(client(&server))));
    reporter.report("1", DeviceState::new(false)).await;

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = requests[0].body_json().unwrap();
    assert_eq!(body["agentUserId"], "123");
    assert_eq!(body["payload"]["devices"]["states"]["1"], json!({ "on": false }));
}

#[tokio::test]
async fn reporter_survives_upstream_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let reporter = StateReporter::new("123", Some(Arc::new(client(&server))));

    // Errors are only logged
    reporter.report("1", DeviceState::new(true)).await;
}

#[tokio::test]
async fn request_sync() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/devices:requestSync"))
        .and(header("authorization", "Bearer secret-token"))
        .and(body_json(json!({ "agentUserId": "123" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let requester = SyncRequester::new("123", Some(Arc::new(client(&server))));

    assert_eq!(requester.request_sync().await.unwrap(), json!({}));
}

#[tokio::test]
async fn request_sync_empty_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/devices:requestSync"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let requester = SyncRequester::new("123", Some(Arc::new(client(&server))));

    assert_eq!(requester.request_sync().await.unwrap(), json!({}));
}

#[tokio::test]
async fn request_sync_upstream_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/devices:requestSync"))
        .respond_with(
            ResponseTemplate::new(404).set_body_string("Requested entity was not found."),
        )
        .mount(&server)
        .await;

    let requester = SyncRequester::new("123", Some(Arc::new(client(&server))));
    let err = requester.request_sync().await.unwrap_err();

    assert!(matches!(err, RequestSyncError::Upstream(_)));
    assert!(err.to_string().starts_with("Error requesting sync: "));
    assert!(err.to_string().contains("Requested entity was not found."));
}
