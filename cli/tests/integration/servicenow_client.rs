//! Integration tests for the ServiceNow adapter against a mock server.

#![allow(clippy::expect_used)]

use std::time::Duration;

use cfdeploy_cli::application::ports::ChangeManagement;
use cfdeploy_cli::domain::ChangeRequest;
use cfdeploy_cli::domain::config::ServiceNowConfig;
use cfdeploy_cli::infra::servicenow::ServiceNowClient;
use serde_json::json;
use wiremock::matchers::{bearer_token, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(url: &str) -> ServiceNowClient {
    ServiceNowClient::new(
        ServiceNowConfig {
            url: url.to_string(),
            token: "sn-token".to_string(),
        },
        Duration::from_secs(5),
    )
    .expect("client")
}

fn request() -> ChangeRequest {
    ChangeRequest {
        short_description: "Deploy ci-helloworld-v2".to_string(),
        description: "Release ci-helloworld-v2".to_string(),
        reason: "Continuous Deployment".to_string(),
        start_date: "2024-03-01 22:30:00".to_string(),
        end_date: "2024-03-01 23:30:00".to_string(),
    }
}

#[tokio::test]
async fn test_create_change_returns_record_number() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/now/table/change_request"))
        .and(bearer_token("sn-token"))
        .and(body_partial_json(json!({
            "short_description": "Deploy ci-helloworld-v2",
            "reason": "Continuous Deployment",
            "start_date": "2024-03-01 22:30:00"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "result": { "number": "CHG0030001", "sys_id": "abc" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let number = client(&server.uri())
        .create_change(&request())
        .await
        .expect("created");

    assert_eq!(number, "CHG0030001");
}

#[tokio::test]
async fn test_create_change_server_error_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/now/table/change_request"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client(&server.uri())
        .create_change(&request())
        .await
        .expect_err("500");

    assert!(err.to_string().contains("500"), "got: {err}");
}
