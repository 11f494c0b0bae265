//! Integration tests for the esign client facade and request pipeline.

mod common;

use chrono::{Duration as ChronoDuration, Utc};
use common::{APP_ID, TOKEN, client, config, mount_token, ok};
use esign::{
    Client, ClientConfig, Credential, Envelope, EsignError, RequestSpec, Resource, ResourceClient,
    StaticToken,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn static_token(token: &str) -> Arc<StaticToken> {
    Arc::new(StaticToken::new(Credential::new(
        token,
        Utc::now() + ChronoDuration::hours(2),
    )))
}

#[tokio::test]
async fn test_client_creation() {
    let client = Client::new(APP_ID, "secret").unwrap();
    assert_eq!(client.base_url(), "https://smlopenapi.esign.cn");
}

#[tokio::test]
async fn test_client_with_custom_config() {
    let mut config = ClientConfig::new(APP_ID, "secret");
    config.production = true;
    config.timeout = Some(Duration::from_secs(60));
    config.user_agent = Some("test-agent/1.0".to_string());

    let client = Client::with_config(config.clone()).unwrap();
    assert_eq!(client.base_url(), "https://openapi.esign.cn");

    config.base_url = Some("https://custom.api.com/".to_string());
    let client = Client::with_config(config).unwrap();
    assert_eq!(client.base_url(), "https://custom.api.com");
}

#[tokio::test]
async fn test_token_shared_across_resources() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/oauth2/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::token_body(
            TOKEN,
            common::FAR_FUTURE_MILLIS,
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/accounts/A1"))
        .and(header("X-Tsign-Open-Token", TOKEN))
        .respond_with(ok(json!({"accountId": "A1"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/files/D1"))
        .and(header("X-Tsign-Open-Token", TOKEN))
        .respond_with(ok(json!({"fileId": "D1"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/v1/signflows/F1/start"))
        .and(header("X-Tsign-Open-Token", TOKEN))
        .respond_with(ok(json!(null)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    client
        .account()
        .query_personal_account_by_account_id("A1")
        .await
        .unwrap();
    client.file().download_file("D1").await.unwrap();
    client.sign_flow().start_sign_flow("F1").await.unwrap();
}

#[tokio::test]
async fn test_static_token_provider() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/signflows/F1/documents"))
        .and(header("X-Tsign-Open-App-Id", APP_ID))
        .and(header("X-Tsign-Open-Token", "injected"))
        .respond_with(ok(json!({"docs": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client =
        Client::with_token_provider(config(&mock_server), static_token("injected")).unwrap();
    let docs = client.sign_flow().download_document("F1").await.unwrap();

    assert_eq!(docs.get("docs"), Some(&json!([])));
}

#[tokio::test]
async fn test_expired_static_token_is_auth_error() {
    let mock_server = MockServer::start().await;

    let expired = Arc::new(StaticToken::new(Credential::new(
        "stale",
        Utc::now() - ChronoDuration::seconds(1),
    )));
    let client = Client::with_token_provider(config(&mock_server), expired).unwrap();

    let err = client.file().download_file("D1").await.unwrap_err();
    assert!(err.is_auth_error());
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_transport_error() {
    let mut config = ClientConfig::new(APP_ID, "secret");
    config.base_url = Some("http://127.0.0.1:1".to_string());
    config.timeout = Some(Duration::from_secs(2));

    let client = Client::with_token_provider(config, static_token(TOKEN)).unwrap();
    let result = client.file().download_file("D1").await;

    match result {
        Err(e @ EsignError::Transport(_)) => assert!(e.is_retryable()),
        other => panic!("Expected Transport error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_server_error_is_retryable() {
    let mock_server = MockServer::start().await;
    mount_token(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/v1/files/D1"))
        .respond_with(ResponseTemplate::new(502).set_body_json(json!({
            "code": 502,
            "message": "upstream unavailable"
        })))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server)
        .file()
        .download_file("D1")
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(502));
    assert!(err.is_retryable());
    assert!(err.to_string().contains("upstream unavailable"));
}

#[tokio::test]
async fn test_empty_body_is_empty_result() {
    let mock_server = MockServer::start().await;
    mount_token(&mock_server).await;

    Mock::given(method("DELETE"))
        .and(path("/v1/accounts/A1"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let result = client(&mock_server)
        .account()
        .delete_personal_account_by_id("A1")
        .await
        .unwrap();

    assert!(result.is_empty());
}

#[tokio::test]
async fn test_body_without_envelope_is_returned_whole() {
    let mock_server = MockServer::start().await;
    mount_token(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/v1/files/D1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "fileId": "D1",
            "status": 2
        })))
        .mount(&mock_server)
        .await;

    let result = client(&mock_server)
        .file()
        .download_file("D1")
        .await
        .unwrap();

    assert_eq!(result.value(), Some(&json!({"fileId": "D1", "status": 2})));
}

#[tokio::test]
async fn test_invalid_json_is_decode_error() {
    let mock_server = MockServer::start().await;
    mount_token(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/v1/files/D1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server)
        .file()
        .download_file("D1")
        .await
        .unwrap_err();

    assert!(matches!(err, EsignError::Decode(_)));
}

#[tokio::test]
async fn test_debug_mode_returns_same_result() {
    let mock_server = MockServer::start().await;
    mount_token(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/v1/organizations/O1"))
        .respond_with(ok(json!({"orgId": "O1", "name": "Acme Ltd"})))
        .expect(2)
        .mount(&mock_server)
        .await;

    let quiet = client(&mock_server);
    let mut debug_config = config(&mock_server);
    debug_config.debug = true;
    let verbose = Client::with_config(debug_config).unwrap();

    let a = quiet
        .account()
        .query_organize_account_by_org_id("O1")
        .await
        .unwrap();
    let b = verbose
        .account()
        .query_organize_account_by_org_id("O1")
        .await
        .unwrap();

    assert_eq!(a, b);
}

#[tokio::test]
async fn test_custom_envelope() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/files/D1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errCode": 1,
            "msg": "ok",
            "result": {"fileId": "D1"}
        })))
        .mount(&mock_server)
        .await;

    let mut config = config(&mock_server);
    config.envelope = Envelope {
        code_field: "errCode".to_string(),
        message_field: "msg".to_string(),
        data_field: "result".to_string(),
        success_code: 1,
    };
    let client = Client::with_token_provider(config, static_token(TOKEN)).unwrap();

    let file = client.file().download_file("D1").await.unwrap();
    assert_eq!(file.get_str("fileId"), Some("D1"));
}

#[tokio::test]
async fn test_raw_request_through_access_layer() {
    let mock_server = MockServer::start().await;
    mount_token(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/v1/signflows/F1"))
        .respond_with(ok(json!({"flowId": "F1", "flowStatus": 2})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    let flow = client
        .access()
        .execute(RequestSpec::get("/v1/signflows/F1"))
        .await
        .unwrap();

    assert_eq!(flow.get("flowStatus"), Some(&json!(2)));
}

#[tokio::test]
async fn test_get_by_resource_name() {
    let client = Client::new(APP_ID, "secret").unwrap();

    let resource: Resource = "sign-flow".parse().unwrap();
    assert_eq!(resource, Resource::SignFlow);
    assert!(matches!(client.get(resource), ResourceClient::SignFlow(_)));
    assert!(matches!(
        client.get(Resource::Identity),
        ResourceClient::Identity(_)
    ));

    let err = "payments".parse::<Resource>().unwrap_err();
    assert!(matches!(err, EsignError::Validation(_)));
}

#[tokio::test]
async fn test_validation_before_network() {
    let mock_server = MockServer::start().await;
    let client = client(&mock_server);

    let err = client
        .account()
        .query_personal_account_by_account_id("  ")
        .await
        .unwrap_err();

    assert!(matches!(err, EsignError::Validation(ref msg) if msg.contains("accountId")));
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}
