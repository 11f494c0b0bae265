//! Shared helpers for the integration tests.

#![allow(dead_code)]

use esign::{Client, ClientConfig};
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const APP_ID: &str = "7438000001";
pub const SECRET: &str = "test_secret";
pub const TOKEN: &str = "test_token";

/// Far-future expiry, in epoch milliseconds.
pub const FAR_FUTURE_MILLIS: &str = "4102444800000";

pub fn config(server: &MockServer) -> ClientConfig {
    let mut config = ClientConfig::new(APP_ID, SECRET);
    config.base_url = Some(server.uri());
    config
}

pub fn client(server: &MockServer) -> Client {
    Client::with_config(config(server)).unwrap()
}

pub fn token_body(token: &str, expires_in_millis: &str) -> Value {
    json!({
        "code": 0,
        "message": "成功",
        "data": {
            "token": token,
            "expiresIn": expires_in_millis,
            "refreshToken": "refresh"
        }
    })
}

/// Mounts a token endpoint handing out [`TOKEN`] until the far future.
pub async fn mount_token(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v1/oauth2/access_token"))
        .and(query_param("appId", APP_ID))
        .and(query_param("secret", SECRET))
        .and(query_param("grantType", "client_credentials"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body(TOKEN, FAR_FUTURE_MILLIS)))
        .mount(server)
        .await;
}

/// A success envelope around `data`.
pub fn ok(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "code": 0,
        "message": "成功",
        "data": data
    }))
}
