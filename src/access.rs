//! Shared request pipeline.
//!
//! Every resource client funnels its calls through [`AccessLayer::execute`],
//! which attaches the credential, serializes params, sends the request once
//! and turns the response into an [`ApiResult`] or a typed [`EsignError`].

use crate::config::{ClientConfig, Envelope, envelope_code};
use crate::error::{EsignError, Result};
use crate::request::{RequestSpec, redact, redact_response};
use crate::token::AccessTokenProvider;
use crate::types::ApiResult;
use reqwest::{Client as HttpClient, header};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Header carrying the application id.
pub const APP_ID_HEADER: &str = "X-Tsign-Open-App-Id";
/// Header carrying the access token.
pub const TOKEN_HEADER: &str = "X-Tsign-Open-Token";

/// Builds, sends and parses authenticated API requests.
pub struct AccessLayer {
    http: HttpClient,
    base_url: String,
    app_id: String,
    envelope: Envelope,
    debug: bool,
    tokens: Arc<dyn AccessTokenProvider>,
}

impl AccessLayer {
    pub fn new(
        config: &ClientConfig,
        http: HttpClient,
        tokens: Arc<dyn AccessTokenProvider>,
    ) -> Self {
        Self {
            http,
            base_url: config.resolved_base_url().to_string(),
            app_id: config.app_id.clone(),
            envelope: config.envelope.clone(),
            debug: config.debug,
            tokens,
        }
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends `spec` and parses the response.
    ///
    /// Non-2xx statuses become [`EsignError::Http`]; a failure envelope
    /// becomes [`EsignError::Business`] even on HTTP 200. Nothing is retried.
    pub async fn execute(&self, spec: RequestSpec) -> Result<ApiResult> {
        let credential = self.tokens.access_token().await?;
        let url = format!("{}{}", self.base_url, spec.path);

        let mut request = self
            .http
            .request(spec.method.clone(), &url)
            .header(APP_ID_HEADER, &self.app_id)
            .header(TOKEN_HEADER, &credential.token)
            .header(header::CONTENT_TYPE, "application/json");

        let query = spec.query_pairs();
        if !query.is_empty() {
            request = request.query(&query);
        }
        if let Some(body) = spec.body() {
            request = request.json(body);
        }

        let started = Instant::now();
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                if self.debug {
                    let params = logged_params(&spec);
                    debug!(
                        method = %spec.method,
                        path = %spec.path,
                        params = %params,
                        elapsed_ms = elapsed_millis(started),
                        error = %e,
                        "esign request failed"
                    );
                }
                return Err(e.into());
            }
        };
        let status = response.status();
        let text = response.text().await?;

        if self.debug {
            let params = logged_params(&spec);
            let response_body = redact_response(&text, &self.envelope.data_field);
            debug!(
                method = %spec.method,
                path = %spec.path,
                params = %params,
                status = status.as_u16(),
                elapsed_ms = elapsed_millis(started),
                response = %response_body,
                "esign request"
            );
        }

        if !status.is_success() {
            return Err(self.http_error(status, text));
        }

        self.parse_body(text)
    }

    fn http_error(&self, status: reqwest::StatusCode, body: String) -> EsignError {
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| {
                v.get(&self.envelope.message_field)
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            });

        EsignError::Http {
            status_code: status.as_u16(),
            message,
            body,
        }
    }

    fn parse_body(&self, body: String) -> Result<ApiResult> {
        if body.trim().is_empty() {
            return Ok(ApiResult::empty());
        }

        let mut value: Value =
            serde_json::from_str(&body).map_err(|e| EsignError::Decode(e.to_string()))?;

        let Some(code) = value.get(&self.envelope.code_field) else {
            return Ok(ApiResult::new(value));
        };

        let code = envelope_code(code)
            .ok_or_else(|| EsignError::Decode(format!("unrecognised envelope code: {}", code)))?;

        if code != self.envelope.success_code {
            let message = value
                .get(&self.envelope.message_field)
                .and_then(Value::as_str)
                .unwrap_or("Unknown error")
                .to_string();
            return Err(EsignError::Business {
                code,
                message,
                body,
            });
        }

        let data = value
            .get_mut(&self.envelope.data_field)
            .map(Value::take)
            .unwrap_or(Value::Null);
        Ok(ApiResult::new(data))
    }
}

fn elapsed_millis(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

fn logged_params(spec: &RequestSpec) -> String {
    spec.params
        .as_ref()
        .map(|params| redact(params).to_string())
        .unwrap_or_default()
}
