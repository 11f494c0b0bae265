//! Access token exchange and caching.
//!
//! [`TokenProvider`] trades the app id and secret for a short-lived token
//! and keeps it until it expires. The access layer only sees the
//! [`AccessTokenProvider`] trait, so hosts that manage tokens themselves can
//! plug in [`StaticToken`] or their own implementation.

use crate::config::{ClientConfig, Envelope, envelope_code};
use crate::error::{EsignError, Result};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, warn};

const ACCESS_TOKEN_PATH: &str = "/v1/oauth2/access_token";
const GRANT_TYPE: &str = "client_credentials";

/// An access token and the instant it stops being valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl Credential {
    pub fn new(token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            expires_at,
        }
    }

    /// True once `now` has reached the expiry.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// Source of the credential attached to every API call.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Returns a credential that has not expired.
    async fn access_token(&self) -> Result<Credential>;
}

/// Exchanges app id and secret for a token, caching it until expiry.
///
/// The cache check and the exchange run under one lock, so concurrent
/// callers wait for a single exchange instead of racing their own.
pub struct TokenProvider {
    http: HttpClient,
    base_url: String,
    app_id: String,
    secret: String,
    envelope: Envelope,
    cached: Mutex<Option<Credential>>,
}

impl TokenProvider {
    pub fn new(config: &ClientConfig, http: HttpClient) -> Self {
        Self {
            http,
            base_url: config.resolved_base_url().to_string(),
            app_id: config.app_id.clone(),
            secret: config.secret.clone(),
            envelope: config.envelope.clone(),
            cached: Mutex::new(None),
        }
    }

    /// Returns the cached credential, exchanging for a new one first when
    /// none is cached or the cached one has expired.
    ///
    /// A failed exchange leaves the previous cache entry in place.
    pub async fn get_token(&self) -> Result<Credential> {
        let mut cached = self.cached.lock().await;

        if let Some(credential) = cached.as_ref() {
            if !credential.is_expired() {
                return Ok(credential.clone());
            }
        }

        let credential = self
            .exchange()
            .await
            .and_then(|credential| {
                if credential.is_expired() {
                    return Err(EsignError::Auth(
                        "token endpoint returned an expired token".to_string(),
                    ));
                }
                Ok(credential)
            })
            .inspect_err(|e| {
                warn!(app_id = %self.app_id, error = %e, "Access token exchange failed");
            })?;
        debug!(
            app_id = %self.app_id,
            expires_at = %credential.expires_at,
            "Obtained access token"
        );

        *cached = Some(credential.clone());
        Ok(credential)
    }

    async fn exchange(&self) -> Result<Credential> {
        let url = format!("{}{}", self.base_url, ACCESS_TOKEN_PATH);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("appId", self.app_id.as_str()),
                ("secret", self.secret.as_str()),
                ("grantType", GRANT_TYPE),
            ])
            .send()
            .await
            .map_err(|e| EsignError::Auth(format!("token endpoint unreachable: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| EsignError::Auth(format!("failed to read token response: {}", e)))?;

        if !status.is_success() {
            return Err(EsignError::Auth(format!(
                "token endpoint returned {}: {}",
                status.as_u16(),
                body
            )));
        }

        parse_credential(&body, &self.envelope)
    }
}

#[async_trait]
impl AccessTokenProvider for TokenProvider {
    async fn access_token(&self) -> Result<Credential> {
        self.get_token().await
    }
}

/// A fixed credential, for hosts that obtain tokens elsewhere.
#[derive(Debug, Clone)]
pub struct StaticToken(Credential);

impl StaticToken {
    pub fn new(credential: Credential) -> Self {
        Self(credential)
    }
}

#[async_trait]
impl AccessTokenProvider for StaticToken {
    async fn access_token(&self) -> Result<Credential> {
        if self.0.is_expired() {
            return Err(EsignError::Auth("static access token has expired".to_string()));
        }
        Ok(self.0.clone())
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenData {
    token: String,
    expires_in: Value,
}

fn parse_credential(body: &str, envelope: &Envelope) -> Result<Credential> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| EsignError::Auth(format!("malformed token response: {}", e)))?;

    let code = match value.get(&envelope.code_field) {
        Some(raw) => envelope_code(raw).ok_or_else(|| {
            EsignError::Auth(format!("unrecognised token response code: {}", raw))
        })?,
        None => envelope.success_code,
    };
    if code != envelope.success_code {
        let message = value
            .get(&envelope.message_field)
            .and_then(Value::as_str)
            .unwrap_or("token exchange rejected");
        return Err(EsignError::Auth(format!("[{}] {}", code, message)));
    }

    let data = value
        .get(&envelope.data_field)
        .cloned()
        .ok_or_else(|| EsignError::Auth("token response has no data".to_string()))?;
    let data: TokenData = serde_json::from_value(data)
        .map_err(|e| EsignError::Auth(format!("malformed token data: {}", e)))?;

    let millis = match &data.expires_in {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
    .ok_or_else(|| EsignError::Auth(format!("invalid expiresIn: {}", data.expires_in)))?;
    let expires_at = Utc
        .timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| EsignError::Auth(format!("expiresIn out of range: {}", millis)))?;

    Ok(Credential::new(data.token, expires_at))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_credential_expiry_boundary() {
        let now = Utc::now();
        let credential = Credential::new("t", now);
        assert!(credential.is_expired_at(now));
        assert!(!credential.is_expired_at(now - Duration::seconds(1)));
    }

    #[test]
    fn test_parse_credential_string_millis() {
        let body = r#"{"code":0,"message":"成功","data":{"token":"abc","expiresIn":"4102444800000","refreshToken":"r"}}"#;
        let credential = parse_credential(body, &Envelope::default()).unwrap();
        assert_eq!(credential.token, "abc");
        assert_eq!(credential.expires_at.timestamp(), 4_102_444_800);
    }

    #[test]
    fn test_parse_credential_numeric_millis() {
        let body = r#"{"code":0,"data":{"token":"abc","expiresIn":1000}}"#;
        let credential = parse_credential(body, &Envelope::default()).unwrap();
        assert!(credential.is_expired());
    }

    #[test]
    fn test_parse_credential_rejected() {
        let body = r#"{"code":401,"message":"invalid appId"}"#;
        let err = parse_credential(body, &Envelope::default()).unwrap_err();
        assert!(matches!(err, EsignError::Auth(msg) if msg.contains("invalid appId")));
    }

    #[test]
    fn test_parse_credential_string_coded_rejection() {
        let body = r#"{"code":"401","message":"appId or secret invalid"}"#;
        let err = parse_credential(body, &Envelope::default()).unwrap_err();
        assert!(matches!(err, EsignError::Auth(msg) if msg.contains("appId or secret invalid")));

        let body = r#"{"code":"0","data":{"token":"abc","expiresIn":"4102444800000"}}"#;
        assert_eq!(parse_credential(body, &Envelope::default()).unwrap().token, "abc");
    }

    #[test]
    fn test_parse_credential_bad_expiry() {
        let body = r#"{"code":0,"data":{"token":"abc","expiresIn":"soon"}}"#;
        assert!(matches!(
            parse_credential(body, &Envelope::default()),
            Err(EsignError::Auth(_))
        ));
    }

    #[test]
    fn test_static_token() {
        let fresh = StaticToken::new(Credential::new("t", Utc::now() + Duration::hours(1)));
        let credential = tokio_test::block_on(fresh.access_token()).unwrap();
        assert_eq!(credential.token, "t");

        let stale = StaticToken::new(Credential::new("t", Utc::now() - Duration::hours(1)));
        assert!(matches!(
            tokio_test::block_on(stale.access_token()),
            Err(EsignError::Auth(_))
        ));
    }
}
