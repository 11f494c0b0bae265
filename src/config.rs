//! Client configuration.
//!
//! A [`ClientConfig`] is built once by the host, handed to
//! [`Client::with_config`](crate::Client::with_config) and never mutated
//! afterwards.

use crate::error::{EsignError, Result};
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;

/// Production API host.
pub const PRODUCTION_BASE_URL: &str = "https://openapi.esign.cn";
/// Sandbox API host.
pub const SANDBOX_BASE_URL: &str = "https://smlopenapi.esign.cn";

pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration options for the client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Application id issued by the provider.
    pub app_id: String,
    /// Application secret issued by the provider.
    pub secret: String,
    /// Use the production host instead of the sandbox.
    pub production: bool,
    /// Log every request and response at debug level.
    pub debug: bool,
    /// Logging settings for the host's subscriber.
    pub log: LogConfig,
    /// Overrides the environment host (default: derived from `production`).
    pub base_url: Option<String>,
    /// Request timeout (default: 30 seconds).
    pub timeout: Option<Duration>,
    /// User-Agent header value.
    pub user_agent: Option<String>,
    /// Response envelope layout.
    pub envelope: Envelope,
}

/// Logging settings.
///
/// The SDK only emits `tracing` events; installing a subscriber that honours
/// these settings is left to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Log level name (default: "debug").
    pub level: String,
    /// Log file path, used when debug logging is on.
    pub file: Option<PathBuf>,
    /// Unix permission bits for the log file (default: 0o777).
    pub permission: u32,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "debug".to_string(),
            file: None,
            permission: 0o777,
        }
    }
}

/// Field layout of the provider's response envelope.
///
/// A body carrying `code_field` is an envelope: `success_code` means the
/// payload under `data_field` is the result, anything else is a business
/// failure described by `message_field`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub code_field: String,
    pub message_field: String,
    pub data_field: String,
    pub success_code: i64,
}

impl Default for Envelope {
    fn default() -> Self {
        Self {
            code_field: "code".to_string(),
            message_field: "message".to_string(),
            data_field: "data".to_string(),
            success_code: 0,
        }
    }
}

/// Reads an envelope code sent either as an integer or as a numeric string.
pub(crate) fn envelope_code(code: &Value) -> Option<i64> {
    match code {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

impl ClientConfig {
    /// Sandbox configuration with default settings.
    pub fn new(app_id: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            secret: secret.into(),
            production: false,
            debug: false,
            log: LogConfig::default(),
            base_url: None,
            timeout: None,
            user_agent: None,
            envelope: Envelope::default(),
        }
    }

    /// Load configuration from `ESIGN_*` environment variables.
    ///
    /// `ESIGN_APP_ID` and `ESIGN_SECRET` are required. `ESIGN_PRODUCTION`,
    /// `ESIGN_DEBUG`, `ESIGN_LOG_LEVEL` and `ESIGN_LOG_FILE` are optional.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| EsignError::Config(format!("{} is not set", key)))
        };
        let flag = |key: &str| match lookup(key) {
            Some(v) => parse_bool(key, &v),
            None => Ok(false),
        };

        let mut config = Self::new(required("ESIGN_APP_ID")?, required("ESIGN_SECRET")?);
        config.production = flag("ESIGN_PRODUCTION")?;
        config.debug = flag("ESIGN_DEBUG")?;
        if let Some(level) = lookup("ESIGN_LOG_LEVEL") {
            config.log.level = level;
        }
        config.log.file = lookup("ESIGN_LOG_FILE").map(PathBuf::from);
        Ok(config)
    }

    /// Base URL requests are sent to.
    pub fn resolved_base_url(&self) -> &str {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/'),
            None if self.production => PRODUCTION_BASE_URL,
            None => SANDBOX_BASE_URL,
        }
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(EsignError::Config(format!(
            "{} must be a boolean, got {:?}",
            key, other
        ))),
    }
}
