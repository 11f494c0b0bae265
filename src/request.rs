//! Request description shared by every resource client.
//!
//! A [`RequestSpec`] is built fresh for each call and handed to the
//! [`AccessLayer`](crate::access::AccessLayer). Params are run through
//! [`compact`] on the way in, so a `null` never reaches the wire: the
//! provider treats an omitted field as "leave unchanged" and an empty string
//! as "clear it".

use crate::error::{EsignError, Result, require};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use reqwest::Method;
use serde::Serialize;
use serde_json::{Map, Value};

/// Keys whose values are masked in debug logs.
const SENSITIVE_KEYS: &[&str] = &[
    "secret",
    "password",
    "idNumber",
    "orgLegalIdNumber",
    "mobile",
    "email",
    "data",
];

/// Characters escaped inside a single path segment.
const PATH_SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// One call against the provider's API.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    /// HTTP verb.
    pub method: Method,
    /// Path relative to the base URL, identifiers already interpolated.
    pub path: String,
    /// Query pairs fixed by the endpoint, such as a third-party id.
    pub query: Vec<(String, String)>,
    /// Compacted params: query string for GET/DELETE, JSON body otherwise.
    pub params: Option<Value>,
}

impl RequestSpec {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            params: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Appends a fixed query pair.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Serializes and compacts the params.
    pub fn params<P: Serialize>(mut self, params: &P) -> Result<Self> {
        let value = serde_json::to_value(params)
            .map_err(|e| EsignError::Validation(format!("unserializable params: {}", e)))?;
        self.params = Some(compact(value));
        Ok(self)
    }

    /// True when params travel in the query string.
    pub fn params_in_query(&self) -> bool {
        self.method == Method::GET || self.method == Method::DELETE
    }

    /// All query pairs in order: fixed pairs first, then params for
    /// GET/DELETE in insertion order.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = self.query.clone();
        if self.params_in_query() {
            if let Some(Value::Object(map)) = &self.params {
                pairs.extend(map.iter().map(|(k, v)| (k.clone(), query_value(v))));
            }
        }
        pairs
    }

    /// JSON body for POST/PUT.
    pub fn body(&self) -> Option<&Value> {
        if self.params_in_query() {
            None
        } else {
            self.params.as_ref()
        }
    }
}

/// Percent-encodes an identifier for use as one path segment.
///
/// Blank values and the dot segments `.` and `..` are rejected, since the
/// URL parser would collapse them into a different path.
pub(crate) fn path_segment(field: &str, value: &str) -> Result<String> {
    require(field, value)?;
    if value == "." || value == ".." {
        return Err(EsignError::Validation(format!(
            "{} is not a valid path segment: {}",
            field, value
        )));
    }
    Ok(utf8_percent_encode(value, PATH_SEGMENT_ENCODE_SET).to_string())
}

/// Removes `null` values at every nesting level of objects and arrays.
///
/// Empty strings, zeros, `false` and empty containers are kept.
pub fn compact(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, compact(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .filter(|v| !v.is_null())
                .map(compact)
                .collect(),
        ),
        other => other,
    }
}

fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Copy of `value` with sensitive fields masked, for logging.
pub(crate) fn redact(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), redact_entry(k, v)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(redact).collect()),
        other => other.clone(),
    }
}

fn redact_entry(key: &str, value: &Value) -> Value {
    if SENSITIVE_KEYS.contains(&key) {
        Value::String("***".to_string())
    } else {
        redact(value)
    }
}

/// Response body prepared for logging.
///
/// The envelope's `data_field` is kept and masked inside; other sensitive
/// fields are masked whole. Bodies that are not JSON are logged as sent.
pub(crate) fn redact_response(body: &str, data_field: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => {
            let masked: Map<String, Value> = map
                .iter()
                .map(|(k, v)| {
                    if k == data_field {
                        (k.clone(), redact(v))
                    } else {
                        (k.clone(), redact_entry(k, v))
                    }
                })
                .collect();
            Value::Object(masked).to_string()
        }
        Ok(other) => redact(&other).to_string(),
        Err(_) => body.to_string(),
    }
}
