// Typed views over normalized response bodies.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Canonical success envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    /// Any other top-level keys the backend sent.
    #[serde(flatten)]
    pub meta: Map<String, Value>,
}

impl<T> Envelope<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
            pagination: None,
            meta: Map::new(),
        }
    }

    pub fn message_text(&self) -> Option<String> {
        self.message.as_ref().and_then(message_value_text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(deserialize_with = "lenient_u64")]
    pub page: u64,
    #[serde(deserialize_with = "lenient_u64")]
    pub limit: u64,
    #[serde(deserialize_with = "lenient_u64")]
    pub total: u64,
    #[serde(rename = "totalPages", deserialize_with = "lenient_u64")]
    pub total_pages: u64,
}

impl Pagination {
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// Normalized body of a failed response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub success: bool,
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
    #[serde(flatten)]
    pub meta: Map<String, Value>,
}

impl ErrorBody {
    /// Body the transport builds when the server answered without an object.
    pub fn synthesized(message: impl Into<String>, data: Value) -> Self {
        Self {
            success: false,
            data,
            message: Some(Value::String(message.into())),
            error: None,
            meta: Map::new(),
        }
    }

    pub fn message_text(&self) -> Option<String> {
        self.message.as_ref().and_then(message_value_text)
    }

    /// Reads the display message straight from a raw or normalized body.
    pub fn message_of(body: &Value) -> Option<String> {
        body.get("message")
            .and_then(message_value_text)
            .or_else(|| body.get("error").and_then(message_value_text))
    }

    pub fn into_value(self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

// Strings as-is, nested `{ code, message }` objects by their message, anything
// else as compact JSON.
fn message_value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Object(map) => match map.get("message") {
            Some(Value::String(text)) => Some(text.clone()),
            _ => Some(value.to_string()),
        },
        other => Some(other.to_string()),
    }
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    value_to_u64(&value).ok_or_else(|| {
        serde::de::Error::custom(format!("expected a non-negative number, got {}", value))
    })
}

fn value_to_u64(value: &Value) -> Option<u64> {
    if let Some(raw) = value.as_u64() {
        return Some(raw);
    }
    if let Some(raw) = value.as_f64() {
        if raw.is_finite() && raw >= 0.0 {
            return Some(raw.round() as u64);
        }
    }
    if let Some(raw) = value.as_str() {
        let raw = raw.trim();
        if let Ok(parsed) = raw.parse::<u64>() {
            return Some(parsed);
        }
        if let Ok(parsed) = raw.parse::<f64>() {
            if parsed.is_finite() && parsed >= 0.0 {
                return Some(parsed.round() as u64);
            }
        }
    }
    None
}
