// Response normalization.
//
// Every successful body becomes `{ success, data, message?, pagination? }`
// plus whatever other top-level keys the backend sent. Error bodies only
// get their gaps filled.

pub mod shape;

pub use shape::ResponseShape;

use serde_json::{Map, Value};

use crate::constants::{
    KEY_DATA, KEY_ERROR, KEY_LIMIT, KEY_MESSAGE, KEY_PAGE, KEY_PAGINATION, KEY_STATUS,
    KEY_SUCCESS, KEY_TOTAL, KEY_TOTAL_PAGES,
};
use crate::envelope::ErrorBody;

/// Normalizes the body of a successful response. Never fails; bodies that
/// are not objects or arrays come back untouched.
pub fn normalize_success(body: Value) -> Value {
    let shape = ResponseShape::classify(&body);
    tracing::trace!(shape = shape.name(), "Normalizing response body");

    match (shape, body) {
        (ResponseShape::ArrayBody, items @ Value::Array(_)) => wrap(items),
        (ResponseShape::TripleNested, Value::Object(map)) => unwrap_triple_nested(map),
        (ResponseShape::LegacyStatus, Value::Object(map)) => strip_legacy_status(map),
        (ResponseShape::StandardEnvelope, Value::Object(map)) => standard(map),
        (ResponseShape::NamedPaginated { array_key }, Value::Object(map)) => {
            named_paginated(map, &array_key)
        }
        (ResponseShape::InlinePaginated { array_key }, Value::Object(map)) => {
            inline_paginated(map, &array_key)
        }
        (ResponseShape::PlainObject, body @ Value::Object(_)) => wrap(body),
        (_, body) => body,
    }
}

/// Fills the gaps of an error body in place: `message` from `error`,
/// `data: null`, `success: false`. Present fields are never overwritten.
/// Non-object bodies are left alone.
pub fn normalize_error(body: &mut Value) {
    let Value::Object(map) = body else {
        return;
    };

    if is_missing(map, KEY_MESSAGE) {
        if let Some(error) = map.get(KEY_ERROR).filter(|error| !error.is_null()).cloned() {
            map.insert(KEY_MESSAGE.to_string(), error);
        }
    }
    if !map.contains_key(KEY_DATA) {
        map.insert(KEY_DATA.to_string(), Value::Null);
    }
    if !map.contains_key(KEY_SUCCESS) {
        map.insert(KEY_SUCCESS.to_string(), Value::Bool(false));
    }
}

/// Turns the raw text of a failed response into an error body.
///
/// JSON objects come back as sent, for `normalize_error` to fill. Anything
/// else is wrapped into `{ success: false, data, message }`, with `reason`
/// (usually the HTTP reason phrase) as the fallback message.
pub fn error_body_from_text(text: &str, reason: &str) -> Value {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return ErrorBody::synthesized(reason, Value::Null).into_value();
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(body @ Value::Object(_)) => body,
        Ok(other) => ErrorBody::synthesized(reason, other).into_value(),
        Err(_) => {
            let first_line = trimmed.lines().next().unwrap_or(trimmed);
            ErrorBody::synthesized(compact_message(first_line), Value::Null).into_value()
        }
    }
}

fn wrap(data: Value) -> Value {
    let mut out = Map::new();
    out.insert(KEY_SUCCESS.to_string(), Value::Bool(true));
    out.insert(KEY_DATA.to_string(), data);
    Value::Object(out)
}

fn unwrap_triple_nested(mut map: Map<String, Value>) -> Value {
    let mut inner = match map.shift_remove(KEY_DATA) {
        Some(Value::Object(inner)) => inner,
        other => {
            map.insert(KEY_DATA.to_string(), other.unwrap_or(Value::Null));
            return standard(map);
        }
    };

    let mut out = Map::new();
    out.insert(KEY_SUCCESS.to_string(), success_of(&map));
    out.insert(
        KEY_DATA.to_string(),
        inner.shift_remove(KEY_DATA).unwrap_or(Value::Null),
    );
    out.insert(
        KEY_PAGINATION.to_string(),
        inner.shift_remove(KEY_PAGINATION).unwrap_or(Value::Null),
    );
    out.extend(inner);
    if let Some(message) = map.shift_remove(KEY_MESSAGE).filter(|m| !m.is_null()) {
        out.insert(KEY_MESSAGE.to_string(), message);
    }

    ensure_boolean_success(&mut out);
    Value::Object(out)
}

fn strip_legacy_status(mut map: Map<String, Value>) -> Value {
    map.shift_remove(KEY_STATUS);
    standard(map)
}

fn standard(mut map: Map<String, Value>) -> Value {
    if !map.contains_key(KEY_DATA) {
        map.insert(KEY_DATA.to_string(), Value::Null);
    }
    ensure_boolean_success(&mut map);
    Value::Object(map)
}

fn named_paginated(mut map: Map<String, Value>, array_key: &str) -> Value {
    let data = map.shift_remove(array_key).unwrap_or(Value::Null);
    let pagination = map.shift_remove(KEY_PAGINATION).unwrap_or(Value::Null);

    let mut out = Map::new();
    out.insert(KEY_SUCCESS.to_string(), Value::Bool(true));
    out.insert(KEY_DATA.to_string(), data);
    out.insert(KEY_PAGINATION.to_string(), pagination);
    out.extend(map);
    Value::Object(out)
}

fn inline_paginated(mut map: Map<String, Value>, array_key: &str) -> Value {
    let data = map.shift_remove(array_key).unwrap_or(Value::Null);
    let len = Value::from(data.as_array().map_or(0, Vec::len));

    let mut take_or = |key: &str, fallback: Value| {
        map.shift_remove(key)
            .filter(|value| !value.is_null())
            .unwrap_or(fallback)
    };
    let page = take_or(KEY_PAGE, Value::from(1));
    let limit = take_or(KEY_LIMIT, len.clone());
    let total = take_or(KEY_TOTAL, len);
    let total_pages = take_or(KEY_TOTAL_PAGES, Value::from(1));

    let mut pagination = Map::new();
    pagination.insert(KEY_PAGE.to_string(), page);
    pagination.insert(KEY_LIMIT.to_string(), limit);
    pagination.insert(KEY_TOTAL.to_string(), total);
    pagination.insert(KEY_TOTAL_PAGES.to_string(), total_pages);

    let mut out = Map::new();
    out.insert(KEY_SUCCESS.to_string(), Value::Bool(true));
    out.insert(KEY_DATA.to_string(), data);
    out.insert(KEY_PAGINATION.to_string(), Value::Object(pagination));
    out.extend(map);
    Value::Object(out)
}

fn success_of(map: &Map<String, Value>) -> Value {
    map.get(KEY_SUCCESS).cloned().unwrap_or(Value::Bool(true))
}

// `success` must end up a boolean; anything else is read by truthiness.
fn ensure_boolean_success(map: &mut Map<String, Value>) {
    let truthy = match map.get(KEY_SUCCESS) {
        Some(Value::Bool(_)) => return,
        None => true,
        Some(Value::Null) => false,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    };
    map.insert(KEY_SUCCESS.to_string(), Value::Bool(truthy));
}

fn is_missing(map: &Map<String, Value>, key: &str) -> bool {
    map.get(key).map_or(true, Value::is_null)
}

fn compact_message(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
