use serde_json::{Map, Value};

use crate::constants::{
    COLLECTION_KEYS, KEY_DATA, KEY_PAGINATION, KEY_STATUS, KEY_SUCCESS, KEY_TOTAL, KEY_TOTAL_PAGES,
};

/// Recognized layouts of a raw response body, in matching order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseShape {
    /// `null`, a primitive, or anything else that is not an object.
    NonObject,
    /// A bare JSON array.
    ArrayBody,
    /// `{ success, data: { data, pagination, .. } }`
    TripleNested,
    /// `{ success, data, status: <number> }`
    LegacyStatus,
    /// `{ success, data }`, already canonical.
    StandardEnvelope,
    /// `{ <array_key>: [..], pagination: {..} }`
    NamedPaginated { array_key: String },
    /// `{ <array_key>: [..], total, totalPages, page, limit }`
    InlinePaginated { array_key: String },
    /// Anything else, e.g. a single record returned directly.
    PlainObject,
}

impl ResponseShape {
    pub fn classify(body: &Value) -> Self {
        let map = match body {
            Value::Array(_) => return ResponseShape::ArrayBody,
            Value::Object(map) => map,
            _ => return ResponseShape::NonObject,
        };

        if map.contains_key(KEY_SUCCESS) {
            return classify_enveloped(map);
        }

        if map.contains_key(KEY_PAGINATION) {
            return match select_array_key(map, &[KEY_PAGINATION]) {
                Some(array_key) => ResponseShape::NamedPaginated { array_key },
                None => ResponseShape::PlainObject,
            };
        }

        if map.contains_key(KEY_TOTAL) || map.contains_key(KEY_TOTAL_PAGES) {
            if let Some(array_key) = select_array_key(map, &[]) {
                return ResponseShape::InlinePaginated { array_key };
            }
        }

        ResponseShape::PlainObject
    }

    pub fn name(&self) -> &'static str {
        match self {
            ResponseShape::NonObject => "non_object",
            ResponseShape::ArrayBody => "array_body",
            ResponseShape::TripleNested => "triple_nested",
            ResponseShape::LegacyStatus => "legacy_status",
            ResponseShape::StandardEnvelope => "standard_envelope",
            ResponseShape::NamedPaginated { .. } => "named_paginated",
            ResponseShape::InlinePaginated { .. } => "inline_paginated",
            ResponseShape::PlainObject => "plain_object",
        }
    }
}

fn classify_enveloped(map: &Map<String, Value>) -> ResponseShape {
    if let Some(Value::Object(inner)) = map.get(KEY_DATA) {
        if inner.contains_key(KEY_DATA) && inner.contains_key(KEY_PAGINATION) {
            return ResponseShape::TripleNested;
        }
    }
    if map.get(KEY_STATUS).is_some_and(Value::is_number) {
        return ResponseShape::LegacyStatus;
    }
    ResponseShape::StandardEnvelope
}

/// Picks the payload array of a raw body.
///
/// With several array-valued keys, the first one named like a collection
/// wins; failing that, the first in document order.
pub(crate) fn select_array_key(map: &Map<String, Value>, exclude: &[&str]) -> Option<String> {
    let candidates: Vec<&String> = map
        .iter()
        .filter(|(key, value)| value.is_array() && !exclude.contains(&key.as_str()))
        .map(|(key, _)| key)
        .collect();

    let chosen = match candidates.as_slice() {
        [] => return None,
        [only] => *only,
        several => {
            let chosen = several
                .iter()
                .copied()
                .find(|key| COLLECTION_KEYS.contains(&key.as_str()))
                .unwrap_or(several[0]);
            tracing::debug!(
                candidates = ?several,
                chosen = %chosen,
                "Response body has several array fields"
            );
            chosen
        }
    };

    Some(chosen.clone())
}
