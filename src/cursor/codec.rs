//! Cursor codec
//!
//! A cursor is the JSON object of the active sort-key values of one node,
//! keys in `orderBy` order, e.g. `{"Age":85,"ID":15}`.

use crate::error::{Error, Result};
use crate::pagination::{cursor_fn, LazyEdge};
use crate::types::{order_fields, JsonObject, JsonValue, Order};
use serde::Serialize;
use std::sync::Arc;

/// Ordered map from sort-key field to its scalar value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CursorValues(JsonObject);

impl CursorValues {
    /// Create an empty value map
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value, keeping insertion order
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<JsonValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Get the value of a key
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.0.get(key)
    }

    /// Keys in order
    pub fn keys(&self) -> Vec<String> {
        self.0.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the underlying JSON object
    pub fn into_inner(self) -> JsonObject {
        self.0
    }

    /// Extract the values of `keys` from a serializable node
    pub fn from_node<T: Serialize>(node: &T, keys: &[&str]) -> Result<Self> {
        let JsonValue::Object(mut object) = serde_json::to_value(node)? else {
            return Err(Error::invalid_cursor(
                "node does not serialize to a JSON object",
            ));
        };

        let mut values = Self::new();
        for key in keys {
            let value = object.remove(*key).ok_or_else(|| Error::missing_key(*key))?;
            values.insert(*key, value);
        }
        Ok(values)
    }
}

impl From<JsonObject> for CursorValues {
    fn from(object: JsonObject) -> Self {
        Self(object)
    }
}

/// Encode a value map into its cursor string
pub fn encode_cursor(values: &CursorValues) -> Result<String> {
    Ok(serde_json::to_string(&values.0)?)
}

/// Decode a cursor whose key set must equal `expected_keys` exactly
///
/// The returned map is reordered to `expected_keys`.
pub fn decode_cursor(cursor: &str, expected_keys: &[&str]) -> Result<CursorValues> {
    let value: JsonValue = serde_json::from_str(cursor)
        .map_err(|e| Error::invalid_cursor(format!("malformed cursor: {e}")))?;
    let JsonValue::Object(mut object) = value else {
        return Err(Error::invalid_cursor("cursor is not a JSON object"));
    };

    let key_mismatch = object.len() != expected_keys.len()
        || expected_keys.iter().any(|key| !object.contains_key(*key));
    if key_mismatch {
        return Err(Error::CursorKeyMismatch {
            expected: expected_keys.iter().map(|k| (*k).to_string()).collect(),
            actual: object.keys().cloned().collect(),
        });
    }

    let mut values = CursorValues::new();
    for key in expected_keys {
        let value = object.remove(*key).ok_or_else(|| Error::missing_key(*key))?;
        if value.is_object() || value.is_array() {
            return Err(Error::invalid_cursor(format!(
                "cursor value for '{key}' is not a scalar"
            )));
        }
        values.insert(*key, value);
    }
    Ok(values)
}

/// Build a lazy edge whose cursor encodes the node's `order_by` values
///
/// Values are extracted now; encoding is deferred until the cursor is needed.
pub fn lazy_edge<T: Serialize>(node: T, order_by: &[Order]) -> Result<LazyEdge<T>> {
    let values = Arc::new(CursorValues::from_node(&node, &order_fields(order_by))?);
    Ok(LazyEdge::new(
        node,
        cursor_fn(move |_ctx| {
            let values = values.clone();
            async move { encode_cursor(&values) }
        }),
    ))
}
