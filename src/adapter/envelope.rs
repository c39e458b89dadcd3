//! Tolerant decoding of upstream JSON listings.
//!
//! The backend answers list endpoints either with a bare array or with an
//! object wrapping the array under one of several keys, sometimes next to
//! a `success` flag.

use crate::error::UpstreamError;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

/// Pull the record array out of `body`, trying `keys` in order.
pub fn extract_records(body: Value, keys: &[&str]) -> Result<Vec<Value>, UpstreamError> {
    match body {
        Value::Array(records) => Ok(records),
        Value::Object(mut map) => {
            if map.get("success").and_then(Value::as_bool) == Some(false) {
                return Err(UpstreamError::Unsuccessful);
            }
            for key in keys {
                if let Some(Value::Array(records)) = map.remove(*key) {
                    return Ok(records);
                }
            }
            Err(UpstreamError::Malformed(format!(
                "expected an array under one of {keys:?}"
            )))
        }
        other => Err(UpstreamError::Malformed(format!(
            "expected array or object, got {}",
            type_name(&other)
        ))),
    }
}

/// Decode each record on its own, skipping (and logging) the ones that do
/// not fit `T`.
pub fn decode_records<T: DeserializeOwned>(records: Vec<Value>, what: &'static str) -> Vec<T> {
    let total = records.len();
    let decoded: Vec<T> = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value(record) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(record = what, index, error = %e, "skipping undecodable record");
                None
            }
        })
        .collect();

    if decoded.len() < total {
        warn!(
            record = what,
            total,
            decoded = decoded.len(),
            "some upstream records were skipped"
        );
    }
    decoded
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
