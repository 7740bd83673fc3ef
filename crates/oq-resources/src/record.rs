//! Helpers for reading properties out of listing API records.
//!
//! Records are the JSON objects the listing API returns. A key that is
//! missing means the record does not carry the property; an explicit
//! `null` is a present but empty value.

use chrono::SecondsFormat;
use oq_core::PropValue;
use oq_queries::filters::datetime;
use oq_queries::handlers::{single_filter, ServerSideFilters};
use oq_queries::params::FilterParams;
use serde_json::Value;

/// Top-level field
pub fn field(record: &Value, key: &str) -> Option<PropValue> {
    record.get(key).map(PropValue::from_json)
}

/// Nested field addressed by a JSON pointer, e.g. `/location/project/id`
pub fn pointer(record: &Value, path: &str) -> Option<PropValue> {
    record.pointer(path).map(PropValue::from_json)
}

/// Top-level timestamp. RFC 3339 text becomes a `PropValue::DateTime`,
/// anything else is passed through untouched.
pub fn timestamp(record: &Value, key: &str) -> Option<PropValue> {
    let value = field(record, key)?;
    Some(value.as_datetime().map(PropValue::DateTime).unwrap_or(value))
}

/// Forward the `value` parameter unchanged under `key`
pub fn forward_value(key: &str, params: &FilterParams) -> Option<ServerSideFilters> {
    let value = params.get("value")?;
    if value.is_null() {
        return None;
    }
    Some(single_filter(key, value.clone()))
}

/// Forward the cutoff a relative age describes, as RFC 3339, under `key`
pub fn forward_cutoff(key: &str, params: &FilterParams) -> Option<ServerSideFilters> {
    let cutoff = datetime::cutoff(params).ok()?;
    Some(single_filter(
        key,
        cutoff.to_rfc3339_opts(SecondsFormat::Secs, true),
    ))
}
