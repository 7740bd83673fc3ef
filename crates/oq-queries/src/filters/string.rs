//! Text operators. Non-string values never match.

use regex::Regex;

use super::{param, FilterSpec, ValueFilter};
use crate::params::{FilterParams, ParamKind, ParamSchema, ParamSpec};
use crate::presets::QueryPresets;

const REGEX: &[ParamSpec] = &[ParamSpec::required("regex_string", ParamKind::String)];
const VALUE: &[ParamSpec] = &[ParamSpec::required("value", ParamKind::String)];

pub fn filters() -> Vec<(QueryPresets, FilterSpec)> {
    vec![
        (
            QueryPresets::MatchesRegex,
            FilterSpec::new("prop_matches_regex", ParamSchema::closed(REGEX), matches_regex),
        ),
        (
            QueryPresets::Contains,
            FilterSpec::new("prop_contains", ParamSchema::closed(VALUE), contains),
        ),
    ]
}

/// Match anchored at the start of the value, not necessarily the end
fn matches_regex(params: &FilterParams) -> Result<ValueFilter, String> {
    let pattern = param(params, "regex_string")?
        .as_str()
        .ok_or("regex_string must be a string")?;
    let regex = Regex::new(&format!("^(?:{})", pattern))
        .map_err(|e| format!("regex_string '{}' is not a valid regular expression: {}", pattern, e))?;
    Ok(Box::new(move |prop| {
        prop.as_str().map(|s| regex.is_match(s)).unwrap_or(false)
    }))
}

fn contains(params: &FilterParams) -> Result<ValueFilter, String> {
    let needle = param(params, "value")?
        .as_str()
        .ok_or("value must be a string")?
        .to_string();
    Ok(Box::new(move |prop| {
        prop.as_str().map(|s| s.contains(&needle)).unwrap_or(false)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::filter_params;
    use oq_core::PropValue;
    use serde_json::json;

    fn build(preset: QueryPresets, params: serde_json::Value) -> Result<ValueFilter, String> {
        let table: std::collections::HashMap<_, _> = filters().into_iter().collect();
        table[&preset].build_filter(&filter_params(params))
    }

    fn expect_filter(preset: QueryPresets, params: serde_json::Value) -> ValueFilter {
        match build(preset, params) {
            Ok(filter) => filter,
            Err(reason) => panic!("failed to build {}: {}", preset, reason),
        }
    }

    fn expect_reason(preset: QueryPresets, params: serde_json::Value) -> String {
        match build(preset, params) {
            Ok(_) => panic!("{} should have been rejected", preset),
            Err(reason) => reason,
        }
    }

    #[test]
    fn test_matches_regex() {
        let cases = [
            ("[0-9]+", "123", true),
            ("[A-Za-z]+", "abc", true),
            ("[A-Za-z]+", "123", false),
            ("[A-Za-z0-9]+", "abc123", true),
            ("[A-Za-z]+", "", false),
            ("vm-", "my-vm-1", false),
        ];
        for (pattern, value, expected) in cases {
            let filter = expect_filter(QueryPresets::MatchesRegex, json!({"regex_string": pattern}));
            assert_eq!(filter(&PropValue::from(value)), expected, "{} on {}", pattern, value);
        }
    }

    #[test]
    fn test_matches_regex_ignores_non_strings() {
        let filter = expect_filter(QueryPresets::MatchesRegex, json!({"regex_string": "1"}));
        assert!(!filter(&PropValue::Integer(1)));
    }

    #[test]
    fn test_invalid_regex_is_rejected_at_build_time() {
        let reason = expect_reason(QueryPresets::MatchesRegex, json!({"regex_string": "("}));
        assert!(reason.contains("not a valid regular expression"));
    }

    #[test]
    fn test_contains() {
        let filter = expect_filter(QueryPresets::Contains, json!({"value": "test"}));
        assert!(filter(&PropValue::from("my-test-vm")));
        assert!(!filter(&PropValue::from("prod-vm")));
    }
}
