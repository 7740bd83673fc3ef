//! Numeric comparison operators. Non-numeric values never match.

use super::{number_param, FilterSpec, ValueFilter};
use crate::params::{FilterParams, ParamKind, ParamSchema, ParamSpec};
use crate::presets::QueryPresets;

const VALUE: &[ParamSpec] = &[ParamSpec::required("value", ParamKind::Number)];
const SCHEMA: ParamSchema = ParamSchema::closed(VALUE);

pub fn filters() -> Vec<(QueryPresets, FilterSpec)> {
    vec![
        (
            QueryPresets::LessThan,
            FilterSpec::new("prop_less_than", SCHEMA, less_than),
        ),
        (
            QueryPresets::LessThanOrEqualTo,
            FilterSpec::new("prop_less_than_or_equal_to", SCHEMA, less_than_or_equal_to),
        ),
        (
            QueryPresets::GreaterThan,
            FilterSpec::new("prop_greater_than", SCHEMA, greater_than),
        ),
        (
            QueryPresets::GreaterThanOrEqualTo,
            FilterSpec::new(
                "prop_greater_than_or_equal_to",
                SCHEMA,
                greater_than_or_equal_to,
            ),
        ),
    ]
}

fn compare_to_value(
    params: &FilterParams,
    accept: fn(f64, f64) -> bool,
) -> Result<ValueFilter, String> {
    let threshold = number_param(params, "value")?;
    Ok(Box::new(move |prop| {
        prop.as_f64().map(|v| accept(v, threshold)).unwrap_or(false)
    }))
}

fn less_than(params: &FilterParams) -> Result<ValueFilter, String> {
    compare_to_value(params, |v, threshold| v < threshold)
}

fn less_than_or_equal_to(params: &FilterParams) -> Result<ValueFilter, String> {
    compare_to_value(params, |v, threshold| v <= threshold)
}

fn greater_than(params: &FilterParams) -> Result<ValueFilter, String> {
    compare_to_value(params, |v, threshold| v > threshold)
}

fn greater_than_or_equal_to(params: &FilterParams) -> Result<ValueFilter, String> {
    compare_to_value(params, |v, threshold| v >= threshold)
}
