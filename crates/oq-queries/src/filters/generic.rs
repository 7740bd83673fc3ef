//! Equality and membership operators, valid for values of any type

use oq_core::PropValue;

use super::{list_param, param, FilterSpec, ValueFilter};
use crate::params::{FilterParams, ParamKind, ParamSchema, ParamSpec};
use crate::presets::QueryPresets;

const VALUE: &[ParamSpec] = &[ParamSpec::required("value", ParamKind::Any)];
const VALUES: &[ParamSpec] = &[ParamSpec::required("values", ParamKind::List)];

pub fn filters() -> Vec<(QueryPresets, FilterSpec)> {
    vec![
        (
            QueryPresets::EqualTo,
            FilterSpec::new("prop_equal_to", ParamSchema::closed(VALUE), equal_to),
        ),
        (
            QueryPresets::NotEqualTo,
            FilterSpec::new("prop_not_equal_to", ParamSchema::closed(VALUE), not_equal_to),
        ),
        (
            QueryPresets::AnyIn,
            FilterSpec::new("prop_any_in", ParamSchema::closed(VALUES), any_in),
        ),
        (
            QueryPresets::NotAnyIn,
            FilterSpec::new("prop_not_any_in", ParamSchema::closed(VALUES), not_any_in),
        ),
    ]
}

fn equal_to(params: &FilterParams) -> Result<ValueFilter, String> {
    let expected = PropValue::from_json(param(params, "value")?);
    Ok(Box::new(move |prop| *prop == expected))
}

fn not_equal_to(params: &FilterParams) -> Result<ValueFilter, String> {
    let expected = PropValue::from_json(param(params, "value")?);
    Ok(Box::new(move |prop| *prop != expected))
}

fn any_in(params: &FilterParams) -> Result<ValueFilter, String> {
    let values = list_param(params, "values")?;
    Ok(Box::new(move |prop| values.contains(prop)))
}

fn not_any_in(params: &FilterParams) -> Result<ValueFilter, String> {
    let values = list_param(params, "values")?;
    Ok(Box::new(move |prop| !values.contains(prop)))
}
