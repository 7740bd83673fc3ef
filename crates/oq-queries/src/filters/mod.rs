//! Filter operators
//!
//! Every preset is backed by one operator: a parameter schema plus a
//! constructor that turns validated parameters into a predicate over a
//! single property value. Operators never see records; the client-side
//! handler extracts the value first.

pub mod datetime;
pub mod generic;
pub mod integer;
pub mod string;

use std::collections::HashMap;
use std::fmt;

use oq_core::PropValue;
use serde_json::Value;

use crate::params::{FilterParams, ParamSchema};
use crate::presets::{PresetCategory, QueryPresets};

/// Predicate over an extracted property value
pub type ValueFilter = Box<dyn Fn(&PropValue) -> bool + Send + Sync>;

/// Builds a predicate from parameters that already passed the schema.
/// Returns the reason when the parameters are unusable.
pub type FilterBuildFn = fn(&FilterParams) -> Result<ValueFilter, String>;

/// A filter operator
#[derive(Clone, Copy)]
pub struct FilterSpec {
    pub name: &'static str,
    pub schema: ParamSchema,
    build: FilterBuildFn,
}

impl FilterSpec {
    pub const fn new(name: &'static str, schema: ParamSchema, build: FilterBuildFn) -> Self {
        Self {
            name,
            schema,
            build,
        }
    }

    /// Validate `params` and build the predicate
    pub fn build_filter(&self, params: &FilterParams) -> Result<ValueFilter, String> {
        self.schema.validate(params)?;
        (self.build)(params)
    }
}

impl fmt::Debug for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterSpec")
            .field("name", &self.name)
            .field("schema", &self.schema)
            .finish()
    }
}

/// Built-in operators for one preset category
pub fn filter_table(category: PresetCategory) -> HashMap<QueryPresets, FilterSpec> {
    let filters = match category {
        PresetCategory::Generic => generic::filters(),
        PresetCategory::String => string::filters(),
        PresetCategory::DateTime => datetime::filters(),
        PresetCategory::Integer => integer::filters(),
    };
    filters.into_iter().collect()
}

pub(crate) fn param<'a>(params: &'a FilterParams, name: &str) -> Result<&'a Value, String> {
    params
        .get(name)
        .ok_or_else(|| format!("{} expected but not given", name))
}

pub(crate) fn number_param(params: &FilterParams, name: &str) -> Result<f64, String> {
    param(params, name)?
        .as_f64()
        .ok_or_else(|| format!("{} must be a number", name))
}

pub(crate) fn list_param(params: &FilterParams, name: &str) -> Result<Vec<PropValue>, String> {
    let values = param(params, name)?
        .as_array()
        .ok_or_else(|| format!("{} must be a list", name))?;
    if values.is_empty() {
        return Err(format!("{} given must not be empty", name));
    }
    Ok(values.iter().map(PropValue::from_json).collect())
}
