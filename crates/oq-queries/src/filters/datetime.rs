//! Relative age operators.
//!
//! All four take the same optional `days`, `hours`, `minutes` and `seconds`
//! parameters, which together describe how far back from now the cutoff
//! lies. Values may be `PropValue::DateTime` or RFC 3339 strings; anything
//! else never matches.

use chrono::{DateTime, TimeDelta, Utc};

use super::{FilterSpec, ValueFilter};
use crate::params::{FilterParams, ParamKind, ParamSchema, ParamSpec};
use crate::presets::QueryPresets;

const DELTA: &[ParamSpec] = &[
    ParamSpec::optional("days", ParamKind::Number),
    ParamSpec::optional("hours", ParamKind::Number),
    ParamSpec::optional("minutes", ParamKind::Number),
    ParamSpec::optional("seconds", ParamKind::Number),
];

const SCHEMA: ParamSchema = ParamSchema::closed(DELTA);

pub fn filters() -> Vec<(QueryPresets, FilterSpec)> {
    vec![
        (
            QueryPresets::OlderThan,
            FilterSpec::new("prop_older_than", SCHEMA, older_than),
        ),
        (
            QueryPresets::OlderThanOrEqualTo,
            FilterSpec::new("prop_older_than_or_equal_to", SCHEMA, older_than_or_equal_to),
        ),
        (
            QueryPresets::YoungerThan,
            FilterSpec::new("prop_younger_than", SCHEMA, younger_than),
        ),
        (
            QueryPresets::YoungerThanOrEqualTo,
            FilterSpec::new(
                "prop_younger_than_or_equal_to",
                SCHEMA,
                younger_than_or_equal_to,
            ),
        ),
    ]
}

/// Total time span described by the delta parameters
pub fn time_delta(params: &FilterParams) -> Result<TimeDelta, String> {
    let amount = |name: &str| params.get(name).and_then(|v| v.as_f64()).unwrap_or(0.0);

    let seconds = amount("days") * 86_400.0
        + amount("hours") * 3_600.0
        + amount("minutes") * 60.0
        + amount("seconds");

    if seconds == 0.0 {
        return Err(
            "at least one of days, hours, minutes or seconds must be given and non-zero"
                .to_string(),
        );
    }

    TimeDelta::try_milliseconds((seconds * 1000.0).round() as i64)
        .ok_or_else(|| "time delta is out of range".to_string())
}

/// The point in time `params` describes, counted back from now
pub fn cutoff(params: &FilterParams) -> Result<DateTime<Utc>, String> {
    let delta = time_delta(params)?;
    Utc::now()
        .checked_sub_signed(delta)
        .ok_or_else(|| "time delta is out of range".to_string())
}

fn compare_to_cutoff(
    params: &FilterParams,
    accept: fn(DateTime<Utc>, DateTime<Utc>) -> bool,
) -> Result<ValueFilter, String> {
    let cutoff = cutoff(params)?;
    Ok(Box::new(move |prop| {
        prop.as_datetime()
            .map(|dt| accept(dt, cutoff))
            .unwrap_or(false)
    }))
}

fn older_than(params: &FilterParams) -> Result<ValueFilter, String> {
    compare_to_cutoff(params, |dt, cutoff| dt < cutoff)
}

fn older_than_or_equal_to(params: &FilterParams) -> Result<ValueFilter, String> {
    compare_to_cutoff(params, |dt, cutoff| dt <= cutoff)
}

fn younger_than(params: &FilterParams) -> Result<ValueFilter, String> {
    compare_to_cutoff(params, |dt, cutoff| dt > cutoff)
}

fn younger_than_or_equal_to(params: &FilterParams) -> Result<ValueFilter, String> {
    compare_to_cutoff(params, |dt, cutoff| dt >= cutoff)
}
