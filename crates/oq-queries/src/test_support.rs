//! Shared fixtures for the unit tests: a small resource with four
//! properties whose records are JSON objects.

use oq_core::{PropEnum, PropValue, QueryResult};
use serde_json::{json, Value};

use crate::api::QueryMapping;
use crate::handlers::{single_filter, ClientSideHandler, PropSupport, ServerSideFilterFunc, ServerSideFilters, ServerSideHandler};
use crate::params::FilterParams;
use crate::presets::QueryPresets;
use crate::props::{PropFunc, PropHandler};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TestProp {
    Name,
    Count,
    Created,
    Status,
}

impl PropEnum for TestProp {
    fn all() -> &'static [Self] {
        &[Self::Name, Self::Count, Self::Created, Self::Status]
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Name => "NAME",
            Self::Count => "COUNT",
            Self::Created => "CREATED",
            Self::Status => "STATUS",
        }
    }
}

pub fn records() -> Vec<Value> {
    vec![
        json!({"name": "vm-a", "count": 1, "created": "2024-01-10T09:00:00Z", "status": "ACTIVE"}),
        json!({"name": "vm-b", "count": 3, "created": "2024-03-01T12:30:00Z", "status": "SHUTOFF"}),
        json!({"name": "vm-c", "count": 2, "created": "2023-12-25T00:00:00Z", "status": "ACTIVE"}),
        json!({"name": "vm-d", "count": 4, "status": "ERROR"}),
    ]
}

fn name(record: &Value) -> Option<PropValue> {
    record.get("name").map(PropValue::from_json)
}

fn count(record: &Value) -> Option<PropValue> {
    record.get("count").map(PropValue::from_json)
}

fn created(record: &Value) -> Option<PropValue> {
    let value = PropValue::from_json(record.get("created")?);
    Some(value.as_datetime().map(PropValue::DateTime).unwrap_or(value))
}

fn status(record: &Value) -> Option<PropValue> {
    record.get("status").map(PropValue::from_json)
}

pub fn prop_mappings() -> Vec<(TestProp, PropFunc<Value>)> {
    vec![
        (TestProp::Name, name as PropFunc<Value>),
        (TestProp::Count, count as PropFunc<Value>),
        (TestProp::Created, created as PropFunc<Value>),
        (TestProp::Status, status as PropFunc<Value>),
    ]
}

pub fn prop_handler() -> PropHandler<TestProp, Value> {
    PropHandler::new(prop_mappings()).unwrap()
}

pub fn generic_handler() -> ClientSideHandler<TestProp> {
    ClientSideHandler::generic(vec![
        (QueryPresets::EqualTo, PropSupport::All),
        (QueryPresets::NotEqualTo, PropSupport::All),
        (QueryPresets::AnyIn, PropSupport::All),
        (QueryPresets::NotAnyIn, PropSupport::All),
    ])
    .unwrap()
}

pub fn string_handler() -> ClientSideHandler<TestProp> {
    let text = PropSupport::Props(vec![TestProp::Name, TestProp::Status]);
    ClientSideHandler::string(vec![
        (QueryPresets::MatchesRegex, text.clone()),
        (QueryPresets::Contains, text),
    ])
    .unwrap()
}

pub fn datetime_handler() -> ClientSideHandler<TestProp> {
    let dates = PropSupport::Props(vec![TestProp::Created]);
    ClientSideHandler::datetime(
        [
            QueryPresets::OlderThan,
            QueryPresets::OlderThanOrEqualTo,
            QueryPresets::YoungerThan,
            QueryPresets::YoungerThanOrEqualTo,
        ]
        .map(|preset| (preset, dates.clone())),
    )
    .unwrap()
}

pub fn integer_handler() -> ClientSideHandler<TestProp> {
    let numbers = PropSupport::Props(vec![TestProp::Count]);
    ClientSideHandler::integer(
        [
            QueryPresets::LessThan,
            QueryPresets::LessThanOrEqualTo,
            QueryPresets::GreaterThan,
            QueryPresets::GreaterThanOrEqualTo,
        ]
        .map(|preset| (preset, numbers.clone())),
    )
    .unwrap()
}

pub fn client_side_handlers() -> Vec<ClientSideHandler<TestProp>> {
    vec![
        generic_handler(),
        string_handler(),
        datetime_handler(),
        integer_handler(),
    ]
}

fn name_equal_to(params: &FilterParams) -> Option<ServerSideFilters> {
    let name = params.get("value")?.as_str()?;
    Some(single_filter("name", name))
}

pub fn server_side_handler() -> ServerSideHandler<TestProp> {
    ServerSideHandler::new(vec![(
        QueryPresets::EqualTo,
        vec![(TestProp::Name, name_equal_to as ServerSideFilterFunc)],
    )])
}

pub struct TestMapping;

impl QueryMapping for TestMapping {
    const RESOURCE: &'static str = "test resources";

    type Prop = TestProp;
    type Record = Value;

    fn prop_mapping() -> QueryResult<PropHandler<TestProp, Value>> {
        PropHandler::new(prop_mappings())
    }

    fn client_side_handlers() -> QueryResult<Vec<ClientSideHandler<TestProp>>> {
        Ok(client_side_handlers())
    }

    fn server_side_handler() -> ServerSideHandler<TestProp> {
        server_side_handler()
    }
}
