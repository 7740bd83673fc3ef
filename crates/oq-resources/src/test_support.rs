//! Fixtures shared by the resource tests

use std::cell::RefCell;

use oq_core::PropEnum;
use oq_queries::params::{filter_params, FilterParams};
use oq_queries::presets::QueryPresets;
use oq_queries::{HandlerBase, ListingScope, QueryMapping, ResourceLister, ServerSideFilters};
use serde_json::{json, Value};

/// The smallest valid arguments for each preset
pub fn minimal_params(preset: QueryPresets) -> FilterParams {
    filter_params(match preset {
        QueryPresets::EqualTo | QueryPresets::NotEqualTo | QueryPresets::Contains => {
            json!({"value": "x"})
        }
        QueryPresets::AnyIn | QueryPresets::NotAnyIn => json!({"values": ["x"]}),
        QueryPresets::MatchesRegex => json!({"regex_string": "x"}),
        QueryPresets::OlderThan
        | QueryPresets::OlderThanOrEqualTo
        | QueryPresets::YoungerThan
        | QueryPresets::YoungerThanOrEqualTo => json!({"days": 1}),
        QueryPresets::LessThan
        | QueryPresets::LessThanOrEqualTo
        | QueryPresets::GreaterThan
        | QueryPresets::GreaterThanOrEqualTo => json!({"value": 1}),
    })
}

/// Every property has an accessor, and every pair a handler claims to
/// support can be built with minimal arguments.
pub fn assert_mapping_is_consistent<M: QueryMapping>() {
    let props = M::prop_mapping().unwrap();
    let handlers = M::client_side_handlers().unwrap();
    let server_side = M::server_side_handler();

    for prop in M::Prop::all() {
        assert!(props.check_supported(*prop), "{} has no accessor", prop.name());
        let prop_func = props.get_prop_func(*prop).unwrap();

        for preset in QueryPresets::ALL {
            let params = minimal_params(*preset);
            for handler in handlers.iter().filter(|h| h.check_supported(*preset, *prop)) {
                assert!(
                    handler
                        .get_filter_func(*preset, *prop, prop_func, &params)
                        .is_ok(),
                    "{} handler failed on {}:{}",
                    handler.name(),
                    preset,
                    prop.name()
                );
            }
            if server_side.check_supported(*preset, *prop) {
                // may decline, must not fail
                let _ = server_side.get_filters(*preset, *prop, &params);
            }
        }
    }
}

pub fn server_records() -> Vec<Value> {
    vec![
        json!({
            "id": "server-1",
            "name": "web-01",
            "description": "frontend",
            "status": "ACTIVE",
            "user_id": "user-1",
            "host_id": "host-1",
            "flavor_id": "flavor-small",
            "image_id": "image-1",
            "created_at": "2023-05-01T10:00:00Z",
            "updated_at": "2023-06-01T10:00:00Z",
            "location": {"project": {"id": "project-1"}}
        }),
        json!({
            "id": "server-2",
            "name": "db-01",
            "description": null,
            "status": "SHUTOFF",
            "user_id": "user-2",
            "host_id": "host-2",
            "flavor_id": "flavor-large",
            "image_id": "image-2",
            "created_at": "2022-01-15T08:30:00Z",
            "updated_at": "2022-02-01T08:30:00Z",
            "location": {"project": {"id": "project-1"}}
        }),
        json!({
            "id": "server-3",
            "name": "web-02",
            "status": "ERROR",
            "user_id": "user-1",
            "host_id": "host-1",
            "flavor_id": "flavor-small",
            "image_id": "image-1",
            "created_at": "2024-09-30T23:59:59Z",
            "updated_at": "2024-10-01T00:00:00Z",
            "location": {"project": {"id": "project-2"}}
        }),
    ]
}

/// Lister serving fixed records and remembering the filters it was given
pub struct FixtureLister {
    records: Vec<Value>,
    pub calls: RefCell<Vec<ServerSideFilters>>,
}

impl FixtureLister {
    pub fn new(records: Vec<Value>) -> Self {
        Self {
            records,
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl ResourceLister<Value> for FixtureLister {
    fn list(&self, _scope: &ListingScope, filters: &ServerSideFilters) -> anyhow::Result<Vec<Value>> {
        self.calls.borrow_mut().push(filters.clone());
        Ok(self.records.clone())
    }
}
