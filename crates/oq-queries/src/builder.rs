//! Query Builder
//!
//! Resolves a single filter request into a local predicate and the
//! parameters to push down to the listing call.

use std::fmt;

use oq_core::{PropEnum, QueryError, QueryResult};
use tracing::{error, info};

use crate::handlers::{ClientSideFilterFunc, ClientSideHandler, HandlerBase, ServerSideFilters, ServerSideHandler};
use crate::params::FilterParams;
use crate::presets::QueryPresets;
use crate::props::PropHandler;

/// Builder holding at most one resolved filter
pub struct QueryBuilder<P: PropEnum, R> {
    prop_handler: PropHandler<P, R>,
    client_side_handlers: Vec<ClientSideHandler<P>>,
    server_side_handler: ServerSideHandler<P>,
    client_side_filter: Option<ClientSideFilterFunc<R>>,
    server_side_filters: Option<ServerSideFilters>,
}

impl<P: PropEnum, R: 'static> QueryBuilder<P, R> {
    /// Client-side handlers are consulted in order; the first that supports
    /// a (preset, property) pair serves it.
    pub fn new(
        prop_handler: PropHandler<P, R>,
        client_side_handlers: Vec<ClientSideHandler<P>>,
        server_side_handler: ServerSideHandler<P>,
    ) -> Self {
        Self {
            prop_handler,
            client_side_handlers,
            server_side_handler,
            client_side_filter: None,
            server_side_filters: None,
        }
    }

    /// Set the query's filter.
    ///
    /// Fails if a filter is already set, if the property has no accessor,
    /// or if no client-side handler can serve the pair with these params.
    pub fn parse_where(
        &mut self,
        preset: QueryPresets,
        prop: P,
        params: &FilterParams,
    ) -> QueryResult<()> {
        if self.client_side_filter.is_some() {
            return Err(QueryError::parse_query(
                "Error: Already set a query preset - only one filter per query is supported",
            ));
        }

        let prop_func = self.prop_handler.get_prop_func(prop)?;
        let handler = self.find_client_handler(preset, prop)?;
        let client_side_filter = handler.get_filter_func(preset, prop, prop_func, params)?;

        let server_side_filters = self.server_side_handler.get_filters(preset, prop, params);
        match &server_side_filters {
            Some(filters) => info!(
                preset = %preset,
                prop = prop.name(),
                filters = %serde_json::Value::Object(filters.clone()),
                "Server-side filters found"
            ),
            None => info!(
                preset = %preset,
                prop = prop.name(),
                "No server-side filters found, the full listing will be filtered client-side"
            ),
        }

        self.client_side_filter = Some(client_side_filter);
        self.server_side_filters = Some(server_side_filters.unwrap_or_default());
        Ok(())
    }

    fn find_client_handler(&self, preset: QueryPresets, prop: P) -> QueryResult<&ClientSideHandler<P>> {
        if let Some(handler) = self
            .client_side_handlers
            .iter()
            .find(|h| h.check_supported(preset, prop))
        {
            return Ok(handler);
        }

        if self.client_side_handlers.iter().any(|h| h.preset_known(preset)) {
            error!(
                preset = %preset,
                prop = prop.name(),
                "Preset is not supported for this property"
            );
            Err(QueryError::preset_mapping(format!(
                "Error: preset '{}' cannot be used with property '{}' - the preset/property pair is not supported",
                preset,
                prop.name()
            )))
        } else {
            error!(
                preset = %preset,
                "No client-side handler knows this preset"
            );
            Err(QueryError::preset_mapping(format!(
                "Error: no client-side handler found for preset '{}' - the resource likely does not support this preset",
                preset
            )))
        }
    }

    /// Local predicate, `None` until `parse_where` succeeds
    pub fn client_side_filter(&self) -> Option<&ClientSideFilterFunc<R>> {
        self.client_side_filter.as_ref()
    }

    /// Parameters for the listing call, `None` until `parse_where`
    /// succeeds. Empty when nothing could be pushed down.
    pub fn server_side_filters(&self) -> Option<&ServerSideFilters> {
        self.server_side_filters.as_ref()
    }

    pub fn has_filter(&self) -> bool {
        self.client_side_filter.is_some()
    }

    /// Forget the current filter
    pub fn reset(&mut self) {
        self.client_side_filter = None;
        self.server_side_filters = None;
    }

    pub fn prop_handler(&self) -> &PropHandler<P, R> {
        &self.prop_handler
    }
}

impl<P: PropEnum, R> fmt::Debug for QueryBuilder<P, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryBuilder")
            .field("client_side_handlers", &self.client_side_handlers)
            .field("server_side_handler", &self.server_side_handler)
            .field("has_filter", &self.client_side_filter.is_some())
            .field("server_side_filters", &self.server_side_filters)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::filter_params;
    use crate::test_support::{self, TestProp};
    use serde_json::{json, Value};

    fn builder() -> QueryBuilder<TestProp, Value> {
        QueryBuilder::new(
            test_support::prop_handler(),
            test_support::client_side_handlers(),
            test_support::server_side_handler(),
        )
    }

    #[test]
    fn test_empty_builder() {
        let builder = builder();
        assert!(!builder.has_filter());
        assert!(builder.client_side_filter().is_none());
        assert!(builder.server_side_filters().is_none());
    }

    #[test]
    fn test_parse_where_with_server_side_filters() {
        let mut builder = builder();
        builder
            .parse_where(
                QueryPresets::EqualTo,
                TestProp::Name,
                &filter_params(json!({"value": "vm-b"})),
            )
            .unwrap();

        let predicate = builder.client_side_filter().unwrap();
        let matched: Vec<Value> = test_support::records()
            .into_iter()
            .filter(|r| predicate(r))
            .collect();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0]["name"], "vm-b");
        assert_eq!(builder.server_side_filters().unwrap()["name"], json!("vm-b"));
    }

    #[test]
    fn test_parse_where_client_side_only() {
        let mut builder = builder();
        builder
            .parse_where(
                QueryPresets::GreaterThan,
                TestProp::Count,
                &filter_params(json!({"value": 2})),
            )
            .unwrap();

        let predicate = builder.client_side_filter().unwrap();
        let counts: Vec<Value> = test_support::records()
            .iter()
            .filter(|r| predicate(*r))
            .map(|r| r["count"].clone())
            .collect();
        assert_eq!(counts, vec![json!(3), json!(4)]);
        assert!(builder.server_side_filters().unwrap().is_empty());
    }

    #[test]
    fn test_second_filter_is_rejected() {
        let mut builder = builder();
        let params = filter_params(json!({"value": "vm-a"}));
        builder
            .parse_where(QueryPresets::EqualTo, TestProp::Name, &params)
            .unwrap();
        let err = builder
            .parse_where(QueryPresets::EqualTo, TestProp::Name, &params)
            .unwrap_err();
        assert!(matches!(err, QueryError::ParseQuery { .. }));

        builder.reset();
        assert!(!builder.has_filter());
        assert!(builder
            .parse_where(QueryPresets::EqualTo, TestProp::Name, &params)
            .is_ok());
    }

    #[test]
    fn test_unknown_preset() {
        let mut builder = QueryBuilder::new(
            test_support::prop_handler(),
            vec![test_support::generic_handler()],
            ServerSideHandler::empty(),
        );
        let err = builder
            .parse_where(
                QueryPresets::LessThan,
                TestProp::Count,
                &filter_params(json!({"value": 1})),
            )
            .unwrap_err();
        assert!(matches!(err, QueryError::PresetMapping { .. }));
        assert!(err.to_string().contains("does not support this preset"));
        assert!(!builder.has_filter());
    }

    #[test]
    fn test_unsupported_pair() {
        let mut builder = builder();
        let err = builder
            .parse_where(
                QueryPresets::LessThan,
                TestProp::Name,
                &filter_params(json!({"value": 1})),
            )
            .unwrap_err();
        assert!(matches!(err, QueryError::PresetMapping { .. }));
        assert!(err.to_string().contains("pair is not supported"));
    }

    #[test]
    fn test_missing_required_param() {
        let mut builder = builder();
        let err = builder
            .parse_where(QueryPresets::AnyIn, TestProp::Status, &FilterParams::new())
            .unwrap_err();
        assert!(matches!(err, QueryError::PresetMapping { .. }));
        assert!(err.to_string().contains("values"));
        assert!(!builder.has_filter());
    }

    #[test]
    fn test_predicate_rejects_records_missing_the_property() {
        let mut builder = builder();
        builder
            .parse_where(
                QueryPresets::NotEqualTo,
                TestProp::Status,
                &filter_params(json!({"value": "ERROR"})),
            )
            .unwrap();
        let predicate = builder.client_side_filter().unwrap();
        assert!(!predicate(&json!({"name": "no-status"})));
        assert!(predicate(&json!({"status": "ACTIVE"})));
    }
}
