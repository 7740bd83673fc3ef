//! Query API
//!
//! The entry point callers use: pick properties, set a filter, sort and
//! group, then run the query against a resource listing and render the
//! results.
//!
//! ## Example
//!
//! ```ignore
//! let output = server_query()?
//!     .select(&[ServerProperties::ServerName, ServerProperties::ServerStatus])?
//!     .filter(QueryPresets::EqualTo, ServerProperties::ServerStatus, &filter_params(json!({"value": "ERROR"})))?
//!     .sort_by(&[(ServerProperties::ServerCreationDate, SortOrder::Desc)])?
//!     .run(&lister, &ListingScope::new("prod"))?
//!     .to_table();
//! ```

use std::fmt;

use oq_core::{ConfigError, PropEnum, PropValue, QueryConfig, QueryError, QueryResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::builder::QueryBuilder;
use crate::handlers::{ClientSideHandler, ServerSideFilters, ServerSideHandler};
use crate::output::{PropsOutput, QueryOutput};
use crate::params::FilterParams;
use crate::parser::{ParsedResults, QueryParser};
use crate::presets::QueryPresets;
use crate::props::PropHandler;
use crate::sorts::SortOrder;

/// Everything the engine needs to know about one resource type
pub trait QueryMapping: 'static {
    /// Resource name used in log output, e.g. `servers`
    const RESOURCE: &'static str;

    type Prop: PropEnum;
    type Record: Clone + Send + Sync + 'static;

    /// Accessor for every property
    fn prop_mapping() -> QueryResult<PropHandler<Self::Prop, Self::Record>>;

    /// Client-side handlers, consulted in order
    fn client_side_handlers() -> QueryResult<Vec<ClientSideHandler<Self::Prop>>>;

    fn server_side_handler() -> ServerSideHandler<Self::Prop>;
}

/// Where the listing collaborator should look
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingScope {
    /// clouds.yaml account to connect with
    pub cloud_account: String,
    /// Restrict the listing to one project
    pub project_id: Option<String>,
    /// List across every project the account can see
    pub all_projects: bool,
}

impl ListingScope {
    pub fn new(cloud_account: impl Into<String>) -> Self {
        Self {
            cloud_account: cloud_account.into(),
            project_id: None,
            all_projects: false,
        }
    }

    pub fn from_config(config: &QueryConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.require_cloud_account()?))
    }

    pub fn with_project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self.all_projects = false;
        self
    }

    pub fn across_all_projects(mut self) -> Self {
        self.project_id = None;
        self.all_projects = true;
        self
    }
}

/// Lists resources from the remote API.
///
/// `filters` are the server-side filters the query resolved; an
/// implementation passes them to the listing call as they are.
pub trait ResourceLister<R> {
    fn list(&self, scope: &ListingScope, filters: &ServerSideFilters) -> anyhow::Result<Vec<R>>;
}

/// A query over one resource type
pub struct QueryApi<M: QueryMapping> {
    builder: QueryBuilder<M::Prop, M::Record>,
    parser: QueryParser<M::Prop, M::Record>,
    output: QueryOutput<M::Prop, M::Record>,
    config: QueryConfig,
    results: ParsedResults<M::Record>,
}

impl<M: QueryMapping> QueryApi<M> {
    pub fn new() -> QueryResult<Self> {
        Self::with_config(QueryConfig::default())
    }

    pub fn with_config(config: QueryConfig) -> QueryResult<Self> {
        let prop_handler = M::prop_mapping()?;
        let builder = QueryBuilder::new(
            prop_handler.clone(),
            M::client_side_handlers()?,
            M::server_side_handler(),
        );
        let parser = QueryParser::new(prop_handler.clone());
        let output = QueryOutput::new(prop_handler, config.output.clone());

        Ok(Self {
            builder,
            parser,
            output,
            config,
            results: ParsedResults::default(),
        })
    }

    pub fn select(mut self, props: &[M::Prop]) -> QueryResult<Self> {
        self.output.parse_select(props, false)?;
        Ok(self)
    }

    pub fn select_all(mut self) -> QueryResult<Self> {
        self.output.parse_select(&[], true)?;
        Ok(self)
    }

    /// Set the query's only filter
    pub fn filter(
        mut self,
        preset: QueryPresets,
        prop: M::Prop,
        params: &FilterParams,
    ) -> QueryResult<Self> {
        self.builder.parse_where(preset, prop, params)?;
        Ok(self)
    }

    pub fn sort_by(mut self, sort_by: &[(M::Prop, SortOrder)]) -> QueryResult<Self> {
        self.parser.parse_sort_by(sort_by)?;
        Ok(self)
    }

    pub fn group_by(
        mut self,
        prop: M::Prop,
        ranges: Option<Vec<(String, Vec<PropValue>)>>,
        include_missing: bool,
    ) -> QueryResult<Self> {
        self.parser.parse_group_by(prop, ranges, include_missing)?;
        Ok(self)
    }

    /// List the resources, filter them, then sort and group the rest.
    ///
    /// Running again replaces the previous results.
    pub fn run(
        mut self,
        lister: &dyn ResourceLister<M::Record>,
        scope: &ListingScope,
    ) -> QueryResult<Self> {
        let server_side_filters = self
            .builder
            .server_side_filters()
            .cloned()
            .unwrap_or_default();

        info!(
            resource = M::RESOURCE,
            cloud_account = %scope.cloud_account,
            server_side_filters = server_side_filters.len(),
            "Running query"
        );

        let records = lister
            .list(scope, &server_side_filters)
            .map_err(QueryError::Listing)?;
        let listed = records.len();

        let records: Vec<M::Record> = match self.builder.client_side_filter() {
            Some(predicate) => records.into_iter().filter(|r| predicate(r)).collect(),
            None => records,
        };

        debug!(
            resource = M::RESOURCE,
            listed,
            kept = records.len(),
            "Applied client-side filter"
        );

        self.results = self.parser.run_parser(records);
        Ok(self)
    }

    /// Results of the last run; empty before the first
    pub fn results(&self) -> &ParsedResults<M::Record> {
        &self.results
    }

    pub fn to_list(self) -> ParsedResults<M::Record> {
        self.results
    }

    pub fn to_props(&self) -> PropsOutput {
        self.output.to_props(&self.results)
    }

    pub fn to_table(&self) -> String {
        self.output.to_table(&self.results)
    }

    pub fn to_html(&self) -> String {
        self.output.to_html(&self.results)
    }

    pub fn to_json(&self) -> QueryResult<String> {
        self.output.to_json(&self.results)
    }

    /// Render in the configured output format
    pub fn render(&self) -> QueryResult<String> {
        self.output.render(&self.results, self.config.output.format)
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }
}

impl<M: QueryMapping> fmt::Debug for QueryApi<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryApi")
            .field("resource", &M::RESOURCE)
            .field("builder", &self.builder)
            .field("parser", &self.parser)
            .field("output", &self.output)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::filter_params;
    use crate::test_support::{self, TestMapping, TestProp};
    use mockall::mock;
    use serde_json::{json, Value};

    mock! {
        pub Lister {}

        impl ResourceLister<Value> for Lister {
            fn list(&self, scope: &ListingScope, filters: &ServerSideFilters) -> anyhow::Result<Vec<Value>>;
        }
    }

    fn lister_returning_records() -> MockLister {
        let mut lister = MockLister::new();
        lister
            .expect_list()
            .returning(|_, _| Ok(test_support::records()));
        lister
    }

    fn scope() -> ListingScope {
        ListingScope::new("dev")
    }

    #[test]
    fn test_listing_scope() {
        let scope = ListingScope::new("prod").with_project("abc");
        assert_eq!(scope.project_id.as_deref(), Some("abc"));
        assert!(!scope.all_projects);

        let scope = scope.across_all_projects();
        assert!(scope.all_projects);
        assert!(scope.project_id.is_none());
    }

    #[test]
    fn test_listing_scope_from_config() {
        let mut config = QueryConfig::default();
        assert!(matches!(
            ListingScope::from_config(&config),
            Err(ConfigError::MissingEnvVar(_))
        ));
        config.cloud_account = Some("openstack".to_string());
        assert_eq!(ListingScope::from_config(&config).unwrap().cloud_account, "openstack");
    }

    #[test]
    fn test_run_without_filter() {
        let query = QueryApi::<TestMapping>::new()
            .unwrap()
            .run(&lister_returning_records(), &scope())
            .unwrap();
        assert_eq!(query.results().record_count(), 4);
    }

    #[test]
    fn test_run_passes_server_side_filters() {
        let mut lister = MockLister::new();
        lister
            .expect_list()
            .withf(|scope, filters| {
                scope.cloud_account == "dev" && filters.get("name") == Some(&json!("vm-b"))
            })
            .times(1)
            .returning(|_, _| Ok(test_support::records()));

        let results = QueryApi::<TestMapping>::new()
            .unwrap()
            .filter(
                QueryPresets::EqualTo,
                TestProp::Name,
                &filter_params(json!({"value": "vm-b"})),
            )
            .unwrap()
            .run(&lister, &scope())
            .unwrap()
            .to_list();

        let records = results.as_flat().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["name"], "vm-b");
    }

    #[test]
    fn test_run_filters_client_side() {
        let mut lister = MockLister::new();
        lister
            .expect_list()
            .withf(|_, filters| filters.is_empty())
            .returning(|_, _| Ok(test_support::records()));

        let query = QueryApi::<TestMapping>::new()
            .unwrap()
            .filter(
                QueryPresets::OlderThan,
                TestProp::Created,
                &filter_params(json!({"days": 1})),
            )
            .unwrap()
            .run(&lister, &scope())
            .unwrap();
        // vm-d has no creation date
        assert_eq!(query.results().record_count(), 3);
    }

    #[test]
    fn test_full_query() {
        let query = QueryApi::<TestMapping>::new()
            .unwrap()
            .select(&[TestProp::Name, TestProp::Count])
            .unwrap()
            .filter(
                QueryPresets::AnyIn,
                TestProp::Status,
                &filter_params(json!({"values": ["ACTIVE", "SHUTOFF"]})),
            )
            .unwrap()
            .sort_by(&[(TestProp::Count, SortOrder::Desc)])
            .unwrap()
            .group_by(TestProp::Status, None, false)
            .unwrap()
            .run(&lister_returning_records(), &scope())
            .unwrap();

        let parsed: Value = serde_json::from_str(&query.to_json().unwrap()).unwrap();
        assert_eq!(
            parsed,
            json!({
                "STATUS with value SHUTOFF": [{"NAME": "vm-b", "COUNT": 3}],
                "STATUS with value ACTIVE": [
                    {"NAME": "vm-c", "COUNT": 2},
                    {"NAME": "vm-a", "COUNT": 1}
                ]
            })
        );
        match query.to_props() {
            PropsOutput::Grouped(groups) => {
                assert_eq!(groups[0].0, "STATUS with value SHUTOFF");
            }
            PropsOutput::Flat(_) => panic!("expected grouped output"),
        }
    }

    #[test]
    fn test_listing_failure() {
        let mut lister = MockLister::new();
        lister
            .expect_list()
            .returning(|_, _| Err(anyhow::anyhow!("connection refused")));

        let err = QueryApi::<TestMapping>::new()
            .unwrap()
            .run(&lister, &scope())
            .unwrap_err();
        assert!(matches!(err, QueryError::Listing(_)));
        assert_eq!(err.error_code(), "listing_error");
    }

    #[test]
    fn test_invalid_filter_fails_before_listing() {
        let err = QueryApi::<TestMapping>::new()
            .unwrap()
            .filter(
                QueryPresets::MatchesRegex,
                TestProp::Count,
                &filter_params(json!({"regex_string": "[0-9]"})),
            )
            .unwrap_err();
        assert!(matches!(err, QueryError::PresetMapping { .. }));
    }

    #[test]
    fn test_outputs_before_run_are_empty() {
        let query = QueryApi::<TestMapping>::new().unwrap();
        assert_eq!(query.to_props(), PropsOutput::Flat(vec![]));
        assert_eq!(query.to_json().unwrap(), "[]");
        assert!(query.render().unwrap().starts_with('+'));
    }
}
