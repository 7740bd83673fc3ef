//! Projects

use oq_core::{PropEnum, QueryResult};
use oq_queries::handlers::{
    ClientSideHandler, PropSupport, ServerSideFilterFunc, ServerSideFilters, ServerSideHandler,
};
use oq_queries::params::FilterParams;
use oq_queries::presets::{PresetCategory, QueryPresets};
use oq_queries::props::{PropFunc, PropHandler};
use oq_queries::QueryMapping;
use serde_json::Value;

use crate::record::{field, forward_value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectProperties {
    ProjectDescription,
    ProjectDomainId,
    ProjectId,
    ProjectIsDomain,
    ProjectIsEnabled,
    ProjectName,
    ProjectParentId,
}

impl PropEnum for ProjectProperties {
    fn all() -> &'static [Self] {
        &[
            Self::ProjectDescription,
            Self::ProjectDomainId,
            Self::ProjectId,
            Self::ProjectIsDomain,
            Self::ProjectIsEnabled,
            Self::ProjectName,
            Self::ProjectParentId,
        ]
    }

    fn name(&self) -> &'static str {
        match self {
            Self::ProjectDescription => "PROJECT_DESCRIPTION",
            Self::ProjectDomainId => "PROJECT_DOMAIN_ID",
            Self::ProjectId => "PROJECT_ID",
            Self::ProjectIsDomain => "PROJECT_IS_DOMAIN",
            Self::ProjectIsEnabled => "PROJECT_IS_ENABLED",
            Self::ProjectName => "PROJECT_NAME",
            Self::ProjectParentId => "PROJECT_PARENT_ID",
        }
    }
}

impl ProjectProperties {
    pub fn prop_func(&self) -> PropFunc<Value> {
        match self {
            Self::ProjectDescription => |r| field(r, "description"),
            Self::ProjectDomainId => |r| field(r, "domain_id"),
            Self::ProjectId => |r| field(r, "id"),
            Self::ProjectIsDomain => |r| field(r, "is_domain"),
            Self::ProjectIsEnabled => |r| field(r, "is_enabled"),
            Self::ProjectName => |r| field(r, "name"),
            Self::ProjectParentId => |r| field(r, "parent_id"),
        }
    }
}

fn name_equal_to(params: &FilterParams) -> Option<ServerSideFilters> {
    forward_value("name", params)
}

fn domain_id_equal_to(params: &FilterParams) -> Option<ServerSideFilters> {
    forward_value("domain_id", params)
}

fn parent_id_equal_to(params: &FilterParams) -> Option<ServerSideFilters> {
    forward_value("parent_id", params)
}

fn is_domain_equal_to(params: &FilterParams) -> Option<ServerSideFilters> {
    params.get("value")?.as_bool()?;
    forward_value("is_domain", params)
}

fn is_enabled_equal_to(params: &FilterParams) -> Option<ServerSideFilters> {
    params.get("value")?.as_bool()?;
    forward_value("enabled", params)
}

pub struct ProjectMapping;

impl QueryMapping for ProjectMapping {
    const RESOURCE: &'static str = "projects";

    type Prop = ProjectProperties;
    type Record = Value;

    fn prop_mapping() -> QueryResult<PropHandler<ProjectProperties, Value>> {
        PropHandler::new(ProjectProperties::all().iter().map(|p| (*p, p.prop_func())))
    }

    fn client_side_handlers() -> QueryResult<Vec<ClientSideHandler<ProjectProperties>>> {
        let text = PropSupport::Props(vec![
            ProjectProperties::ProjectName,
            ProjectProperties::ProjectDescription,
        ]);

        Ok(vec![
            ClientSideHandler::generic(
                QueryPresets::in_category(PresetCategory::Generic)
                    .map(|preset| (preset, PropSupport::All)),
            )?,
            ClientSideHandler::string(
                QueryPresets::in_category(PresetCategory::String)
                    .map(|preset| (preset, text.clone())),
            )?,
        ])
    }

    fn server_side_handler() -> ServerSideHandler<ProjectProperties> {
        ServerSideHandler::new(vec![(
            QueryPresets::EqualTo,
            vec![
                (ProjectProperties::ProjectName, name_equal_to as ServerSideFilterFunc),
                (ProjectProperties::ProjectDomainId, domain_id_equal_to as ServerSideFilterFunc),
                (ProjectProperties::ProjectParentId, parent_id_equal_to as ServerSideFilterFunc),
                (ProjectProperties::ProjectIsDomain, is_domain_equal_to as ServerSideFilterFunc),
                (ProjectProperties::ProjectIsEnabled, is_enabled_equal_to as ServerSideFilterFunc),
            ],
        )])
    }
}
