//! Servers
//!
//! Records are compute server objects as returned by the server listing
//! call.

use std::fmt;

use oq_core::{PropEnum, QueryError, QueryResult};
use oq_queries::handlers::{
    single_filter, ClientSideHandler, PropSupport, ServerSideFilterFunc, ServerSideFilters,
    ServerSideHandler,
};
use oq_queries::params::FilterParams;
use oq_queries::presets::{PresetCategory, QueryPresets};
use oq_queries::props::{PropFunc, PropHandler};
use oq_queries::QueryMapping;
use serde_json::Value;

use crate::record::{field, forward_cutoff, forward_value, pointer, timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServerProperties {
    FlavorId,
    HypervisorId,
    ImageId,
    ProjectId,
    ServerCreationDate,
    ServerDescription,
    ServerId,
    ServerLastUpdatedDate,
    ServerName,
    ServerStatus,
    UserId,
}

impl PropEnum for ServerProperties {
    fn all() -> &'static [Self] {
        &[
            Self::FlavorId,
            Self::HypervisorId,
            Self::ImageId,
            Self::ProjectId,
            Self::ServerCreationDate,
            Self::ServerDescription,
            Self::ServerId,
            Self::ServerLastUpdatedDate,
            Self::ServerName,
            Self::ServerStatus,
            Self::UserId,
        ]
    }

    fn name(&self) -> &'static str {
        match self {
            Self::FlavorId => "FLAVOR_ID",
            Self::HypervisorId => "HYPERVISOR_ID",
            Self::ImageId => "IMAGE_ID",
            Self::ProjectId => "PROJECT_ID",
            Self::ServerCreationDate => "SERVER_CREATION_DATE",
            Self::ServerDescription => "SERVER_DESCRIPTION",
            Self::ServerId => "SERVER_ID",
            Self::ServerLastUpdatedDate => "SERVER_LAST_UPDATED_DATE",
            Self::ServerName => "SERVER_NAME",
            Self::ServerStatus => "SERVER_STATUS",
            Self::UserId => "USER_ID",
        }
    }
}

impl ServerProperties {
    /// Accessor reading this property from a server record
    pub fn prop_func(&self) -> PropFunc<Value> {
        match self {
            Self::FlavorId => |r| field(r, "flavor_id"),
            Self::HypervisorId => |r| field(r, "host_id"),
            Self::ImageId => |r| field(r, "image_id"),
            Self::ProjectId => |r| pointer(r, "/location/project/id"),
            Self::ServerCreationDate => |r| timestamp(r, "created_at"),
            Self::ServerDescription => |r| field(r, "description"),
            Self::ServerId => |r| field(r, "id"),
            Self::ServerLastUpdatedDate => |r| timestamp(r, "updated_at"),
            Self::ServerName => |r| field(r, "name"),
            Self::ServerStatus => |r| field(r, "status"),
            Self::UserId => |r| field(r, "user_id"),
        }
    }
}

/// States a server can be in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServerStatus {
    Suspended,
    Active,
    Shutoff,
    Error,
}

impl ServerStatus {
    pub const ALL: &'static [ServerStatus] =
        &[Self::Suspended, Self::Active, Self::Shutoff, Self::Error];

    /// Case-insensitive
    pub fn from_string(value: &str) -> QueryResult<Self> {
        let wanted = value.trim().to_uppercase();
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| {
                QueryError::parse_query(format!(
                    "Could not find server status '{}'. Available statuses are {}",
                    value,
                    Self::ALL
                        .iter()
                        .map(|s| s.as_str())
                        .collect::<Vec<_>>()
                        .join(",")
                ))
            })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Suspended => "SUSPENDED",
            Self::Active => "ACTIVE",
            Self::Shutoff => "SHUTOFF",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn user_id_equal_to(params: &FilterParams) -> Option<ServerSideFilters> {
    forward_value("user_id", params)
}

fn server_id_equal_to(params: &FilterParams) -> Option<ServerSideFilters> {
    forward_value("uuid", params)
}

fn server_name_equal_to(params: &FilterParams) -> Option<ServerSideFilters> {
    forward_value("name", params)
}

/// Only statuses the API knows are pushed down, in the API's spelling
fn server_status_equal_to(params: &FilterParams) -> Option<ServerSideFilters> {
    let status = params.get("value")?.as_str()?;
    let status = ServerStatus::from_string(status).ok()?;
    Some(single_filter("status", status.as_str()))
}

fn flavor_id_equal_to(params: &FilterParams) -> Option<ServerSideFilters> {
    forward_value("flavor", params)
}

fn image_id_equal_to(params: &FilterParams) -> Option<ServerSideFilters> {
    forward_value("image", params)
}

fn project_id_equal_to(params: &FilterParams) -> Option<ServerSideFilters> {
    forward_value("project_id", params)
}

fn last_updated_older_than_or_equal_to(params: &FilterParams) -> Option<ServerSideFilters> {
    forward_cutoff("changes-before", params)
}

fn last_updated_younger_than_or_equal_to(params: &FilterParams) -> Option<ServerSideFilters> {
    forward_cutoff("changes-since", params)
}

pub struct ServerMapping;

impl QueryMapping for ServerMapping {
    const RESOURCE: &'static str = "servers";

    type Prop = ServerProperties;
    type Record = Value;

    fn prop_mapping() -> QueryResult<PropHandler<ServerProperties, Value>> {
        PropHandler::new(
            ServerProperties::all()
                .iter()
                .map(|prop| (*prop, prop.prop_func())),
        )
    }

    fn client_side_handlers() -> QueryResult<Vec<ClientSideHandler<ServerProperties>>> {
        let text = PropSupport::Props(vec![
            ServerProperties::ServerName,
            ServerProperties::ServerDescription,
        ]);
        let dates = PropSupport::Props(vec![
            ServerProperties::ServerCreationDate,
            ServerProperties::ServerLastUpdatedDate,
        ]);

        Ok(vec![
            ClientSideHandler::generic(
                QueryPresets::in_category(PresetCategory::Generic)
                    .map(|preset| (preset, PropSupport::All)),
            )?,
            ClientSideHandler::string(vec![
                (QueryPresets::MatchesRegex, text.clone()),
                (QueryPresets::Contains, text),
            ])?,
            ClientSideHandler::datetime(
                QueryPresets::in_category(PresetCategory::DateTime)
                    .map(|preset| (preset, dates.clone())),
            )?,
        ])
    }

    fn server_side_handler() -> ServerSideHandler<ServerProperties> {
        ServerSideHandler::new(vec![
            (
                QueryPresets::EqualTo,
                vec![
                    (ServerProperties::UserId, user_id_equal_to as ServerSideFilterFunc),
                    (ServerProperties::ServerId, server_id_equal_to as ServerSideFilterFunc),
                    (ServerProperties::ServerName, server_name_equal_to as ServerSideFilterFunc),
                    (ServerProperties::ServerStatus, server_status_equal_to as ServerSideFilterFunc),
                    (ServerProperties::FlavorId, flavor_id_equal_to as ServerSideFilterFunc),
                    (ServerProperties::ImageId, image_id_equal_to as ServerSideFilterFunc),
                    (ServerProperties::ProjectId, project_id_equal_to as ServerSideFilterFunc),
                ],
            ),
            (
                QueryPresets::OlderThanOrEqualTo,
                vec![(
                    ServerProperties::ServerLastUpdatedDate,
                    last_updated_older_than_or_equal_to as ServerSideFilterFunc,
                )],
            ),
            (
                QueryPresets::YoungerThanOrEqualTo,
                vec![(
                    ServerProperties::ServerLastUpdatedDate,
                    last_updated_younger_than_or_equal_to as ServerSideFilterFunc,
                )],
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{assert_mapping_is_consistent, server_records};
    use oq_core::PropValue;
    use oq_queries::params::filter_params;
    use oq_queries::HandlerBase;
    use serde_json::json;

    #[test]
    fn test_mapping_is_consistent() {
        assert_mapping_is_consistent::<ServerMapping>();
    }

    #[test]
    fn test_prop_funcs() {
        let handler = ServerMapping::prop_mapping().unwrap();
        let record = &server_records()[0];
        assert_eq!(
            handler.get_prop(record, ServerProperties::ProjectId),
            Some(PropValue::from("project-1"))
        );
        assert_eq!(
            handler.get_prop(record, ServerProperties::HypervisorId),
            Some(PropValue::from("host-1"))
        );
        assert!(matches!(
            handler.get_prop(record, ServerProperties::ServerCreationDate),
            Some(PropValue::DateTime(_))
        ));
    }

    #[test]
    fn test_property_parsing() {
        assert_eq!(
            ServerProperties::from_string("server_name").unwrap(),
            ServerProperties::ServerName
        );
        let err = ServerProperties::from_string("server_colour").unwrap_err();
        assert!(err.to_string().contains("SERVER_NAME"));
    }

    #[test]
    fn test_server_status() {
        assert_eq!(ServerStatus::from_string("shutoff").unwrap(), ServerStatus::Shutoff);
        assert_eq!(ServerStatus::from_string("Error").unwrap(), ServerStatus::Error);
        assert!(ServerStatus::from_string("deleted").is_err());
        assert_eq!(ServerStatus::Active.to_string(), "ACTIVE");
    }

    #[test]
    fn test_server_side_equal_to() {
        let handler = ServerMapping::server_side_handler();
        let filters = handler
            .get_filters(
                QueryPresets::EqualTo,
                ServerProperties::ServerId,
                &filter_params(json!({"value": "abc"})),
            )
            .unwrap();
        assert_eq!(filters["uuid"], json!("abc"));

        let filters = handler
            .get_filters(
                QueryPresets::EqualTo,
                ServerProperties::ServerStatus,
                &filter_params(json!({"value": "shutoff"})),
            )
            .unwrap();
        assert_eq!(filters["status"], json!("SHUTOFF"));
    }

    #[test]
    fn test_unknown_status_stays_client_side() {
        let handler = ServerMapping::server_side_handler();
        assert!(handler
            .get_filters(
                QueryPresets::EqualTo,
                ServerProperties::ServerStatus,
                &filter_params(json!({"value": "BUILDING"})),
            )
            .is_none());
    }

    #[test]
    fn test_server_side_changes_since() {
        let handler = ServerMapping::server_side_handler();
        let params = filter_params(json!({"days": 3}));
        let since = handler
            .get_filters(
                QueryPresets::YoungerThanOrEqualTo,
                ServerProperties::ServerLastUpdatedDate,
                &params,
            )
            .unwrap();
        assert!(since.contains_key("changes-since"));

        let before = handler
            .get_filters(
                QueryPresets::OlderThanOrEqualTo,
                ServerProperties::ServerLastUpdatedDate,
                &params,
            )
            .unwrap();
        assert!(before.contains_key("changes-before"));

        assert!(!handler.check_supported(
            QueryPresets::OlderThan,
            ServerProperties::ServerLastUpdatedDate
        ));
    }

    #[test]
    fn test_no_integer_presets() {
        let handlers = ServerMapping::client_side_handlers().unwrap();
        for prop in ServerProperties::all() {
            assert!(!handlers
                .iter()
                .any(|h| h.check_supported(QueryPresets::LessThan, *prop)));
        }
    }
}
