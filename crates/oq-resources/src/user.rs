//! Users
//!
//! Records are identity user objects. Users carry no numeric properties,
//! so integer presets are not available.

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
pub enum UserProperties {
    UserDomainId,
    UserDescription,
    UserEmail,
    UserId,
    UserName,
}

impl PropEnum for UserProperties {
    fn all() -> &'static [Self] {
        &[
            Self::UserDomainId,
            Self::UserDescription,
            Self::UserEmail,
            Self::UserId,
            Self::UserName,
        ]
    }

    fn name(&self) -> &'static str {
        match self {
            Self::UserDomainId => "USER_DOMAIN_ID",
            Self::UserDescription => "USER_DESCRIPTION",
            Self::UserEmail => "USER_EMAIL",
            Self::UserId => "USER_ID",
            Self::UserName => "USER_NAME",
        }
    }
}

impl UserProperties {
    pub fn prop_func(&self) -> PropFunc<Value> {
        match self {
            Self::UserDomainId => |r| field(r, "domain_id"),
            Self::UserDescription => |r| field(r, "description"),
            Self::UserEmail => |r| field(r, "email"),
            Self::UserId => |r| field(r, "id"),
            Self::UserName => |r| field(r, "name"),
        }
    }
}

fn domain_id_equal_to(params: &FilterParams) -> Option<ServerSideFilters> {
    forward_value("domain_id", params)
}

fn name_equal_to(params: &FilterParams) -> Option<ServerSideFilters> {
    forward_value("name", params)
}

pub struct UserMapping;

impl QueryMapping for UserMapping {
    const RESOURCE: &'static str = "users";

    type Prop = UserProperties;
    type Record = Value;

    fn prop_mapping() -> QueryResult<PropHandler<UserProperties, Value>> {
        PropHandler::new(UserProperties::all().iter().map(|p| (*p, p.prop_func())))
    }

    fn client_side_handlers() -> QueryResult<Vec<ClientSideHandler<UserProperties>>> {
        let text = PropSupport::Props(vec![
            UserProperties::UserName,
            UserProperties::UserEmail,
            UserProperties::UserDescription,
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

    fn server_side_handler() -> ServerSideHandler<UserProperties> {
        ServerSideHandler::new(vec![(
            QueryPresets::EqualTo,
            vec![
                (UserProperties::UserDomainId, domain_id_equal_to as ServerSideFilterFunc),
                (UserProperties::UserName, name_equal_to as ServerSideFilterFunc),
            ],
        )])
    }
}
