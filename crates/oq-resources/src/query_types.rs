//! Resource kinds a query can be built for, looked up by name

use std::fmt;

use oq_core::{PropEnum, QueryError, QueryResult};

use crate::flavor::FlavorProperties;
use crate::project::ProjectProperties;
use crate::server::ServerProperties;
use crate::user::UserProperties;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryTypes {
    ServerQuery,
    UserQuery,
    FlavorQuery,
    ProjectQuery,
}

impl QueryTypes {
    pub const ALL: &'static [QueryTypes] = &[
        Self::ServerQuery,
        Self::UserQuery,
        Self::FlavorQuery,
        Self::ProjectQuery,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::ServerQuery => "SERVER_QUERY",
            Self::UserQuery => "USER_QUERY",
            Self::FlavorQuery => "FLAVOR_QUERY",
            Self::ProjectQuery => "PROJECT_QUERY",
        }
    }

    fn resource(&self) -> &'static str {
        match self {
            Self::ServerQuery => "server",
            Self::UserQuery => "user",
            Self::FlavorQuery => "flavor",
            Self::ProjectQuery => "project",
        }
    }

    /// Accepts `server_query`, `server`, `servers`, `query_servers` and
    /// `to_server_query` (likewise for the other kinds), in any case.
    pub fn from_string(value: &str) -> QueryResult<Self> {
        let wanted = value.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|kind| {
                let r = kind.resource();
                [
                    format!("{r}_query"),
                    r.to_string(),
                    format!("{r}s"),
                    format!("query_{r}s"),
                    format!("to_{r}_query"),
                ]
                .contains(&wanted)
            })
            .ok_or_else(|| {
                let available: Vec<&str> = Self::ALL.iter().map(|k| k.name()).collect();
                QueryError::parse_query(format!(
                    "Could not find query type '{}'. Available query types are {}",
                    value,
                    available.join(",")
                ))
            })
    }

    /// Names of the properties this kind of query can use
    pub fn property_names(&self) -> Vec<&'static str> {
        fn names<P: PropEnum>() -> Vec<&'static str> {
            P::all().iter().map(|p| p.name()).collect()
        }

        match self {
            Self::ServerQuery => names::<ServerProperties>(),
            Self::UserQuery => names::<UserProperties>(),
            Self::FlavorQuery => names::<FlavorProperties>(),
            Self::ProjectQuery => names::<ProjectProperties>(),
        }
    }
}

impl fmt::Display for QueryTypes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
