//! # oq-resources
//!
//! Property tables and query mappings for the cloud resources the engine
//! can query:
//! - `server`: compute servers
//! - `user`: identity users
//! - `flavor`: compute flavors
//! - `project`: identity projects
//!
//! Each module defines the resource's property enum, the accessors that
//! read those properties out of listing records, and which presets the
//! resource supports client-side and server-side.

pub mod flavor;
pub mod project;
pub mod query_types;
pub mod record;
pub mod server;
pub mod user;

#[cfg(test)]
mod test_support;

pub use flavor::{FlavorMapping, FlavorProperties};
pub use project::{ProjectMapping, ProjectProperties};
pub use query_types::QueryTypes;
pub use server::{ServerMapping, ServerProperties, ServerStatus};
pub use user::{UserMapping, UserProperties};

use oq_core::QueryResult;
use oq_queries::QueryApi;

pub fn server_query() -> QueryResult<QueryApi<ServerMapping>> {
    QueryApi::new()
}

pub fn user_query() -> QueryResult<QueryApi<UserMapping>> {
    QueryApi::new()
}

pub fn flavor_query() -> QueryResult<QueryApi<FlavorMapping>> {
    QueryApi::new()
}

pub fn project_query() -> QueryResult<QueryApi<ProjectMapping>> {
    QueryApi::new()
}
