//! Core traits shared by the engine and the resource tables

use std::fmt::Debug;
use std::hash::Hash;

use crate::error::{QueryError, QueryResult};

/// A closed, resource-specific enumeration of queryable properties.
///
/// Implemented once per resource type (servers, users, ...). The engine
/// never looks at record fields directly; it only knows property enums and
/// the accessors registered for them.
pub trait PropEnum: Copy + Eq + Hash + Debug + Send + Sync + 'static {
    /// Every member, in declaration order
    fn all() -> &'static [Self];

    /// Upper snake case name, e.g. `SERVER_NAME`
    fn name(&self) -> &'static str;

    /// Case-insensitive lookup by name
    fn from_string(value: &str) -> QueryResult<Self> {
        let wanted = value.trim().to_uppercase();
        Self::all()
            .iter()
            .copied()
            .find(|prop| prop.name() == wanted)
            .ok_or_else(|| {
                let available: Vec<&str> = Self::all().iter().map(|p| p.name()).collect();
                QueryError::parse_query(format!(
                    "Could not find property '{}'. Available properties are {}",
                    value,
                    available.join(",")
                ))
            })
    }
}
