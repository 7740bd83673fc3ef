//! Property registry
//!
//! Maps every member of a resource's property enum to the accessor that
//! reads it from a record.

use std::collections::HashMap;
use std::fmt;

use oq_core::{PropEnum, PropValue, QueryError, QueryResult};
use tracing::error;

/// Reads one property from a record. `None` means the record does not
/// carry the property at all.
pub type PropFunc<R> = fn(&R) -> Option<PropValue>;

/// Property accessors for one resource type
pub struct PropHandler<P: PropEnum, R> {
    mappings: HashMap<P, PropFunc<R>>,
}

impl<P: PropEnum, R> PropHandler<P, R> {
    /// Build the registry, checking it is exhaustive.
    ///
    /// Every member of `P::all()` must be mapped exactly once.
    pub fn new(mappings: impl IntoIterator<Item = (P, PropFunc<R>)>) -> QueryResult<Self> {
        let mut table = HashMap::new();
        for (prop, func) in mappings {
            if table.insert(prop, func).is_some() {
                return Err(QueryError::property_mapping(format!(
                    "property '{}' has more than one accessor",
                    prop.name()
                )));
            }
        }

        if let Some(missing) = P::all().iter().find(|prop| !table.contains_key(*prop)) {
            error!(
                prop = missing.name(),
                "No accessor registered for property - add one to the resource's property table"
            );
            return Err(QueryError::property_mapping(format!(
                "no accessor defined for property '{}'",
                missing.name()
            )));
        }

        Ok(Self { mappings: table })
    }

    pub fn get_prop_func(&self, prop: P) -> QueryResult<PropFunc<R>> {
        self.mappings.get(&prop).copied().ok_or_else(|| {
            QueryError::property_mapping(format!(
                "failed to get property mapping, property '{}' is not supported",
                prop.name()
            ))
        })
    }

    pub fn check_supported(&self, prop: P) -> bool {
        self.mappings.contains_key(&prop)
    }

    /// Read a property, `None` if unsupported or absent from the record
    pub fn get_prop(&self, record: &R, prop: P) -> Option<PropValue> {
        self.mappings.get(&prop).and_then(|func| func(record))
    }

    pub fn all_props(&self) -> &'static [P] {
        P::all()
    }
}

impl<P: PropEnum, R> Clone for PropHandler<P, R> {
    fn clone(&self) -> Self {
        Self {
            mappings: self.mappings.clone(),
        }
    }
}

impl<P: PropEnum, R> fmt::Debug for PropHandler<P, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let props: Vec<&str> = P::all()
            .iter()
            .filter(|p| self.mappings.contains_key(*p))
            .map(|p| p.name())
            .collect();
        f.debug_struct("PropHandler").field("props", &props).finish()
    }
}
