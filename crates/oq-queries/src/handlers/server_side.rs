//! Server-side filter handler
//!
//! Translates a (preset, property, params) triple into the query parameters
//! the resource's listing call understands. A `None` from a mapping means
//! the request cannot be expressed server-side and the query falls back to
//! client-side filtering only.

use std::collections::HashMap;
use std::fmt;

use oq_core::PropEnum;
use serde_json::Value;
use tracing::debug;

use super::HandlerBase;
use crate::params::FilterParams;
use crate::presets::QueryPresets;

/// Parameters passed through to the listing call
pub type ServerSideFilters = serde_json::Map<String, Value>;

pub type ServerSideFilterFunc = fn(&FilterParams) -> Option<ServerSideFilters>;

pub struct ServerSideHandler<P: PropEnum> {
    filter_function_mappings: HashMap<QueryPresets, HashMap<P, ServerSideFilterFunc>>,
}

impl<P: PropEnum> ServerSideHandler<P> {
    pub fn new(
        mappings: impl IntoIterator<Item = (QueryPresets, Vec<(P, ServerSideFilterFunc)>)>,
    ) -> Self {
        let filter_function_mappings = mappings
            .into_iter()
            .map(|(preset, props)| (preset, props.into_iter().collect()))
            .collect();
        Self {
            filter_function_mappings,
        }
    }

    /// A handler that never produces server-side filters
    pub fn empty() -> Self {
        Self {
            filter_function_mappings: HashMap::new(),
        }
    }

    /// Server-side parameters for the request, if it can be expressed that way
    pub fn get_filters(
        &self,
        preset: QueryPresets,
        prop: P,
        params: &FilterParams,
    ) -> Option<ServerSideFilters> {
        let func = self.filter_function_mappings.get(&preset)?.get(&prop)?;
        let filters = func(params);
        if filters.is_none() {
            debug!(
                preset = %preset,
                prop = prop.name(),
                "Server-side mapping declined the given parameters"
            );
        }
        filters
    }
}

impl<P: PropEnum> HandlerBase<P> for ServerSideHandler<P> {
    fn check_supported(&self, preset: QueryPresets, prop: P) -> bool {
        self.filter_function_mappings
            .get(&preset)
            .map(|props| props.contains_key(&prop))
            .unwrap_or(false)
    }

    fn preset_known(&self, preset: QueryPresets) -> bool {
        self.filter_function_mappings.contains_key(&preset)
    }
}

impl<P: PropEnum> Default for ServerSideHandler<P> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<P: PropEnum> fmt::Debug for ServerSideHandler<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let presets: Vec<String> = self
            .filter_function_mappings
            .keys()
            .map(|p| p.to_string())
            .collect();
        f.debug_struct("ServerSideHandler")
            .field("presets", &presets)
            .finish()
    }
}

/// Filters holding a single key
pub fn single_filter(key: &str, value: impl Into<Value>) -> ServerSideFilters {
    let mut filters = ServerSideFilters::new();
    filters.insert(key.to_string(), value.into());
    filters
}
