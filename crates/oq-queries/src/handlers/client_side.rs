//! Client-side filter handler
//!
//! Holds the operators for one preset category and the table of which
//! properties each preset may be applied to for a given resource.

use std::collections::HashMap;
use std::fmt;

use oq_core::{PropEnum, QueryError, QueryResult};
use tracing::{debug, error};

use super::{HandlerBase, PropSupport};
use crate::filters::{filter_table, FilterSpec};
use crate::params::FilterParams;
use crate::presets::{PresetCategory, QueryPresets};
use crate::props::PropFunc;

/// Predicate over whole records, safe to apply to any record
pub type ClientSideFilterFunc<R> = Box<dyn Fn(&R) -> bool + Send + Sync>;

pub struct ClientSideHandler<P: PropEnum> {
    name: &'static str,
    filter_functions: HashMap<QueryPresets, FilterSpec>,
    filter_function_mappings: HashMap<QueryPresets, PropSupport<P>>,
}

impl<P: PropEnum> ClientSideHandler<P> {
    /// Handler for the built-in operators of `category`.
    ///
    /// Each mapping names a preset and the properties it supports for this
    /// resource. Naming a preset the category has no operator for is a
    /// wiring mistake and fails here rather than at query time.
    pub fn new(
        category: PresetCategory,
        mappings: impl IntoIterator<Item = (QueryPresets, PropSupport<P>)>,
    ) -> QueryResult<Self> {
        let filter_functions = filter_table(category);
        let mut filter_function_mappings = HashMap::new();

        for (preset, support) in mappings {
            if !filter_functions.contains_key(&preset) {
                return Err(QueryError::preset_mapping(format!(
                    "the {} handler has no filter function for preset '{}'",
                    category.as_str(),
                    preset
                )));
            }
            filter_function_mappings.insert(preset, support);
        }

        Ok(Self {
            name: category.as_str(),
            filter_functions,
            filter_function_mappings,
        })
    }

    pub fn generic(
        mappings: impl IntoIterator<Item = (QueryPresets, PropSupport<P>)>,
    ) -> QueryResult<Self> {
        Self::new(PresetCategory::Generic, mappings)
    }

    pub fn string(
        mappings: impl IntoIterator<Item = (QueryPresets, PropSupport<P>)>,
    ) -> QueryResult<Self> {
        Self::new(PresetCategory::String, mappings)
    }

    pub fn datetime(
        mappings: impl IntoIterator<Item = (QueryPresets, PropSupport<P>)>,
    ) -> QueryResult<Self> {
        Self::new(PresetCategory::DateTime, mappings)
    }

    pub fn integer(
        mappings: impl IntoIterator<Item = (QueryPresets, PropSupport<P>)>,
    ) -> QueryResult<Self> {
        Self::new(PresetCategory::Integer, mappings)
    }

    /// Register an operator of your own, replacing any built-in one for
    /// the same preset.
    pub fn with_filter(mut self, preset: QueryPresets, spec: FilterSpec, support: PropSupport<P>) -> Self {
        self.filter_functions.insert(preset, spec);
        self.filter_function_mappings.insert(preset, support);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Build a record predicate for `preset` applied to `prop`.
    ///
    /// `prop_func` extracts the property; records without it are rejected
    /// without running the operator.
    pub fn get_filter_func<R: 'static>(
        &self,
        preset: QueryPresets,
        prop: P,
        prop_func: PropFunc<R>,
        params: &FilterParams,
    ) -> QueryResult<ClientSideFilterFunc<R>> {
        let spec = match self.filter_functions.get(&preset) {
            Some(spec) if self.check_supported(preset, prop) => spec,
            _ => {
                if self.preset_known(preset) {
                    error!(
                        handler = self.name,
                        preset = %preset,
                        prop = prop.name(),
                        "Preset is not compatible with property - e.g. LESS_THAN on a text property"
                    );
                } else {
                    error!(
                        handler = self.name,
                        preset = %preset,
                        prop = prop.name(),
                        "Handler has no mapping for preset - check the resource's client-side handlers"
                    );
                }
                return Err(QueryError::preset_mapping(format!(
                    "Preset Not Found: failed to find filter function mapping for preset '{}' and property '{}' - does the preset work with the property specified?",
                    preset,
                    prop.name()
                )));
            }
        };

        debug!(
            filter = spec.name,
            preset = %preset,
            prop = prop.name(),
            "Found client-side filter function"
        );

        let value_filter = spec.build_filter(params).map_err(|reason| {
            QueryError::preset_mapping(format!(
                "Preset Argument Error: failed to build client-side filter function for preset:prop '{}':'{}' reason: {}",
                preset,
                prop.name(),
                reason
            ))
        })?;

        Ok(Box::new(move |record: &R| match prop_func(record) {
            Some(value) => value_filter(&value),
            None => false,
        }))
    }
}

impl<P: PropEnum> HandlerBase<P> for ClientSideHandler<P> {
    fn check_supported(&self, preset: QueryPresets, prop: P) -> bool {
        self.filter_function_mappings
            .get(&preset)
            .map(|support| support.supports(&prop))
            .unwrap_or(false)
    }

    fn preset_known(&self, preset: QueryPresets) -> bool {
        self.filter_function_mappings.contains_key(&preset)
    }
}

impl<P: PropEnum> fmt::Debug for ClientSideHandler<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientSideHandler")
            .field("name", &self.name)
            .field("mappings", &self.filter_function_mappings)
            .finish()
    }
}
