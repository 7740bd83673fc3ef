//! # oq-queries
//!
//! Query engine for filtering, sorting, grouping and projecting resource
//! records.
//!
//! ## Structure
//!
//! - `props` - Property registry mapping each property to its accessor
//! - `presets` - Filter presets and their categories
//! - `params` - Filter parameters and the schemas they are checked against
//! - `filters` - Built-in filter operators, one per preset
//! - `handlers` - Client-side and server-side preset handlers
//! - `builder` - Resolves a filter into a local predicate and server-side filters
//! - `sorts` - Sort orders and sort specs
//! - `parser` - Sorting and grouping of results
//! - `output` - Property selection and rendering
//! - `api` - The query façade tying it all together
//!
//! ## Example
//!
//! ```
//! use oq_queries::params::filter_params;
//! use oq_queries::presets::QueryPresets;
//! use serde_json::json;
//!
//! let preset = QueryPresets::from_string("older_than").unwrap();
//! assert_eq!(preset, QueryPresets::OlderThan);
//!
//! let params = filter_params(json!({"days": 7}));
//! assert_eq!(params["days"], json!(7));
//! ```

pub mod api;
pub mod builder;
pub mod filters;
pub mod handlers;
pub mod output;
pub mod params;
pub mod parser;
pub mod presets;
pub mod props;
pub mod sorts;

#[cfg(test)]
mod test_support;

// Re-exports for convenience
pub use api::{ListingScope, QueryApi, QueryMapping, ResourceLister};
pub use builder::QueryBuilder;
pub use handlers::{ClientSideHandler, HandlerBase, PropSupport, ServerSideFilters, ServerSideHandler};
pub use output::{PropRow, PropsOutput, QueryOutput};
pub use params::{filter_params, FilterParams};
pub use parser::{GroupedResults, ParsedResults, QueryParser};
pub use presets::{PresetCategory, QueryPresets};
pub use props::{PropFunc, PropHandler};
pub use sorts::{SortCriterion, SortOrder, SortSpec};
