//! Core error types for the query engine
//!
//! Every variant except `Listing` is a configuration or usage error raised
//! before any record is touched. None of them are transient.

use thiserror::Error;

use crate::config::ConfigError;

/// Standard Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;

/// Core error type for all query operations
#[derive(Error, Debug)]
pub enum QueryError {
    /// A property has no accessor, or a resource's property table is
    /// missing one of its own members.
    #[error("Property mapping error: {message}")]
    PropertyMapping { message: String },

    /// A preset/property pair has no handler, is not valid for the
    /// property, or its arguments failed validation.
    #[error("Preset mapping error: {message}")]
    PresetMapping { message: String },

    /// Structural misuse of the query API or unparseable input text.
    #[error("Parse query error: {message}")]
    ParseQuery { message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The external listing collaborator failed.
    #[error("Listing error: {0}")]
    Listing(#[source] anyhow::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl QueryError {
    pub fn property_mapping(message: impl Into<String>) -> Self {
        Self::PropertyMapping {
            message: message.into(),
        }
    }

    pub fn preset_mapping(message: impl Into<String>) -> Self {
        Self::PresetMapping {
            message: message.into(),
        }
    }

    pub fn parse_query(message: impl Into<String>) -> Self {
        Self::ParseQuery {
            message: message.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            QueryError::PropertyMapping { .. } => "property_mapping_error",
            QueryError::PresetMapping { .. } => "preset_mapping_error",
            QueryError::ParseQuery { .. } => "parse_query_error",
            QueryError::Config(_) => "configuration_error",
            QueryError::Listing(_) => "listing_error",
            QueryError::Serialization(_) => "serialization_error",
        }
    }

    /// Errors caused by how the engine was wired up rather than by what the
    /// caller asked for.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            QueryError::PropertyMapping { .. } | QueryError::Config(_)
        )
    }
}
