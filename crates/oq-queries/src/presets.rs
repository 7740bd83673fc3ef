//! Query Presets
//!
//! A preset is a named filter operator ("older than", "any in", ...).
//! Presets are grouped by the kind of operand they work on; each group is
//! served by its own client-side handler.

use std::fmt;

use oq_core::{QueryError, QueryResult};

/// Operand category a preset works over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PresetCategory {
    /// Equality and membership, valid for any value
    Generic,
    /// Text matching
    String,
    /// Relative age of a timestamp
    DateTime,
    /// Numeric comparison
    Integer,
}

impl PresetCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::String => "string",
            Self::DateTime => "datetime",
            Self::Integer => "integer",
        }
    }
}

/// Filter operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryPresets {
    EqualTo,
    NotEqualTo,
    AnyIn,
    NotAnyIn,
    MatchesRegex,
    Contains,
    OlderThan,
    OlderThanOrEqualTo,
    YoungerThan,
    YoungerThanOrEqualTo,
    LessThan,
    LessThanOrEqualTo,
    GreaterThan,
    GreaterThanOrEqualTo,
}

impl QueryPresets {
    pub const ALL: &'static [QueryPresets] = &[
        Self::EqualTo,
        Self::NotEqualTo,
        Self::AnyIn,
        Self::NotAnyIn,
        Self::MatchesRegex,
        Self::Contains,
        Self::OlderThan,
        Self::OlderThanOrEqualTo,
        Self::YoungerThan,
        Self::YoungerThanOrEqualTo,
        Self::LessThan,
        Self::LessThanOrEqualTo,
        Self::GreaterThan,
        Self::GreaterThanOrEqualTo,
    ];

    pub fn category(&self) -> PresetCategory {
        match self {
            Self::EqualTo | Self::NotEqualTo | Self::AnyIn | Self::NotAnyIn => {
                PresetCategory::Generic
            }
            Self::MatchesRegex | Self::Contains => PresetCategory::String,
            Self::OlderThan
            | Self::OlderThanOrEqualTo
            | Self::YoungerThan
            | Self::YoungerThanOrEqualTo => PresetCategory::DateTime,
            Self::LessThan
            | Self::LessThanOrEqualTo
            | Self::GreaterThan
            | Self::GreaterThanOrEqualTo => PresetCategory::Integer,
        }
    }

    /// All presets of one category, in declaration order
    pub fn in_category(category: PresetCategory) -> impl Iterator<Item = QueryPresets> {
        Self::ALL
            .iter()
            .copied()
            .filter(move |preset| preset.category() == category)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::EqualTo => "EQUAL_TO",
            Self::NotEqualTo => "NOT_EQUAL_TO",
            Self::AnyIn => "ANY_IN",
            Self::NotAnyIn => "NOT_ANY_IN",
            Self::MatchesRegex => "MATCHES_REGEX",
            Self::Contains => "CONTAINS",
            Self::OlderThan => "OLDER_THAN",
            Self::OlderThanOrEqualTo => "OLDER_THAN_OR_EQUAL_TO",
            Self::YoungerThan => "YOUNGER_THAN",
            Self::YoungerThanOrEqualTo => "YOUNGER_THAN_OR_EQUAL_TO",
            Self::LessThan => "LESS_THAN",
            Self::LessThanOrEqualTo => "LESS_THAN_OR_EQUAL_TO",
            Self::GreaterThan => "GREATER_THAN",
            Self::GreaterThanOrEqualTo => "GREATER_THAN_OR_EQUAL_TO",
        }
    }

    /// Parse a preset name.
    ///
    /// Case and separators are ignored, so `older_than`, `OLDER-THAN` and
    /// `OlderThan` are all accepted.
    pub fn from_string(value: &str) -> QueryResult<Self> {
        let wanted = normalise(value);
        Self::ALL
            .iter()
            .copied()
            .find(|preset| normalise(preset.name()) == wanted)
            .ok_or_else(|| {
                let available: Vec<&str> = Self::ALL.iter().map(|p| p.name()).collect();
                QueryError::parse_query(format!(
                    "Could not find preset '{}'. Available presets are {}",
                    value,
                    available.join(",")
                ))
            })
    }
}

fn normalise(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_uppercase)
        .collect()
}

impl fmt::Display for QueryPresets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
