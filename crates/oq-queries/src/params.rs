//! Filter parameters and their schemas
//!
//! Callers configure a preset with a keyword-argument style map. Each
//! filter operator declares the parameters it takes, and the map is checked
//! against that declaration before the operator is built.

use serde_json::Value;

/// Keyword arguments for a preset
pub type FilterParams = serde_json::Map<String, Value>;

/// Turn a JSON object into filter params. Anything but an object yields
/// an empty map.
pub fn filter_params(value: Value) -> FilterParams {
    match value {
        Value::Object(map) => map,
        _ => FilterParams::new(),
    }
}

/// Expected type of a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Any,
    String,
    Integer,
    /// Integer or float
    Number,
    Bool,
    List,
}

impl ParamKind {
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::Any => true,
            Self::String => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Number => value.is_number(),
            Self::Bool => value.is_boolean(),
            Self::List => value.is_array(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Bool => "bool",
            Self::List => "list",
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

/// One declared parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub required: bool,
}

impl ParamSpec {
    pub const fn required(name: &'static str, kind: ParamKind) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, kind: ParamKind) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }
}

/// The parameters a filter operator accepts.
///
/// The value being filtered is never part of the schema; it is always
/// supplied by the property accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSchema {
    params: &'static [ParamSpec],
    /// Accepts arbitrary extra keyword arguments
    open: bool,
}

impl ParamSchema {
    /// Only the declared parameters are accepted
    pub const fn closed(params: &'static [ParamSpec]) -> Self {
        Self {
            params,
            open: false,
        }
    }

    /// Declared parameters are type checked, anything else passes through
    /// and required parameters may be left out.
    pub const fn open(params: &'static [ParamSpec]) -> Self {
        Self { params, open: true }
    }

    pub fn params(&self) -> &'static [ParamSpec] {
        self.params
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn required_params(&self) -> impl Iterator<Item = &'static str> {
        self.params.iter().filter(|p| p.required).map(|p| p.name)
    }

    /// Check `given` against the schema, returning the reason on failure
    pub fn validate(&self, given: &FilterParams) -> Result<(), String> {
        for param in self.params {
            match given.get(param.name) {
                Some(value) => {
                    if !param.kind.accepts(value) {
                        return Err(format!(
                            "{} given has incorrect type, expected {}, found {}",
                            param.name,
                            param.kind.as_str(),
                            json_type_name(value)
                        ));
                    }
                }
                None if param.required && !self.open => {
                    return Err(format!("{} expected but not given", param.name));
                }
                None => {}
            }
        }

        if !self.open {
            let unexpected: Vec<&str> = given
                .keys()
                .map(String::as_str)
                .filter(|key| !self.params.iter().any(|p| p.name == *key))
                .collect();
            if !unexpected.is_empty() {
                return Err(format!("unexpected arguments: '{}'", unexpected.join("', '")));
            }
        }

        Ok(())
    }
}
