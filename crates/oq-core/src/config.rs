//! Configuration types and loading

use serde::{Deserialize, Serialize};

use crate::error::{QueryError, QueryResult};

/// Engine configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct QueryConfig {
    pub logging: LogConfig,
    pub output: OutputConfig,
    /// clouds.yaml account handed to the listing collaborator
    pub cloud_account: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive
    pub filter: String,
    /// Emit JSON lines instead of human readable output
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info,oq_queries=info".to_string(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Rendered in place of a property a record does not have
    pub missing_value: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Table,
            missing_value: "Not Found".to_string(),
        }
    }
}

/// How query results are rendered
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Table,
    Html,
    Json,
}

impl OutputFormat {
    pub fn from_string(value: &str) -> QueryResult<Self> {
        match value.trim().to_lowercase().as_str() {
            "table" | "string" | "to_string" => Ok(Self::Table),
            "html" | "to_html" => Ok(Self::Html),
            "json" | "to_json" => Ok(Self::Json),
            _ => Err(QueryError::parse_query(format!(
                "Could not convert '{}' into an output format. Available formats are table,html,json",
                value
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Html => "html",
            Self::Json => "json",
        }
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Environment variable not set: {0}")]
    MissingEnvVar(String),
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

pub const ENV_LOG: &str = "OPENSTACK_QUERY_LOG";
pub const ENV_LOG_JSON: &str = "OPENSTACK_QUERY_LOG_JSON";
pub const ENV_OUTPUT: &str = "OPENSTACK_QUERY_OUTPUT";
pub const ENV_MISSING_VALUE: &str = "OPENSTACK_QUERY_MISSING_VALUE";
pub const ENV_CLOUD_ACCOUNT: &str = "OPENSTACK_QUERY_CLOUD_ACCOUNT";

impl QueryConfig {
    /// Load `.env` if present, then read the environment
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup, starting from defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(filter) = lookup(ENV_LOG) {
            config.logging.filter = filter;
        }
        if let Some(json) = lookup(ENV_LOG_JSON) {
            config.logging.json = parse_bool(ENV_LOG_JSON, &json)?;
        }

        if let Some(format) = lookup(ENV_OUTPUT) {
            config.output.format =
                OutputFormat::from_string(&format).map_err(|e| ConfigError::InvalidValue {
                    key: ENV_OUTPUT.to_string(),
                    message: e.to_string(),
                })?;
        }
        if let Some(missing) = lookup(ENV_MISSING_VALUE) {
            config.output.missing_value = missing;
        }

        config.cloud_account = lookup(ENV_CLOUD_ACCOUNT).filter(|account| !account.is_empty());

        Ok(config)
    }

    /// The cloud account, which listing cannot proceed without
    pub fn require_cloud_account(&self) -> Result<&str, ConfigError> {
        self.cloud_account
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar(ENV_CLOUD_ACCOUNT.to_string()))
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("expected a boolean, found '{}'", other),
        }),
    }
}
