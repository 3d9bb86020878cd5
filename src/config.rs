use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use validator::Validate;

use crate::dataset_catalog::DEFAULT_MAX_BROWSE_NODES;
use crate::join_planner::DEFAULT_DATASET;

/// Configuration errors
///
/// Unset environment variables fall back to their defaults; only values that
/// are present but malformed or out of range are errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Parse error for {field}: {value} - {source}")]
    Parse {
        field: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Planner configuration with validation
#[derive(Clone, Debug, Validate, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Dataset assumed for fields that do not name one
    #[validate(length(min = 1, message = "Default dataset cannot be empty"))]
    pub default_dataset: String,

    /// Fail planning instead of returning a truncated join order
    pub strict_join_order: bool,

    /// Maximum depth of the dataset browse tree
    #[validate(range(
        min = 1,
        max = 64,
        message = "Max browse depth must be between 1 and 64"
    ))]
    pub max_browse_depth: u32,

    /// Node budget of the dataset browse tree
    #[validate(range(
        min = 1,
        max = 1_000_000,
        message = "Max browse nodes must be between 1 and 1000000"
    ))]
    pub max_browse_nodes: usize,

    /// Default log filter when RUST_LOG is not set
    #[validate(length(min = 1, message = "Log level cannot be empty"))]
    pub log_level: String,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            default_dataset: DEFAULT_DATASET.to_string(),
            strict_join_order: false,
            max_browse_depth: 8,
            max_browse_nodes: DEFAULT_MAX_BROWSE_NODES,
            log_level: "info".to_string(),
        }
    }
}

impl PlannerConfig {
    /// Create configuration from environment variables with validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            default_dataset: env::var("JOINPLAN_DEFAULT_DATASET")
                .unwrap_or_else(|_| DEFAULT_DATASET.to_string()),
            strict_join_order: parse_env_var("JOINPLAN_STRICT_JOIN_ORDER", "false")?,
            max_browse_depth: parse_env_var("JOINPLAN_MAX_BROWSE_DEPTH", "8")?,
            max_browse_nodes: parse_env_var(
                "JOINPLAN_MAX_BROWSE_NODES",
                &DEFAULT_MAX_BROWSE_NODES.to_string(),
            )?,
            log_level: env::var("JOINPLAN_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from YAML file
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Parse {
            field: "yaml_file".to_string(),
            value: "file read failed".to_string(),
            source: Box::new(e),
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            field: "yaml_content".to_string(),
            value: content,
            source: Box::new(e),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply command line overrides, then validate again
    pub fn with_cli(mut self, cli: CliConfig) -> Result<Self, ConfigError> {
        if let Some(default_dataset) = cli.default_dataset {
            self.default_dataset = default_dataset;
        }
        if cli.strict_join_order {
            self.strict_join_order = true;
        }
        if let Some(depth) = cli.max_browse_depth {
            self.max_browse_depth = depth;
        }
        if let Some(nodes) = cli.max_browse_nodes {
            self.max_browse_nodes = nodes;
        }

        self.validate()?;
        Ok(self)
    }
}

/// CLI configuration (parsed from command line arguments)
#[derive(Clone, Debug, Default)]
pub struct CliConfig {
    pub default_dataset: Option<String>,
    pub strict_join_order: bool,
    pub max_browse_depth: Option<u32>,
    pub max_browse_nodes: Option<usize>,
}

/// Parse an environment variable with a default value
fn parse_env_var<T: std::str::FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    value.parse().map_err(|e| ConfigError::Parse {
        field: key.to_string(),
        value,
        source: Box::new(e),
    })
}
