use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use validator::Validate;

/// Ten years, the longest TTL a relation type may default to
pub const MAX_DEFAULT_TTL_SECS: u32 = 10 * 365 * 24 * 60 * 60;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("Parse error for {field}: {value} - {source}")]
    Parse {
        field: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Resolver configuration with validation
#[derive(Clone, Debug, PartialEq, Eq, Validate, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Whether `reset_cache()` also drops the memoized consistency modifier and TTL.
    /// When false, those stay fixed for the lifetime of a relation type instance
    /// and only the key-index memo follows the cache epoch.
    pub reset_policy_memo: bool,

    /// Whether a relation index variant without its own modifiers inherits
    /// consistency and TTL from its base type
    pub inherit_base_policy: bool,

    /// TTL applied when no type modifier defines one (0 = no expiry)
    #[validate(range(
        max = 315360000,
        message = "Default TTL must not exceed ten years"
    ))]
    pub default_ttl_secs: u32,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            reset_policy_memo: true,
            inherit_base_policy: true,
            default_ttl_secs: 0,
        }
    }
}

impl ResolverConfig {
    /// Create configuration from environment variables with validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            reset_policy_memo: parse_env_var("TYPEGRAPH_RESET_POLICY_MEMO", "true")?,
            inherit_base_policy: parse_env_var("TYPEGRAPH_INHERIT_BASE_POLICY", "true")?,
            default_ttl_secs: parse_env_var("TYPEGRAPH_DEFAULT_TTL_SECS", "0")?,
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

        Self::from_yaml_str(&content)
    }

    /// Create configuration from a YAML string
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content).map_err(|e| ConfigError::Parse {
            field: "yaml_content".to_string(),
            value: content.to_string(),
            source: Box::new(e),
        })?;

        config.validate()?;
        Ok(config)
    }
}

/// Parse an environment variable with a default value.
///
/// An unset variable takes the default; one set to non-UTF-8 bytes is an error.
fn parse_env_var<T: std::str::FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = match env::var(key) {
        Ok(value) => value,
        Err(env::VarError::NotPresent) => default.to_string(),
        Err(e) => return Err(e.into()),
    };
    value.parse().map_err(|e| ConfigError::Parse {
        field: key.to_string(),
        value,
        source: Box::new(e),
    })
}
