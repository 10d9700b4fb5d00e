//! ChannelHub Configuration System
//!
//! TOML-based configuration with environment variable override support.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

mod loader;

pub use loader::ConfigLoader;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    #[error("Environment variable error: {0}")]
    EnvError(String),
}

/// Root application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub mongodb: MongoConfig,
    pub store: StoreConfig,
    pub identity: IdentityConfig,
    pub registry: RegistryConfig,

    /// Enable development mode
    pub dev_mode: bool,
}

/// MongoDB configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
    /// Collection holding subscription edges
    pub collection: String,
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            uri: "mongodb://localhost:27017".to_string(),
            database: "channelhub".to_string(),
            collection: "subscriptions".to_string(),
        }
    }
}

/// Backing store for subscription edges
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    Mongodb,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "mongodb" | "mongo" => Ok(Self::Mongodb),
            other => Err(ConfigError::ValidationError(format!(
                "unknown store backend '{}' (expected memory or mongodb)",
                other
            ))),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => f.write_str("memory"),
            Self::Mongodb => f.write_str("mongodb"),
        }
    }
}

/// Store selection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
}

/// How user and channel identifiers are recognised
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdentityFormat {
    /// 24 hex digit MongoDB ObjectId
    #[default]
    ObjectId,
    /// Anything matching `identity.pattern`
    Pattern,
}

impl FromStr for IdentityFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "object-id" | "objectid" => Ok(Self::ObjectId),
            "pattern" => Ok(Self::Pattern),
            other => Err(ConfigError::ValidationError(format!(
                "unknown identity format '{}' (expected object-id or pattern)",
                other
            ))),
        }
    }
}

/// Identity collaborator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    pub format: IdentityFormat,
    /// Regular expression used when `format = "pattern"`
    pub pattern: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            format: IdentityFormat::ObjectId,
            pattern: r"^[A-Za-z0-9_-]{1,64}$".to_string(),
        }
    }
}

/// Fewest lock stripes a deployed registry may run with.
pub const MIN_LOCK_STRIPES: usize = 8;

/// Registry concurrency settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Number of lock stripes serialising toggles per (subscriber, channel) pair
    pub lock_stripes: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self { lock_stripes: 64 }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration with environment variable override
    pub fn load() -> Result<Self, ConfigError> {
        ConfigLoader::new().load()
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.registry.lock_stripes < MIN_LOCK_STRIPES {
            return Err(ConfigError::ValidationError(format!(
                "registry.lock_stripes must be at least {}, got {}",
                MIN_LOCK_STRIPES, self.registry.lock_stripes
            )));
        }

        if self.identity.format == IdentityFormat::Pattern && self.identity.pattern.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "identity.pattern is required when identity.format = \"pattern\"".to_string(),
            ));
        }

        if self.store.backend == StoreBackend::Mongodb {
            if self.mongodb.uri.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "mongodb.uri is required for the mongodb backend".to_string(),
                ));
            }
            if self.mongodb.database.trim().is_empty() || self.mongodb.collection.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "mongodb.database and mongodb.collection must not be empty".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Generate an example TOML configuration
    pub fn example_toml() -> String {
        r#"# ChannelHub Configuration
# Environment variables (CHANNELHUB_*) override these settings

dev_mode = false

[store]
backend = "memory"  # memory or mongodb

[mongodb]
uri = "mongodb://localhost:27017"
database = "channelhub"
collection = "subscriptions"

[identity]
format = "object-id"  # object-id or pattern
pattern = "^[A-Za-z0-9_-]{1,64}$"

[registry]
lock_stripes = 64  # at least 8
"#
        .to_string()
    }
}
