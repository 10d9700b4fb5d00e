//! Configuration loader with file and environment variable support

use crate::{AppConfig, ConfigError};
use std::env;
use std::path::PathBuf;
use tracing::info;

/// Standard config file search paths
const CONFIG_PATHS: &[&str] = &[
    "config.toml",
    "channelhub.toml",
    "./config/config.toml",
    "./config/channelhub.toml",
    "/etc/channelhub/config.toml",
];

/// Configuration loader
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    search_standard_paths: bool,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self {
            config_path: None,
            search_standard_paths: true,
        }
    }

    /// Create a loader with a specific config file path
    pub fn with_path<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            config_path: Some(path.into()),
            search_standard_paths: true,
        }
    }

    /// Skip the standard search paths (explicit path and env var only).
    pub fn without_standard_paths(mut self) -> Self {
        self.search_standard_paths = false;
        self
    }

    /// Load configuration from file (if found) with environment variable overrides
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        let mut config = match self.find_config_file() {
            Some(path) => {
                info!(?path, "Loading configuration from file");
                AppConfig::from_file(&path)?
            }
            None => AppConfig::default(),
        };

        self.apply_env_overrides(&mut config)?;
        config.validate()?;

        Ok(config)
    }

    /// Find the configuration file to use
    fn find_config_file(&self) -> Option<PathBuf> {
        if let Some(path) = &self.config_path {
            if path.exists() {
                return Some(path.clone());
            }
        }

        if let Ok(path) = env::var("CHANNELHUB_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        if !self.search_standard_paths {
            return None;
        }

        CONFIG_PATHS
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&self, config: &mut AppConfig) -> Result<(), ConfigError> {
        // MongoDB
        if let Ok(val) = env::var("CHANNELHUB_MONGODB_URI") {
            config.mongodb.uri = val;
        }
        if let Ok(val) = env::var("CHANNELHUB_MONGODB_DATABASE") {
            config.mongodb.database = val;
        }
        if let Ok(val) = env::var("CHANNELHUB_MONGODB_COLLECTION") {
            config.mongodb.collection = val;
        }

        // Store
        if let Ok(val) = env::var("CHANNELHUB_STORE_BACKEND") {
            config.store.backend = val
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("CHANNELHUB_STORE_BACKEND: {}", e)))?;
        }

        // Identity
        if let Ok(val) = env::var("CHANNELHUB_IDENTITY_FORMAT") {
            config.identity.format = val
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("CHANNELHUB_IDENTITY_FORMAT: {}", e)))?;
        }
        if let Ok(val) = env::var("CHANNELHUB_IDENTITY_PATTERN") {
            config.identity.pattern = val;
        }

        // Registry
        if let Ok(val) = env::var("CHANNELHUB_REGISTRY_LOCK_STRIPES") {
            config.registry.lock_stripes = val.parse().map_err(|_| {
                ConfigError::EnvError(format!(
                    "CHANNELHUB_REGISTRY_LOCK_STRIPES must be a positive integer, got '{}'",
                    val
                ))
            })?;
        }

        // General
        if let Ok(val) = env::var("CHANNELHUB_DEV_MODE") {
            config.dev_mode = val.parse().unwrap_or(false);
        }

        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{IdentityFormat, StoreBackend};
    use std::io::Write;

    #[test]
    fn test_load_from_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[store]
backend = "mongodb"

[mongodb]
database = "hub_test"

[identity]
format = "pattern"
pattern = "^c[0-9]+$"

[registry]
lock_stripes = 8
"#
        )
        .unwrap();

        let config = ConfigLoader::with_path(file.path())
            .without_standard_paths()
            .load()
            .unwrap();

        assert_eq!(config.store.backend, StoreBackend::Mongodb);
        assert_eq!(config.mongodb.database, "hub_test");
        assert_eq!(config.identity.format, IdentityFormat::Pattern);
        assert_eq!(config.registry.lock_stripes, 8);
    }

    #[test]
    fn test_missing_explicit_path_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigLoader::with_path(dir.path().join("absent.toml"))
            .without_standard_paths()
            .load();

        // CHANNELHUB_CONFIG may be set in the environment; only assert when it is not.
        if env::var("CHANNELHUB_CONFIG").is_err() {
            let config = config.unwrap();
            assert_eq!(config.mongodb.collection, "subscriptions");
        }
    }

    #[test]
    fn test_invalid_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[registry]\nlock_stripes = \"many\"").unwrap();

        let result = ConfigLoader::with_path(file.path())
            .without_standard_paths()
            .load();
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_zero_stripes_in_file_fails_validation() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[registry]\nlock_stripes = 0").unwrap();

        let result = ConfigLoader::with_path(file.path())
            .without_standard_paths()
            .load();
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }
}
