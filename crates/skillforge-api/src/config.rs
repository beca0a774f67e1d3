//! Server configuration
//!
//! Layers, lowest precedence first: built-in defaults, an optional TOML file,
//! then `SKILLFORGE_*` environment variables (`SKILLFORGE_SERVER__PORT=9000`).

use std::path::PathBuf;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use skillforge_cascade::CascadeConfig;
use skillforge_validation::QualityConfig;
use thiserror::Error;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "SKILLFORGE";

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "SKILLFORGE_CONFIG";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Configuration result type
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Name reported by `/health`
    #[serde(default = "default_service")]
    pub service: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8787
}

fn default_service() -> String {
    "skillforge-validator".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            service: default_service(),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub quality: QualityConfig,
    #[serde(default)]
    pub cascade: CascadeConfig,
}

/// Loads and validates [`AppConfig`]
pub struct ConfigManager {
    config_path: PathBuf,
    env_prefix: String,
}

impl ConfigManager {
    /// Manager reading the default config file location
    pub fn new() -> Self {
        Self::with_path(Self::default_config_path())
    }

    /// Manager reading a specific config file
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            config_path: path,
            env_prefix: ENV_PREFIX.to_string(),
        }
    }

    /// Honour `SKILLFORGE_CONFIG` when set
    pub fn from_env() -> Self {
        match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => Self::with_path(PathBuf::from(path)),
            None => Self::new(),
        }
    }

    fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("skillforge")
            .join("skillforge.toml")
    }

    /// Config file this manager reads
    pub fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    /// Load every layer and validate the result
    pub fn load(&self) -> Result<AppConfig> {
        let config = Config::builder()
            .add_source(File::from(self.config_path.clone()).required(false))
            .add_source(
                Environment::with_prefix(&self.env_prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let app_config: AppConfig = config.try_deserialize()?;
        Self::validate(&app_config)?;
        Ok(app_config)
    }

    /// Reject settings the server cannot run with
    pub fn validate(config: &AppConfig) -> Result<()> {
        if config.server.port == 0 {
            return Err(ConfigError::Validation(
                "Server port must be greater than 0".to_string(),
            ));
        }
        if config.quality.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "Quality timeout must be greater than 0".to_string(),
            ));
        }
        if config.quality.enabled && config.quality.endpoint.trim().is_empty() {
            return Err(ConfigError::Validation(
                "Quality endpoint is required when scoring is enabled".to_string(),
            ));
        }
        if config.cascade.info_ttl_secs <= 0 {
            return Err(ConfigError::Validation(
                "Cascade info TTL must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(ConfigManager::validate(&config).is_ok());
        assert_eq!(config.server.port, 8787);
        assert!(!config.quality.enabled);
        assert_eq!(config.cascade.debounce_ms, 500);
    }

    #[test]
    fn test_validation_rejects_zero_timeout() {
        let mut config = AppConfig::default();
        config.quality.timeout_secs = 0;
        assert!(matches!(
            ConfigManager::validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let manager = ConfigManager::with_path(PathBuf::from("/nonexistent/skillforge.toml"));
        let config = manager.load().unwrap();
        assert_eq!(config.server.service, "skillforge-validator");
    }
}
