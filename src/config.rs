use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub snapshot: SnapshotConfig,
    /// Registry connection parameters. Absent means snapshot-only resolution.
    #[serde(default)]
    pub registry: Option<RegistryConfig>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (default: 0.0.0.0)
    #[serde(default = "default_host")]
    pub host: String,
    /// HTTP port (default: 8000)
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotConfig {
    /// Path to the local model bundle
    #[serde(default = "default_snapshot_path")]
    pub path: PathBuf,
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("models/model.json")
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            path: default_snapshot_path(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegistryConfig {
    /// Registry REST endpoint, e.g. "http://mlflow:5000"
    pub endpoint: String,
    /// Registered model name to resolve
    pub model_name: String,
    /// Deployment stage to resolve, e.g. "Production"
    pub stage: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable JSON formatted logs
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Load configuration from files and environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            // Start with default values
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("snapshot.path", "models/model.json")?
            // Load default config file
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Load environment-specific config (e.g., config/production.toml)
            .add_source(
                File::from(config_dir.join(
                    std::env::var("INFERD_ENV").unwrap_or_else(|_| "development".to_string()),
                ))
                .required(false),
            )
            // Override with environment variables (INFERD_REGISTRY__ENDPOINT, etc.)
            .add_source(
                Environment::with_prefix("INFERD")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.snapshot.path.as_os_str().is_empty() {
            errors.push("snapshot.path must not be empty".to_string());
        }

        if let Some(registry) = &self.registry {
            if registry.endpoint.trim().is_empty() {
                errors.push("registry.endpoint must not be empty".to_string());
            }
            if registry.model_name.trim().is_empty() {
                errors.push("registry.model_name must not be empty".to_string());
            }
            if registry.stage.trim().is_empty() {
                errors.push("registry.stage must not be empty".to_string());
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_config_files() {
        let cfg = AppConfig::load_from("nonexistent-config-dir").expect("defaults should load");
        assert_eq!(cfg.server.port, 8000);
        assert_eq!(cfg.snapshot.path, PathBuf::from("models/model.json"));
        assert!(cfg.registry.is_none());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn empty_registry_fields_fail_validation() {
        let cfg = AppConfig {
            server: ServerConfig::default(),
            snapshot: SnapshotConfig::default(),
            registry: Some(RegistryConfig {
                endpoint: "http://mlflow:5000".to_string(),
                model_name: "  ".to_string(),
                stage: "Production".to_string(),
            }),
            logging: LoggingConfig::default(),
        };

        let errors = cfg.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("model_name"));
    }
}
