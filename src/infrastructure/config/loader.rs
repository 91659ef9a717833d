//! Hierarchical configuration loading and validation.

use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use super::settings::GatewaySettings;

/// Errors raised while loading or validating gateway configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to extract configuration: {0}")]
    Extraction(#[from] figment::Error),

    #[error("invalid max_instances: {0}, must be between 1 and 50")]
    InvalidMaxInstances(usize),

    #[error("invalid log_level: {0}, must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("invalid log_format: {0}, must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("data_dir cannot be empty")]
    EmptyDataDir,

    #[error("invalid bind_addr: {0}")]
    InvalidBindAddr(String),

    #[error("namespace cannot be empty")]
    EmptyNamespace,
}

/// Loads `GatewaySettings` with the following precedence (lowest to
/// highest): programmatic defaults, an optional `config.yaml` in the
/// current directory (development convenience only), then environment
/// variables using their exact names from the external interface
/// table — `NAMESPACE`, `SEACLAW_IMAGE`, `MAX_INSTANCES`, `DATA_DIR`,
/// `LOG_LEVEL`, plus the ambient `BIND_ADDR`, `LOG_FORMAT`,
/// `AGENT_PORT`, `REQUEST_TIMEOUT_SECS`, `PERSONA_DIR`.
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load() -> Result<GatewaySettings, ConfigError> {
        let settings: GatewaySettings = Figment::new()
            .merge(Serialized::defaults(GatewaySettings::default()))
            .merge(Yaml::file("config.yaml"))
            .merge(Env::raw())
            .extract()?;

        Self::validate(&settings)?;
        Ok(settings)
    }

    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<GatewaySettings, ConfigError> {
        let settings: GatewaySettings = Figment::new()
            .merge(Serialized::defaults(GatewaySettings::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::raw())
            .extract()?;

        Self::validate(&settings)?;
        Ok(settings)
    }

    pub fn validate(settings: &GatewaySettings) -> Result<(), ConfigError> {
        if settings.namespace.trim().is_empty() {
            return Err(ConfigError::EmptyNamespace);
        }
        if settings.data_dir.trim().is_empty() {
            return Err(ConfigError::EmptyDataDir);
        }
        if settings.max_instances == 0 || settings.max_instances > 50 {
            return Err(ConfigError::InvalidMaxInstances(settings.max_instances));
        }
        if !matches!(settings.log_level.as_str(), "trace" | "debug" | "info" | "warn" | "error") {
            return Err(ConfigError::InvalidLogLevel(settings.log_level.clone()));
        }
        if !matches!(settings.log_format.as_str(), "json" | "pretty") {
            return Err(ConfigError::InvalidLogFormat(settings.log_format.clone()));
        }
        settings
            .bind_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|_| ConfigError::InvalidBindAddr(settings.bind_addr.clone()))?;
        Ok(())
    }
}
