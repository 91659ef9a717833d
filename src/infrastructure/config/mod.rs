//! Configuration management infrastructure.
//!
//! Hierarchical configuration using `figment`: programmatic defaults,
//! an optional local `config.yaml` for development, then environment
//! variables — which take highest precedence and, for the handful of
//! settings the platform's existing deployment manifests already set,
//! are read under their original unprefixed names for drop-in
//! compatibility (`NAMESPACE`, `SEACLAW_IMAGE`, `MAX_INSTANCES`,
//! `DATA_DIR`, `LOG_LEVEL`).

pub mod loader;
pub mod settings;

pub use loader::{ConfigError, ConfigLoader};
pub use settings::GatewaySettings;
