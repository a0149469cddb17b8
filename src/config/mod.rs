//! Application configuration module
//!
//! Type-safe configuration loaded with the `config` and `dotenvy` crates.
//! An optional YAML file (path from `METAS_DASHBOARD_CONFIG`, default
//! `config/dashboard`) is layered under environment variables with the
//! `METAS_DASHBOARD` prefix; nested values use double underscores.
//!
//! # Example
//!
//! ```no_run
//! use metas_dashboard::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Serving {} domains", config.domains.domains().len());
//! ```

mod error;
mod server;
mod source;

pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};
pub use source::SourceConfig;

use serde::Deserialize;

use crate::domain::metrics::DomainCatalog;

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_VAR: &str = "METAS_DASHBOARD_CONFIG";

const DEFAULT_CONFIG_PATH: &str = "config/dashboard";
const ENV_PREFIX: &str = "METAS_DASHBOARD";

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, logging)
    #[serde(default)]
    pub server: ServerConfig,

    /// Dataset location and memoization
    #[serde(default)]
    pub source: SourceConfig,

    /// Domain definitions served by the dashboard
    #[serde(default)]
    pub domains: DomainCatalog,
}

impl AppConfig {
    /// Load configuration from the config file and environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads the YAML file named by `METAS_DASHBOARD_CONFIG`, if it exists
    /// 3. Overlays environment variables with `METAS_DASHBOARD` prefix
    ///
    /// # Environment Variable Format
    ///
    /// - `METAS_DASHBOARD__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `METAS_DASHBOARD__SOURCE__DATA_DIR=/srv/data` -> `source.data_dir = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file is unreadable or values cannot be
    /// parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let path =
            std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&path)
    }

    /// Load from an explicit file path (extension optional) plus environment.
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::default()
                    .prefix(ENV_PREFIX)
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for bad server settings, a missing data
    /// directory, an empty catalog, duplicate domain keys or invalid
    /// threshold sets.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.source.validate()?;
        if self.domains.is_empty() {
            return Err(ValidationError::NoDomains);
        }
        self.domains.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
