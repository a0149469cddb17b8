//! HTTP listener settings for the dashboard API

use serde::Deserialize;
use std::net::{SocketAddr, ToSocketAddrs};
use std::time::Duration;

use super::error::ValidationError;

const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;

/// Where and how the API listens. Every field has a default, so an empty
/// `server:` section is valid.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind host; an IP literal or a resolvable name such as `localhost`
    pub host: String,
    pub port: u16,
    pub environment: Environment,

    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub log_level: String,

    /// Per-request budget, 1..=300 seconds
    pub request_timeout_secs: u64,

    /// Comma-separated browser origins; unset or blank allows any origin
    pub cors_origins: Option<String>,
}

/// Deployment stage; production switches logs to JSON
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            environment: Environment::Development,
            log_level: "info,metas_dashboard=debug,tower_http=debug".to_string(),
            request_timeout_secs: 30,
            cors_origins: None,
        }
    }
}

impl ServerConfig {
    /// Resolves `host:port`, taking the first address the resolver returns.
    pub fn socket_addr(&self) -> Result<SocketAddr, ValidationError> {
        let target = format!("{}:{}", self.host, self.port);
        target
            .to_socket_addrs()
            .ok()
            .and_then(|mut addrs| addrs.next())
            .ok_or(ValidationError::InvalidSocketAddress(target))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    pub fn cors_origins_list(&self) -> Vec<String> {
        let Some(raw) = self.cors_origins.as_deref() else {
            return Vec::new();
        };
        raw.split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        if !(1..=MAX_REQUEST_TIMEOUT_SECS).contains(&self.request_timeout_secs) {
            return Err(ValidationError::InvalidTimeout);
        }
        self.socket_addr().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_host(host: &str) -> ServerConfig {
        ServerConfig {
            host: host.to_string(),
            ..ServerConfig::default()
        }
    }

    #[test]
    fn defaults_listen_on_all_interfaces() {
        let config = ServerConfig::default();
        assert_eq!(config.socket_addr().unwrap().to_string(), "0.0.0.0:8080");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(config.log_level.contains("metas_dashboard=debug"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn localhost_resolves_to_loopback() {
        let addr = with_host("localhost").socket_addr().unwrap();
        assert!(addr.ip().is_loopback());
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn unresolvable_host_fails_validation() {
        assert!(matches!(
            with_host("not a host").validate(),
            Err(ValidationError::InvalidSocketAddress(_))
        ));
    }

    #[test]
    fn production_flag_follows_environment() {
        let mut config = ServerConfig::default();
        assert!(!config.is_production());
        config.environment = Environment::Production;
        assert!(config.is_production());
    }

    #[test]
    fn cors_list_drops_blank_entries() {
        let mut config = ServerConfig {
            cors_origins: Some("http://localhost:5173, ,https://metas.example.org".to_string()),
            ..ServerConfig::default()
        };
        assert_eq!(
            config.cors_origins_list(),
            vec!["http://localhost:5173", "https://metas.example.org"]
        );

        config.cors_origins = Some(" , ".to_string());
        assert!(config.cors_origins_list().is_empty());
    }

    #[test]
    fn port_and_timeout_bounds() {
        let zero_port = ServerConfig {
            port: 0,
            ..ServerConfig::default()
        };
        assert!(matches!(zero_port.validate(), Err(ValidationError::InvalidPort)));

        for secs in [0, MAX_REQUEST_TIMEOUT_SECS + 1] {
            let config = ServerConfig {
                request_timeout_secs: secs,
                ..ServerConfig::default()
            };
            assert!(matches!(config.validate(), Err(ValidationError::InvalidTimeout)));
        }
    }
}
