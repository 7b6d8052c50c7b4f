//! Configuration types and loading
//!
//! Environment-driven configuration for the server binary and database layer.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Database configuration
    pub database: DatabaseSettings,

    /// Server configuration
    pub server: ServerSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseSettings {
                url: "postgres://localhost/siteprogress".to_string(),
                max_connections: 10,
                min_connections: 2,
                connect_timeout_secs: 30,
            },
            server: ServerSettings {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, CoreError> {
        let defaults = AppConfig::default();

        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| CoreError::Config(format!("invalid PORT: {raw}")))?,
            Err(_) => defaults.server.port,
        };

        Ok(Self {
            database: DatabaseSettings {
                url: std::env::var("DATABASE_URL").unwrap_or(defaults.database.url),
                max_connections: env_parse("DB_MAX_CONNECTIONS", defaults.database.max_connections)?,
                min_connections: env_parse("DB_MIN_CONNECTIONS", defaults.database.min_connections)?,
                connect_timeout_secs: env_parse(
                    "DB_CONNECT_TIMEOUT",
                    defaults.database.connect_timeout_secs,
                )?,
            },
            server: ServerSettings {
                host: std::env::var("HOST").unwrap_or(defaults.server.host),
                port,
            },
        })
    }

    /// Socket address string for the HTTP listener
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> Result<T, CoreError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| CoreError::Config(format!("invalid {name}: {raw}"))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.server_addr(), "0.0.0.0:8080");
    }
}
