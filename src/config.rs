//! Application configuration management
//!
//! This module handles loading and validating configuration from environment variables.
//! All configuration is loaded at startup and validated before the application runs.

use std::env;
use std::sync::LazyLock;

use crate::constants::{
    DEFAULT_CONTENT_SERVICE_TIMEOUT_SECONDS, DEFAULT_DATABASE_MAX_CONNECTIONS,
    DEFAULT_DOCKER_SCRATCH_DIR, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
    DEFAULT_WORKER_POOL_SIZE, DEFAULT_WORKER_QUEUE_CAPACITY,
};

/// Global application configuration (lazily initialized)
pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Config::from_env().expect("Failed to load configuration from environment")
});

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub docker: DockerConfig,
    pub content_service: ContentServiceConfig,
    pub languages: LanguagesConfig,
    pub worker: WorkerConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Docker configuration for sandbox containers
#[derive(Debug, Clone)]
pub struct DockerConfig {
    pub socket_path: String,

    /// Base directory for per-test-case scratch dirs. Must resolve on the
    /// *Docker daemon's* host, not necessarily inside this process's own
    /// filesystem (the judge typically talks to a daemon-outside-of-daemon
    /// over a socket/TCP endpoint), since it is the source side of each
    /// container's bind mount.
    pub scratch_dir: String,
}

/// External content service configuration
#[derive(Debug, Clone)]
pub struct ContentServiceConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

/// Language registry configuration
#[derive(Debug, Clone)]
pub struct LanguagesConfig {
    pub config_path: String,
}

/// Judge worker pool configuration
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub pool_size: usize,
    pub queue_capacity: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            docker: DockerConfig::from_env()?,
            content_service: ContentServiceConfig::from_env()?,
            languages: LanguagesConfig::from_env()?,
            worker: WorkerConfig::from_env()?,
        })
    }
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| DEFAULT_SERVER_PORT.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".to_string()))?,
            rust_log: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

impl DatabaseConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env::var("DATABASE_URL")
                .map_err(|_| ConfigError::Missing("DATABASE_URL".to_string()))?,
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| DEFAULT_DATABASE_MAX_CONNECTIONS.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DATABASE_MAX_CONNECTIONS".to_string()))?,
        })
    }
}

impl DockerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            socket_path: env::var("DOCKER_HOST")
                .unwrap_or_else(|_| "unix:///var/run/docker.sock".to_string()),
            scratch_dir: env::var("DOCKER_SCRATCH_DIR")
                .unwrap_or_else(|_| DEFAULT_DOCKER_SCRATCH_DIR.to_string()),
        })
    }
}

impl ContentServiceConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: env::var("CONTENT_SERVICE_URL")
                .unwrap_or_else(|_| "http://content_service:8000".to_string()),
            timeout_seconds: env::var("CONTENT_SERVICE_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| DEFAULT_CONTENT_SERVICE_TIMEOUT_SECONDS.to_string())
                .parse()
                .map_err(|_| {
                    ConfigError::InvalidValue("CONTENT_SERVICE_TIMEOUT_SECONDS".to_string())
                })?,
        })
    }
}

impl LanguagesConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            config_path: env::var("LANGUAGES_CONFIG")
                .unwrap_or_else(|_| "languages.yaml".to_string()),
        })
    }
}

impl WorkerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            pool_size: env::var("WORKER_POOL_SIZE")
                .unwrap_or_else(|_| DEFAULT_WORKER_POOL_SIZE.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("WORKER_POOL_SIZE".to_string()))?,
            queue_capacity: env::var("WORKER_QUEUE_CAPACITY")
                .unwrap_or_else(|_| DEFAULT_WORKER_QUEUE_CAPACITY.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("WORKER_QUEUE_CAPACITY".to_string()))?,
        })
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(String),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let server = ServerConfig {
            host: DEFAULT_SERVER_HOST.to_string(),
            port: DEFAULT_SERVER_PORT,
            rust_log: "info".to_string(),
        };
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 8080);
    }
}
