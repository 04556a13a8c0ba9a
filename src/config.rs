//! Configuration module for Stratus.

use serde::Deserialize;
use std::path::Path;

use crate::{Result, StratusError};

/// Web server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origins.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Public base URL used when building account links (activation, password reset).
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
            base_url: default_base_url(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/stratus.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Blob storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to the blob storage directory.
    #[serde(default = "default_storage_path")]
    pub path: String,
    /// Maximum upload size in megabytes.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size_mb: u64,
}

fn default_storage_path() -> String {
    "data/blobs".to_string()
}

fn default_max_upload_size() -> u64 {
    50
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
            max_upload_size_mb: default_max_upload_size(),
        }
    }
}

/// Authentication configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// JWT secret key (must be set).
    #[serde(default)]
    pub jwt_secret: String,
    /// Access token expiry in seconds.
    #[serde(default = "default_jwt_expiry")]
    pub jwt_token_expiry_secs: u64,
    /// Account activation token expiry in seconds.
    #[serde(default = "default_activation_expiry")]
    pub activation_token_expiry_secs: u64,
    /// Password reset token expiry in seconds.
    #[serde(default = "default_reset_expiry")]
    pub reset_token_expiry_secs: u64,
}

fn default_jwt_expiry() -> u64 {
    7 * 24 * 3600 // 7 days
}

fn default_activation_expiry() -> u64 {
    900 // 15 minutes
}

fn default_reset_expiry() -> u64 {
    3600 // 1 hour
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            jwt_token_expiry_secs: default_jwt_expiry(),
            activation_token_expiry_secs: default_activation_expiry(),
            reset_token_expiry_secs: default_reset_expiry(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/stratus.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Web server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Blob storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Authentication configuration.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(StratusError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| StratusError::Validation(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `STRATUS_JWT_SECRET`: Override the JWT secret key
    pub fn apply_env_overrides(&mut self) {
        // JWT secret from environment variable (highest priority)
        if let Ok(jwt_secret) = std::env::var("STRATUS_JWT_SECRET") {
            if !jwt_secret.is_empty() {
                self.auth.jwt_secret = jwt_secret;
            }
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if the JWT secret is not set.
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.is_empty() {
            return Err(StratusError::Validation(
                "jwt_secret is not set. \
                 Set it in config.toml or via the STRATUS_JWT_SECRET environment variable."
                    .to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert!(config.server.cors_origins.is_empty());
        assert_eq!(config.server.base_url, "http://localhost:8080");

        assert_eq!(config.database.path, "data/stratus.db");

        assert_eq!(config.storage.path, "data/blobs");
        assert_eq!(config.storage.max_upload_size_mb, 50);

        assert!(config.auth.jwt_secret.is_empty());
        assert_eq!(config.auth.jwt_token_expiry_secs, 7 * 24 * 3600);
        assert_eq!(config.auth.activation_token_expiry_secs, 900);
        assert_eq!(config.auth.reset_token_expiry_secs, 3600);

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.file, "logs/stratus.log");
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 3000
cors_origins = ["http://localhost:3000", "http://localhost:5173"]
base_url = "https://drive.example.com"

[database]
path = "custom/db.sqlite"

[storage]
path = "custom/blobs"
max_upload_size_mb = 100

[auth]
jwt_secret = "test-secret-key"
jwt_token_expiry_secs = 3600
activation_token_expiry_secs = 600
reset_token_expiry_secs = 1800

[logging]
level = "debug"
file = "custom/logs/app.log"
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.cors_origins.len(), 2);
        assert_eq!(config.server.cors_origins[0], "http://localhost:3000");
        assert_eq!(config.server.base_url, "https://drive.example.com");

        assert_eq!(config.database.path, "custom/db.sqlite");

        assert_eq!(config.storage.path, "custom/blobs");
        assert_eq!(config.storage.max_upload_size_mb, 100);

        assert_eq!(config.auth.jwt_secret, "test-secret-key");
        assert_eq!(config.auth.jwt_token_expiry_secs, 3600);
        assert_eq!(config.auth.activation_token_expiry_secs, 600);
        assert_eq!(config.auth.reset_token_expiry_secs, 1800);

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.file, "custom/logs/app.log");
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[server]
port = 3000

[auth]
jwt_secret = "partial-secret"
"#;

        let config = Config::parse(toml).unwrap();

        // Specified values
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.auth.jwt_secret, "partial-secret");

        // Default values
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.database.path, "data/stratus.db");
        assert_eq!(config.storage.max_upload_size_mb, 50);
    }

    #[test]
    fn test_parse_empty_config() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_invalid_toml() {
        let result = Config::parse("this is not [valid toml");
        assert!(result.is_err());
        assert!(matches!(result, Err(StratusError::Validation(_))));
    }

    #[test]
    fn test_validate_missing_jwt_secret() {
        let config = Config::default();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("jwt_secret"));
    }

    #[test]
    fn test_validate_with_jwt_secret() {
        let mut config = Config::default();
        config.auth.jwt_secret = "a-secret".to_string();
        assert!(config.validate().is_ok());
    }
}
