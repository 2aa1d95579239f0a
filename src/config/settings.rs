//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub registration: RegistrationConfig,
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_seconds: u64,
}

/// Admin token configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl")]
    pub token_ttl_minutes: i64,
}

/// Export pipeline configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExportConfig {
    /// Directory artifacts are copied into; `None` keeps them in memory only
    pub output_dir: Option<String>,
    pub default_title: String,
    pub admin_history_limit: i64,
    pub global_history_limit: i64,
}

/// Reference vocabularies that event form configurations are checked against
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegistrationConfig {
    pub sections: Vec<String>,
    pub branches: Vec<String>,
    pub years: Vec<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub directory: String,
    #[serde(default)]
    pub json: bool,
}

fn default_acquire_timeout() -> u64 {
    30
}

fn default_token_ttl() -> i64 {
    60
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            default_title: "Data Export".to_string(),
            admin_history_limit: 50,
            global_history_limit: 100,
        }
    }
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            sections: ('A'..='Z').map(|c| c.to_string()).collect(),
            branches: ["CSE", "IT", "CS", "AIML", "DS", "ECE", "IOT", "BCA", "MCA", "MBA"]
                .iter()
                .map(|b| b.to_string())
                .collect(),
            years: ["1", "2", "3", "4"].iter().map(|y| y.to_string()).collect(),
        }
    }
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Settings::default())?)
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("PORTAL").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::PortalError> {
        super::validation::validate_settings(self)
    }

    /// Socket address string the HTTP server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/community_portal".to_string(),
                max_connections: 10,
                min_connections: 1,
                acquire_timeout_seconds: default_acquire_timeout(),
            },
            auth: AuthConfig {
                jwt_secret: String::new(),
                token_ttl_minutes: default_token_ttl(),
            },
            export: ExportConfig::default(),
            registration: RegistrationConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
                directory: "logs".to_string(),
                json: false,
            },
        }
    }
}
