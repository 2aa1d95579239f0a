//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{PortalError, Result};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_server_config(&settings.server)?;
    validate_database_config(&settings.database)?;
    validate_auth_config(&settings.auth)?;
    validate_export_config(&settings.export)?;
    validate_registration_config(&settings.registration)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate server configuration
fn validate_server_config(config: &super::ServerConfig) -> Result<()> {
    if config.host.is_empty() {
        return Err(PortalError::Config(
            "Server host is required".to_string()
        ));
    }

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(PortalError::Config(
            "Database URL is required".to_string()
        ));
    }

    if config.max_connections == 0 {
        return Err(PortalError::Config(
            "Max connections must be greater than 0".to_string()
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(PortalError::Config(
            "Min connections cannot be greater than max connections".to_string()
        ));
    }

    Ok(())
}

/// Validate admin token configuration
fn validate_auth_config(config: &super::AuthConfig) -> Result<()> {
    if config.jwt_secret.is_empty() {
        return Err(PortalError::Config(
            "JWT secret is required".to_string()
        ));
    }

    if config.token_ttl_minutes <= 0 {
        return Err(PortalError::Config(
            "Token lifetime must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate export configuration
fn validate_export_config(config: &super::ExportConfig) -> Result<()> {
    if config.admin_history_limit <= 0 || config.global_history_limit <= 0 {
        return Err(PortalError::Config(
            "Export history limits must be greater than 0".to_string()
        ));
    }

    if matches!(config.output_dir.as_deref(), Some("")) {
        return Err(PortalError::Config(
            "Export output directory cannot be empty when set".to_string()
        ));
    }

    Ok(())
}

/// Validate the form reference vocabularies
fn validate_registration_config(config: &super::RegistrationConfig) -> Result<()> {
    if config.sections.is_empty() || config.branches.is_empty() || config.years.is_empty() {
        return Err(PortalError::Config(
            "Section, branch and year vocabularies must not be empty".to_string()
        ));
    }

    if let Some(year) = config.years.iter().find(|y| !matches!(y.as_str(), "1" | "2" | "3" | "4")) {
        return Err(PortalError::Config(
            format!("Invalid year in vocabulary: {}", year)
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(PortalError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(PortalError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}
