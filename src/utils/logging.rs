//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the community portal.

use tracing::{debug, error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};
use uuid::Uuid;
use crate::config::LoggingConfig;
use crate::utils::errors::{PortalError, Result, StoreError};

/// Initialize logging based on configuration
///
/// The returned guard flushes the file appender on drop and must be kept
/// alive for the lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(&config.directory, "community-portal.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let stdout_layer = if config.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stdout)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stdout)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(stdout_layer)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking),
        )
        .try_init()
        .map_err(|e| PortalError::Config(format!("Failed to install tracing subscriber: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log the outcome of a registration attempt
pub fn log_registration_outcome(event_id: Uuid, email: &str, outcome: &str, details: Option<&str>) {
    info!(
        event_id = %event_id,
        email = email,
        outcome = outcome,
        details = details,
        "Registration attempt processed"
    );
}

/// Log event management actions
pub fn log_event_action(event_id: Uuid, action: &str, admin_id: Option<&str>, details: Option<&str>) {
    info!(
        event_id = %event_id,
        action = action,
        admin_id = admin_id,
        details = details,
        "Event action performed"
    );
}

/// Log an export attempt and its result
pub fn log_export(export_id: &str, admin_email: &str, format: &str, record_count: usize, success: bool) {
    if success {
        info!(
            export_id = export_id,
            admin_email = admin_email,
            format = format,
            record_count = record_count,
            "Export completed"
        );
    } else {
        warn!(
            export_id = export_id,
            admin_email = admin_email,
            format = format,
            record_count = record_count,
            "Export failed"
        );
    }
}

/// Log a failed secondary operation whose error is not propagated
pub fn log_best_effort_failure(operation: &str, target: &str, error: &StoreError) {
    error!(
        operation = operation,
        target = target,
        error_kind = error.kind(),
        error = %error,
        "Best-effort operation failed"
    );
}

/// Log admin actions
pub fn log_admin_action(admin_id: &str, action: &str, target: Option<&str>, details: Option<&str>) {
    warn!(
        admin_id = admin_id,
        action = action,
        target = target,
        details = details,
        "Admin action performed"
    );
}

/// Log a denied access attempt
pub fn log_access_denied(admin_id: &str, role: &str, resource: &str) {
    warn!(
        admin_id = admin_id,
        role = role,
        resource = resource,
        "Access denied"
    );
}

/// Log database operations
pub fn log_database_operation(operation: &str, table: &str, duration_ms: u64, success: bool) {
    if success {
        debug!(
            operation = operation,
            table = table,
            duration_ms = duration_ms,
            "Database operation completed"
        );
    } else {
        error!(
            operation = operation,
            table = table,
            duration_ms = duration_ms,
            "Database operation failed"
        );
    }
}
