//! Error handling for the community portal
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy. Storage failures are
//! converted to [`StoreError`] at the repository boundary; the registration
//! workflow and the export pipeline return their own typed errors instead of
//! leaking storage details to callers.

use thiserror::Error;
use uuid::Uuid;

/// Main error type for the community portal
#[derive(Error, Debug)]
pub enum PortalError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Registration failed: {0}")]
    Registration(#[from] RegistrationError),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Event not found: {event_id}")]
    EventNotFound { event_id: Uuid },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

/// Errors raised by the document store implementations
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("permission denied by storage: {0}")]
    PermissionDenied(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("unique constraint violated: {0}")]
    Conflict(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("database error: {0}")]
    Database(sqlx::Error),

    #[error("document serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("corrupt document: {0}")]
    Corrupt(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        match &error {
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                // unique_violation
                Some("23505") => StoreError::Conflict(
                    db_err.constraint().unwrap_or("unknown").to_string(),
                ),
                // insufficient_privilege
                Some("42501") => StoreError::PermissionDenied(db_err.message().to_string()),
                _ => StoreError::Database(error),
            },
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Unavailable(error.to_string())
            }
            _ => StoreError::Database(error),
        }
    }
}

impl StoreError {
    /// Short diagnostic label used in structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::PermissionDenied(_) => "permission_denied",
            StoreError::Unavailable(_) => "unavailable",
            StoreError::Conflict(_) => "conflict",
            StoreError::NotFound { .. } => "not_found",
            StoreError::Database(_) => "database",
            StoreError::Serialization(_) => "serialization",
            StoreError::Corrupt(_) => "corrupt",
        }
    }
}

/// Reasons a registration attempt is rejected
#[derive(Error, Debug)]
pub enum RegistrationError {
    /// Every violated rule, in check order
    #[error("{}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("You have already registered for this event")]
    AlreadyRegistered,

    #[error("Event not found")]
    EventNotFound,

    #[error("Event is full")]
    EventFull,

    #[error("Registration could not be saved, please try again")]
    Storage(#[source] StoreError),
}

/// Export pipeline errors
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Invalid export format: {0}")]
    UnsupportedFormat(String),

    #[error("No data to export")]
    EmptyInput,

    #[error("No fields selected for export")]
    NoFields,

    #[error("Spreadsheet generation failed: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    #[error("Failed to write export file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize export data: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for portal operations
pub type Result<T> = std::result::Result<T, PortalError>;

/// Result type alias for storage operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Result type alias for registration operations
pub type RegistrationResult<T> = std::result::Result<T, RegistrationError>;

/// Result type alias for export operations
pub type ExportResult<T> = std::result::Result<T, ExportError>;

impl PortalError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            PortalError::Database(_) => false,
            PortalError::Migration(_) => false,
            PortalError::Storage(e) => e.is_recoverable(),
            PortalError::Registration(e) => e.is_recoverable(),
            PortalError::Export(_) => false,
            PortalError::Config(_) => false,
            PortalError::PermissionDenied(_) => false,
            PortalError::Authentication(_) => false,
            PortalError::EventNotFound { .. } => false,
            PortalError::InvalidInput(_) => true,
            PortalError::Serialization(_) => false,
            PortalError::Io(_) => true,
            PortalError::Token(_) => false,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            PortalError::Database(_) => ErrorSeverity::Critical,
            PortalError::Migration(_) => ErrorSeverity::Critical,
            PortalError::Config(_) => ErrorSeverity::Critical,
            PortalError::Storage(e) => e.severity(),
            PortalError::Registration(e) => e.severity(),
            PortalError::PermissionDenied(_) => ErrorSeverity::Warning,
            PortalError::Authentication(_) => ErrorSeverity::Warning,
            PortalError::Token(_) => ErrorSeverity::Warning,
            PortalError::InvalidInput(_) => ErrorSeverity::Info,
            PortalError::EventNotFound { .. } => ErrorSeverity::Info,
            PortalError::Export(
                ExportError::UnsupportedFormat(_) | ExportError::EmptyInput | ExportError::NoFields,
            ) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

impl StoreError {
    /// Transient failures are worth a resubmission by the user
    pub fn is_recoverable(&self) -> bool {
        matches!(self, StoreError::Unavailable(_) | StoreError::Database(_))
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            StoreError::PermissionDenied(_) => ErrorSeverity::Critical,
            StoreError::Corrupt(_) => ErrorSeverity::Critical,
            StoreError::Conflict(_) | StoreError::NotFound { .. } => ErrorSeverity::Warning,
            _ => ErrorSeverity::Error,
        }
    }
}

impl RegistrationError {
    /// Validation and storage failures can be fixed by resubmitting
    pub fn is_recoverable(&self) -> bool {
        match self {
            RegistrationError::Validation(_) => true,
            RegistrationError::Storage(e) => e.is_recoverable(),
            RegistrationError::AlreadyRegistered
            | RegistrationError::EventNotFound
            | RegistrationError::EventFull => false,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            RegistrationError::Storage(e) => e.severity(),
            _ => ErrorSeverity::Info,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
