//! Mapping from [`PortalError`] to JSON error responses
//!
//! Bodies have the shape `{ "error": <message>, "code": <CODE> }`. Storage and
//! other internal failures are logged with their details and answered with a
//! sanitized message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::utils::errors::{ErrorSeverity, ExportError, PortalError, RegistrationError};

const INTERNAL_MESSAGE: &str = "An internal error occurred";

fn classify_registration(err: &RegistrationError) -> (StatusCode, &'static str, String) {
    match err {
        RegistrationError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string()),
        RegistrationError::AlreadyRegistered => (StatusCode::CONFLICT, "ALREADY_REGISTERED", err.to_string()),
        RegistrationError::EventFull => (StatusCode::CONFLICT, "EVENT_FULL", err.to_string()),
        RegistrationError::EventNotFound => (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string()),
        RegistrationError::Storage(_) => (StatusCode::SERVICE_UNAVAILABLE, "STORAGE_ERROR", err.to_string()),
    }
}

fn classify_export(err: &ExportError) -> (StatusCode, &'static str, String) {
    match err {
        ExportError::UnsupportedFormat(_) => (StatusCode::BAD_REQUEST, "UNSUPPORTED_FORMAT", err.to_string()),
        ExportError::EmptyInput | ExportError::NoFields => {
            (StatusCode::BAD_REQUEST, "EMPTY_EXPORT", err.to_string())
        }
        ExportError::Spreadsheet(_) | ExportError::Io(_) | ExportError::Serialization(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "EXPORT_ERROR", err.to_string())
        }
    }
}

impl PortalError {
    fn classify(&self) -> (StatusCode, &'static str, String) {
        match self {
            PortalError::Registration(e) => classify_registration(e),
            PortalError::Export(e) => classify_export(e),
            PortalError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            PortalError::Authentication(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
            PortalError::Token(_) => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Invalid or expired token".to_string(),
            ),
            PortalError::PermissionDenied(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
            PortalError::EventNotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND", self.to_string()),
            PortalError::Storage(e) if e.is_recoverable() => (
                StatusCode::SERVICE_UNAVAILABLE,
                "STORAGE_UNAVAILABLE",
                "Storage is temporarily unavailable, please try again".to_string(),
            ),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", INTERNAL_MESSAGE.to_string()),
        }
    }
}

impl IntoResponse for PortalError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.classify();

        match self.severity() {
            ErrorSeverity::Critical | ErrorSeverity::Error => {
                tracing::error!(error = %self, code = code, "Request failed")
            }
            ErrorSeverity::Warning => tracing::warn!(error = %self, code = code, "Request rejected"),
            ErrorSeverity::Info => tracing::debug!(error = %self, code = code, "Request rejected"),
        }

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
