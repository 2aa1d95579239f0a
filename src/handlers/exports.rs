//! Export endpoints: file downloads, audit trail and backups

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::middleware::AdminUser;
use crate::models::{
    Collection, ExportHistoryEntry, ExportRecord, ExportStatistics, FieldDescriptor, Registration,
};
use crate::services::{available_fields, AuthService, ClientInfo, ExportOptions, Permission};
use crate::state::AppState;
use crate::utils::errors::{PortalError, Result};
use crate::utils::helpers::sanitize_filename;

/// Data set an export is drawn from
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportSource {
    Feedback,
    CareerApplications,
    Registrations,
}

impl ExportSource {
    /// Value recorded as the export type in the audit trail
    fn export_type(&self) -> &'static str {
        match self {
            ExportSource::Feedback => "feedback",
            ExportSource::CareerApplications => "applications",
            ExportSource::Registrations => "registrations",
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    pub source: ExportSource,
    /// Restricts a registrations export to one event
    pub event_id: Option<Uuid>,
    pub format: String,
    pub filename: Option<String>,
    /// `None` exports every field; an empty list is rejected
    pub selected_fields: Option<Vec<String>>,
    pub title: Option<String>,
    #[serde(default)]
    pub filters: Map<String, Value>,
}

async fn load_records(state: &AppState, request: &ExportRequest) -> Result<Vec<ExportRecord>> {
    let services = &state.services;
    match request.source {
        ExportSource::Feedback => services.submission_service.documents(Collection::Feedback).await,
        ExportSource::CareerApplications => {
            services
                .submission_service
                .documents(Collection::CareerApplications)
                .await
        }
        ExportSource::Registrations => {
            let registrations = match request.event_id {
                Some(event_id) => services.registration_workflow.event_registrations(event_id).await?,
                None => services.registration_workflow.all_registrations().await?,
            };
            Ok(registrations.iter().map(Registration::to_record).collect())
        }
    }
}

fn client_info(headers: &HeaderMap) -> ClientInfo {
    let text = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    ClientInfo {
        ip_address: text("x-forwarded-for")
            .and_then(|v| v.split(',').next().map(|ip| ip.trim().to_string())),
        user_agent: text(header::USER_AGENT.as_str()),
    }
}

/// Run an export and return the artifact as a download
pub async fn create_export(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    headers: HeaderMap,
    Json(request): Json<ExportRequest>,
) -> Result<Response> {
    AuthService::require_permission(&admin, Permission::ExportData)?;

    if matches!(&request.selected_fields, Some(fields) if fields.is_empty()) {
        return Err(PortalError::InvalidInput(
            "Select at least one field to export".to_string(),
        ));
    }

    let records = load_records(&state, &request).await?;
    let export_type = request.source.export_type();
    let options = ExportOptions {
        format: request.format,
        filename: request
            .filename
            .filter(|f| !f.trim().is_empty())
            .map(|f| sanitize_filename(f.trim()))
            .unwrap_or_else(|| format!("{}_{}", export_type, Utc::now().format("%Y-%m-%d"))),
        selected_fields: request.selected_fields.unwrap_or_default(),
        export_type: export_type.to_string(),
        title: request.title,
        acting_admin: admin,
        filters: request.filters,
        client: client_info(&headers),
    };

    let exports = &state.services.export_service;
    let artifact = exports.export_with_history(&records, options).await?;

    if let Err(e) = exports.save_artifact(&artifact).await {
        tracing::warn!(export_id = %artifact.export_id, error = %e, "Failed to save export copy");
    }

    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", artifact.filename))
        .map_err(|e| PortalError::InvalidInput(format!("Invalid filename: {}", e)))?;
    let export_id = HeaderValue::from_str(&artifact.export_id)
        .map_err(|e| PortalError::InvalidInput(format!("Invalid export id: {}", e)))?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(artifact.content_type)),
            (header::CONTENT_DISPOSITION, disposition),
            (header::HeaderName::from_static("x-export-id"), export_id),
        ],
        artifact.bytes,
    )
        .into_response())
}

#[derive(Debug, Deserialize)]
pub struct FieldsQuery {
    #[serde(rename = "type")]
    pub export_type: String,
}

pub async fn list_fields(
    AdminUser(_admin): AdminUser,
    Query(query): Query<FieldsQuery>,
) -> Json<Vec<FieldDescriptor>> {
    Json(available_fields(&query.export_type, None))
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

/// Global audit trail, optionally restricted to a time range
pub async fn list_history(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<ExportHistoryEntry>>> {
    let exports = &state.services.export_service;
    let entries = match (query.start, query.end) {
        (Some(start), Some(end)) => exports.history_in_range(&admin, start, end, query.limit).await?,
        (None, None) => exports.all_history(&admin, query.limit).await?,
        _ => {
            return Err(PortalError::InvalidInput(
                "Both start and end are required for a range query".to_string(),
            ))
        }
    };
    Ok(Json(entries))
}

pub async fn list_my_history(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<ExportHistoryEntry>>> {
    let entries = state
        .services
        .export_service
        .history_for_admin(&admin, &admin.id, query.limit)
        .await?;
    Ok(Json(entries))
}

pub async fn export_statistics(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
) -> Result<Json<ExportStatistics>> {
    Ok(Json(state.services.export_service.statistics(&admin).await?))
}

pub async fn create_backup(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
) -> Result<Response> {
    let backup = state.services.backup_service.create_backup(&admin).await?;
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", backup.filename()))
        .map_err(|e| PortalError::InvalidInput(format!("Invalid filename: {}", e)))?;

    Ok(([(header::CONTENT_DISPOSITION, disposition)], Json(backup)).into_response())
}
