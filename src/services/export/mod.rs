//! Export pipeline
//!
//! Turns a record set and a field selection into a downloadable artifact in
//! one of three formats. Every attempt, successful or not, leaves exactly one
//! entry in the export history. Writing that entry is best-effort: its
//! failure is logged and never changes the export result.

pub mod csv;
pub mod excel;
pub mod history;
pub mod html;
pub mod render;

use std::path::PathBuf;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::config::ExportConfig;
use crate::database::DatabaseService;
use crate::models::{
    AdminPrincipal, ExportFormat, ExportHistoryEntry, ExportRecord, ExportStatus, FieldDescriptor,
};
use crate::utils::errors::{ExportError, ExportResult};
use crate::utils::helpers::{format_bytes, generate_base36_string, humanize_field_name, sanitize_filename};
use crate::utils::logging::{log_best_effort_failure, log_export};

const FEEDBACK_FIELDS: &[&str] = &[
    "fullName",
    "email",
    "phone",
    "rollNumber",
    "department",
    "year",
    "section",
    "overallExperience",
    "ratings",
    "timestamp",
    "submissionId",
];

const APPLICATION_FIELDS: &[&str] = &[
    "fullName",
    "email",
    "contactNumber",
    "rollNumber",
    "branch",
    "section",
    "yearOfStudy",
    "skills",
    "motivation",
    "domainInterest",
    "timeCommitment",
    "previousExperience",
    "linkedin",
    "github",
    "portfolio",
    "timestamp",
    "submissionId",
    "status",
];

const REGISTRATION_FIELDS: &[&str] = &[
    "name",
    "email",
    "rollNumber",
    "section",
    "branch",
    "year",
    "phone",
    "previousExperience",
    "specialRequirements",
    "howDidYouHear",
    "registrationDate",
    "status",
];

/// Fields offered for an export type; unknown types fall back to the sample record's keys
pub fn available_fields(export_type: &str, sample: Option<&ExportRecord>) -> Vec<FieldDescriptor> {
    let keys: Vec<String> = match export_type {
        "feedback" => FEEDBACK_FIELDS.iter().map(|f| f.to_string()).collect(),
        "applications" | "career-applications" => {
            APPLICATION_FIELDS.iter().map(|f| f.to_string()).collect()
        }
        "registrations" => REGISTRATION_FIELDS.iter().map(|f| f.to_string()).collect(),
        _ => sample.map(|r| r.keys().cloned().collect()).unwrap_or_default(),
    };

    keys.into_iter()
        .map(|key| FieldDescriptor {
            label: humanize_field_name(&key),
            key,
        })
        .collect()
}

/// Request metadata recorded with the audit entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Requested format; parsed inside the pipeline so bad values are audited too
    pub format: String,
    /// File name without extension
    pub filename: String,
    pub selected_fields: Vec<String>,
    pub export_type: String,
    pub title: Option<String>,
    pub acting_admin: AdminPrincipal,
    /// Opaque description of the filters applied by the caller
    pub filters: Map<String, Value>,
    pub client: ClientInfo,
}

/// A rendered export ready to be downloaded or saved
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub export_id: String,
    /// File name including extension
    pub filename: String,
    pub format: ExportFormat,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
    pub record_count: usize,
    pub fields: Vec<String>,
}

/// `export_{millis}_{9 base-36 chars}`
pub fn generate_export_id() -> String {
    format!("export_{}_{}", Utc::now().timestamp_millis(), generate_base36_string(9))
}

/// Export pipeline with one audit entry per attempt
#[derive(Clone)]
pub struct ExportService {
    db: DatabaseService,
    config: ExportConfig,
}

impl ExportService {
    /// Create a new ExportService instance
    pub fn new(db: DatabaseService, config: ExportConfig) -> Self {
        Self { db, config }
    }

    /// Render `records` and record the attempt in the export history
    pub async fn export_with_history(
        &self,
        records: &[ExportRecord],
        options: ExportOptions,
    ) -> ExportResult<ExportArtifact> {
        let export_id = generate_export_id();
        let fields = render::resolve_fields(records, &options.selected_fields);

        let result = self.render(&export_id, records, &fields, &options);

        let entry = ExportHistoryEntry {
            id: Uuid::new_v4(),
            export_id: export_id.clone(),
            admin_user_id: options.acting_admin.id.clone(),
            admin_email: options.acting_admin.email.clone(),
            admin_role: options.acting_admin.role.as_str().to_string(),
            export_type: options.export_type.clone(),
            export_format: options.format.clone(),
            filename: options.filename.clone(),
            record_count: records.len() as i64,
            selected_fields: fields,
            filters: options.filters.clone(),
            export_size: result.as_ref().map_or(0, |a| a.bytes.len() as i64),
            status: if result.is_ok() {
                ExportStatus::Success
            } else {
                ExportStatus::Failed
            },
            error_message: result.as_ref().err().map(|e| e.to_string()),
            ip_address: options
                .client
                .ip_address
                .clone()
                .unwrap_or_else(|| "unknown".to_string()),
            user_agent: options
                .client
                .user_agent
                .clone()
                .unwrap_or_else(|| "unknown".to_string()),
            timestamp: Utc::now(),
        };

        log_export(
            &export_id,
            &entry.admin_email,
            &entry.export_format,
            records.len(),
            result.is_ok(),
        );
        self.record_history(&entry).await;

        result
    }

    fn render(
        &self,
        export_id: &str,
        records: &[ExportRecord],
        fields: &[String],
        options: &ExportOptions,
    ) -> ExportResult<ExportArtifact> {
        let format: ExportFormat = options.format.parse()?;

        if records.is_empty() {
            return Err(ExportError::EmptyInput);
        }
        if fields.is_empty() {
            return Err(ExportError::NoFields);
        }

        let bytes = match format {
            ExportFormat::Excel => excel::render_xlsx(records, fields)?,
            ExportFormat::Html => {
                let title = options.title.as_deref().unwrap_or(&self.config.default_title);
                html::render_html(records, fields, title, Utc::now()).into_bytes()
            }
            ExportFormat::Csv => csv::render_csv(records, fields).into_bytes(),
        };

        Ok(ExportArtifact {
            export_id: export_id.to_string(),
            filename: format!("{}.{}", options.filename, format.extension()),
            format,
            content_type: format.mime_type(),
            bytes,
            record_count: records.len(),
            fields: fields.to_vec(),
        })
    }

    async fn record_history(&self, entry: &ExportHistoryEntry) {
        if let Err(e) = self.db.export_history.insert(entry).await {
            log_best_effort_failure("record_export_history", &entry.export_id, &e);
        }
    }

    /// Write an artifact into the configured output directory.
    ///
    /// Returns `None` when no output directory is configured.
    pub async fn save_artifact(&self, artifact: &ExportArtifact) -> ExportResult<Option<PathBuf>> {
        let Some(dir) = self.config.output_dir.as_deref() else {
            return Ok(None);
        };

        tokio::fs::create_dir_all(dir).await?;
        let path = PathBuf::from(dir).join(sanitize_filename(&artifact.filename));
        tokio::fs::write(&path, &artifact.bytes).await?;

        tracing::info!(
            export_id = %artifact.export_id,
            path = %path.display(),
            size = %format_bytes(artifact.bytes.len() as u64),
            "Export saved"
        );
        Ok(Some(path))
    }
}
