//! Export models

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::utils::errors::ExportError;

/// Flat string-keyed record fed to the export pipeline
pub type ExportRecord = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Excel,
    Html,
    Csv,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Excel => "excel",
            ExportFormat::Html => "html",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Excel => "xlsx",
            ExportFormat::Html => "html",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Excel => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::Html => "text/html; charset=utf-8",
            ExportFormat::Csv => "text/csv; charset=utf-8",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "html" => Ok(ExportFormat::Html),
            "csv" => Ok(ExportFormat::Csv),
            _ => Err(ExportError::UnsupportedFormat(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportStatus {
    Success,
    Failed,
    Cancelled,
}

impl ExportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportStatus::Success => "success",
            ExportStatus::Failed => "failed",
            ExportStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "success" => Some(ExportStatus::Success),
            "failed" => Some(ExportStatus::Failed),
            "cancelled" => Some(ExportStatus::Cancelled),
            _ => None,
        }
    }
}

/// Immutable record of one export attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportHistoryEntry {
    pub id: Uuid,
    pub export_id: String,
    pub admin_user_id: String,
    pub admin_email: String,
    pub admin_role: String,
    pub export_type: String,
    /// Format as requested, which may be unsupported on failed attempts
    pub export_format: String,
    pub filename: String,
    pub record_count: i64,
    pub selected_fields: Vec<String>,
    pub filters: Map<String, Value>,
    pub export_size: i64,
    pub status: ExportStatus,
    pub error_message: Option<String>,
    pub ip_address: String,
    pub user_agent: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportStatistics {
    pub total_exports: usize,
    pub successful_exports: usize,
    pub failed_exports: usize,
    pub exports_by_format: BTreeMap<String, usize>,
    pub exports_by_type: BTreeMap<String, usize>,
    pub exports_by_user: BTreeMap<String, usize>,
    pub total_records_exported: i64,
    pub last_export_date: Option<DateTime<Utc>>,
}

impl ExportStatistics {
    pub fn from_entries(entries: &[ExportHistoryEntry]) -> Self {
        let mut stats = Self {
            total_exports: entries.len(),
            ..Self::default()
        };

        for entry in entries {
            match entry.status {
                ExportStatus::Success => stats.successful_exports += 1,
                ExportStatus::Failed => stats.failed_exports += 1,
                ExportStatus::Cancelled => {}
            }
            *stats.exports_by_format.entry(entry.export_format.clone()).or_default() += 1;
            *stats.exports_by_type.entry(entry.export_type.clone()).or_default() += 1;
            *stats.exports_by_user.entry(entry.admin_email.clone()).or_default() += 1;
            stats.total_records_exported += entry.record_count;
            if stats.last_export_date.map_or(true, |last| entry.timestamp > last) {
                stats.last_export_date = Some(entry.timestamp);
            }
        }

        stats
    }
}

/// Field offered in the export dialog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub key: String,
    pub label: String,
}
