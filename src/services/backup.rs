//! Full data snapshot for super admins

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::{AdminPrincipal, Collection, ExportRecord};
use crate::services::auth::{AuthService, Permission};
use crate::services::submissions::to_export_record;
use crate::database::DatabaseService;
use crate::utils::errors::Result;
use crate::utils::logging::log_admin_action;

pub const BACKUP_FORMAT_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupMetadata {
    pub total_feedback: usize,
    pub total_applications: usize,
    pub total_users: usize,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Backup {
    pub timestamp: DateTime<Utc>,
    pub feedback: Vec<ExportRecord>,
    pub applications: Vec<ExportRecord>,
    pub users: Vec<ExportRecord>,
    pub metadata: BackupMetadata,
}

impl Backup {
    /// Suggested download name, e.g. `portal_backup_1718000000000.json`
    pub fn filename(&self) -> String {
        format!("portal_backup_{}.json", self.timestamp.timestamp_millis())
    }
}

/// Snapshots of every stored collection for super admins
#[derive(Clone)]
pub struct BackupService {
    db: DatabaseService,
}

impl BackupService {
    /// Create a new BackupService instance
    pub fn new(db: DatabaseService) -> Self {
        Self { db }
    }

    pub async fn create_backup(&self, principal: &AdminPrincipal) -> Result<Backup> {
        AuthService::require_permission(principal, Permission::CreateBackup)?;

        let (feedback, applications, users) = tokio::try_join!(
            self.db.records.list(Collection::Feedback),
            self.db.records.list(Collection::CareerApplications),
            self.db.records.list(Collection::AdminUsers),
        )?;

        let flatten = |records: Vec<_>| records.into_iter().map(to_export_record).collect::<Vec<_>>();
        let backup = Backup {
            timestamp: Utc::now(),
            metadata: BackupMetadata {
                total_feedback: feedback.len(),
                total_applications: applications.len(),
                total_users: users.len(),
                version: BACKUP_FORMAT_VERSION.to_string(),
            },
            feedback: flatten(feedback),
            applications: flatten(applications),
            users: flatten(users),
        };

        log_admin_action(
            &principal.id,
            "create_backup",
            None,
            Some(&format!(
                "{} feedback, {} applications, {} users",
                backup.metadata.total_feedback,
                backup.metadata.total_applications,
                backup.metadata.total_users
            )),
        );
        info!(filename = %backup.filename(), "Backup created");
        Ok(backup)
    }
}
