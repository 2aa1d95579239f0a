//! Services module
//!
//! This module contains business logic services

pub mod auth;
pub mod backup;
pub mod events;
pub mod export;
pub mod registration;
pub mod submissions;

pub use auth::{AuthService, Claims, Permission};
pub use backup::{Backup, BackupMetadata, BackupService};
pub use events::{validate_form_config, EventCatalog};
pub use export::{available_fields, ClientInfo, ExportArtifact, ExportOptions, ExportService};
pub use registration::{format_year_for_display, normalize_year, validate_registration, RegistrationWorkflow};
pub use submissions::SubmissionService;

use crate::config::Settings;
use crate::database::DatabaseService;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub auth_service: AuthService,
    pub event_catalog: EventCatalog,
    pub registration_workflow: RegistrationWorkflow,
    pub export_service: ExportService,
    pub submission_service: SubmissionService,
    pub backup_service: BackupService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(settings: &Settings, db: DatabaseService) -> Self {
        Self {
            auth_service: AuthService::new(settings.auth.clone()),
            event_catalog: EventCatalog::new(db.clone(), settings.registration.clone()),
            registration_workflow: RegistrationWorkflow::new(db.clone()),
            export_service: ExportService::new(db.clone(), settings.export.clone()),
            submission_service: SubmissionService::new(db.clone()),
            backup_service: BackupService::new(db),
        }
    }
}
