//! Data models for the community portal

pub mod admin;
pub mod event;
pub mod export;
pub mod record;
pub mod registration;

pub use admin::{AdminPrincipal, AdminRole};
pub use event::{
    CreateEventRequest, Event, EventContent, EventStatus, FormConfig, OptionalFields,
    UpdateEventRequest,
};
pub use export::{
    ExportFormat, ExportHistoryEntry, ExportRecord, ExportStatistics, ExportStatus,
    FieldDescriptor,
};
pub use record::{Collection, StoredRecord};
pub use registration::{
    NewRegistration, Registration, RegistrationStats, RegistrationStatus, RegistrationSubmission,
};
