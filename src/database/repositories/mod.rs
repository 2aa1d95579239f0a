//! Database repositories module
//!
//! PostgreSQL implementations of the storage traits

pub mod event;
pub mod export_history;
pub mod record;
pub mod registration;

pub use event::EventRepository;
pub use export_history::ExportHistoryRepository;
pub use record::RecordRepository;
pub use registration::RegistrationRepository;
