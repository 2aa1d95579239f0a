//! Database service layer
//!
//! Bundles the four stores behind trait objects so services work the same
//! against PostgreSQL and the in-memory store.

use std::sync::Arc;

use super::connection::DatabasePool;
use super::memory::MemoryStore;
use super::repositories::{
    EventRepository, ExportHistoryRepository, RecordRepository, RegistrationRepository,
};
use super::store::{EventStore, ExportHistoryStore, RecordStore, RegistrationStore};

#[derive(Clone)]
pub struct DatabaseService {
    pub events: Arc<dyn EventStore>,
    pub registrations: Arc<dyn RegistrationStore>,
    pub export_history: Arc<dyn ExportHistoryStore>,
    pub records: Arc<dyn RecordStore>,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            events: Arc::new(EventRepository::new(pool.clone())),
            registrations: Arc::new(RegistrationRepository::new(pool.clone())),
            export_history: Arc::new(ExportHistoryRepository::new(pool.clone())),
            records: Arc::new(RecordRepository::new(pool)),
        }
    }

    /// Every store backed by the same in-memory tables
    pub fn in_memory(store: Arc<MemoryStore>) -> Self {
        Self {
            events: store.clone(),
            registrations: store.clone(),
            export_history: store.clone(),
            records: store,
        }
    }
}
