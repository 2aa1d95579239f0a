//! Storage traits shared by the PostgreSQL repositories and the in-memory store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::models::{
    Collection, Event, EventStatus, ExportHistoryEntry, NewRegistration, Registration,
    StoredRecord,
};
use crate::utils::errors::StoreResult;

#[async_trait]
pub trait EventStore: Send + Sync {
    async fn insert(&self, event: &Event) -> StoreResult<Event>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Event>>;

    /// Overwrite every editable field and stamp `updated_at`
    async fn save(&self, event: &Event) -> StoreResult<Event>;

    async fn update_status(&self, id: Uuid, status: EventStatus) -> StoreResult<Option<Event>>;

    /// All events, newest first
    async fn list_all(&self) -> StoreResult<Vec<Event>>;

    /// Active events, soonest date first
    async fn list_active(&self) -> StoreResult<Vec<Event>>;

    /// Add one participant unless the event is already at capacity.
    ///
    /// Returns the new count, or `None` when the event is missing or full.
    async fn increment_participants(&self, id: Uuid) -> StoreResult<Option<i32>>;
}

#[async_trait]
pub trait RegistrationStore: Send + Sync {
    /// `email` is matched case-insensitively
    async fn find_by_event_and_email(
        &self,
        event_id: Uuid,
        email: &str,
    ) -> StoreResult<Option<Registration>>;

    /// Fails with `StoreError::Conflict` when the (event, email) pair exists
    async fn insert(&self, registration: NewRegistration) -> StoreResult<Registration>;

    /// Registrations for one event, newest first
    async fn list_for_event(&self, event_id: Uuid) -> StoreResult<Vec<Registration>>;

    async fn list_all(&self) -> StoreResult<Vec<Registration>>;
}

#[async_trait]
pub trait ExportHistoryStore: Send + Sync {
    async fn insert(&self, entry: &ExportHistoryEntry) -> StoreResult<()>;

    async fn list_for_admin(&self, admin_user_id: &str, limit: i64) -> StoreResult<Vec<ExportHistoryEntry>>;

    /// Newest first; `None` returns the whole trail
    async fn list_all(&self, limit: Option<i64>) -> StoreResult<Vec<ExportHistoryEntry>>;

    async fn list_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        limit: i64,
    ) -> StoreResult<Vec<ExportHistoryEntry>>;
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn insert(&self, collection: Collection, data: Map<String, Value>) -> StoreResult<StoredRecord>;

    /// Documents in a collection, newest first
    async fn list(&self, collection: Collection) -> StoreResult<Vec<StoredRecord>>;
}
