//! In-memory store used by tests and local runs without PostgreSQL

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::store::{EventStore, ExportHistoryStore, RecordStore, RegistrationStore};
use crate::models::{
    Collection, Event, EventStatus, ExportHistoryEntry, NewRegistration, Registration,
    RegistrationStatus, StoredRecord,
};
use crate::utils::errors::{StoreError, StoreResult};

#[derive(Default)]
struct Tables {
    events: HashMap<Uuid, Event>,
    registrations: Vec<Registration>,
    export_history: Vec<ExportHistoryEntry>,
    records: Vec<StoredRecord>,
}

/// All collections behind one lock, so every operation is atomic
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    fail_history_writes: AtomicBool,
    fail_counter_updates: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every export history insert fail with `Unavailable`
    pub fn fail_history_writes(&self, fail: bool) {
        self.fail_history_writes.store(fail, Ordering::SeqCst);
    }

    /// Make every participant counter update fail with `Unavailable`
    pub fn fail_counter_updates(&self, fail: bool) {
        self.fail_counter_updates.store(fail, Ordering::SeqCst);
    }

    /// Overwrite the participant counter, bypassing the capacity guard
    pub async fn set_participant_count(&self, id: Uuid, count: i32) -> StoreResult<()> {
        let mut tables = self.tables.lock().await;
        let event = tables.events.get_mut(&id).ok_or_else(|| StoreError::NotFound {
            entity: "event",
            id: id.to_string(),
        })?;
        event.current_participants = count;
        Ok(())
    }
}

fn newest_first<T>(items: &mut [T], key: impl Fn(&T) -> DateTime<Utc>) {
    items.sort_by(|a, b| key(b).cmp(&key(a)));
}

fn take(limit: i64) -> usize {
    usize::try_from(limit).unwrap_or(0)
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn insert(&self, event: &Event) -> StoreResult<Event> {
        let mut tables = self.tables.lock().await;
        if tables.events.contains_key(&event.id) {
            return Err(StoreError::Conflict("events_pkey".to_string()));
        }
        tables.events.insert(event.id, event.clone());
        Ok(event.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Event>> {
        Ok(self.tables.lock().await.events.get(&id).cloned())
    }

    async fn save(&self, event: &Event) -> StoreResult<Event> {
        let mut tables = self.tables.lock().await;
        let stored = tables.events.get_mut(&event.id).ok_or_else(|| StoreError::NotFound {
            entity: "event",
            id: event.id.to_string(),
        })?;

        let current_participants = stored.current_participants;
        let created_at = stored.created_at;
        *stored = event.clone();
        stored.current_participants = current_participants;
        stored.created_at = created_at;
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn update_status(&self, id: Uuid, status: EventStatus) -> StoreResult<Option<Event>> {
        let mut tables = self.tables.lock().await;
        Ok(tables.events.get_mut(&id).map(|event| {
            event.status = status;
            event.updated_at = Utc::now();
            event.clone()
        }))
    }

    async fn list_all(&self) -> StoreResult<Vec<Event>> {
        let mut events: Vec<Event> = self.tables.lock().await.events.values().cloned().collect();
        newest_first(&mut events, |e| e.created_at);
        Ok(events)
    }

    async fn list_active(&self) -> StoreResult<Vec<Event>> {
        let mut events: Vec<Event> = self
            .tables
            .lock()
            .await
            .events
            .values()
            .filter(|e| e.status == EventStatus::Active)
            .cloned()
            .collect();
        events.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(events)
    }

    async fn increment_participants(&self, id: Uuid) -> StoreResult<Option<i32>> {
        if self.fail_counter_updates.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("counter updates disabled".to_string()));
        }

        let mut tables = self.tables.lock().await;
        Ok(tables.events.get_mut(&id).and_then(|event| {
            if event.current_participants < event.max_participants {
                event.current_participants += 1;
                event.updated_at = Utc::now();
                Some(event.current_participants)
            } else {
                None
            }
        }))
    }
}

#[async_trait]
impl RegistrationStore for MemoryStore {
    async fn find_by_event_and_email(
        &self,
        event_id: Uuid,
        email: &str,
    ) -> StoreResult<Option<Registration>> {
        Ok(self
            .tables
            .lock()
            .await
            .registrations
            .iter()
            .find(|r| r.event_id == event_id && r.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn insert(&self, registration: NewRegistration) -> StoreResult<Registration> {
        let mut tables = self.tables.lock().await;

        let duplicate = tables.registrations.iter().any(|r| {
            r.event_id == registration.event_id && r.email.eq_ignore_ascii_case(&registration.email)
        });
        if duplicate {
            return Err(StoreError::Conflict("uq_registrations_event_email".to_string()));
        }

        let stored = Registration {
            id: Uuid::new_v4(),
            event_id: registration.event_id,
            name: registration.name,
            email: registration.email,
            roll_number: registration.roll_number,
            section: registration.section,
            branch: registration.branch,
            year: registration.year,
            phone: registration.phone,
            previous_experience: registration.previous_experience,
            special_requirements: registration.special_requirements,
            how_did_you_hear: registration.how_did_you_hear,
            registration_date: Utc::now(),
            status: RegistrationStatus::Confirmed,
        };
        tables.registrations.push(stored.clone());
        Ok(stored)
    }

    async fn list_for_event(&self, event_id: Uuid) -> StoreResult<Vec<Registration>> {
        let mut registrations: Vec<Registration> = self
            .tables
            .lock()
            .await
            .registrations
            .iter()
            .filter(|r| r.event_id == event_id)
            .cloned()
            .collect();
        newest_first(&mut registrations, |r| r.registration_date);
        Ok(registrations)
    }

    async fn list_all(&self) -> StoreResult<Vec<Registration>> {
        let mut registrations = self.tables.lock().await.registrations.clone();
        newest_first(&mut registrations, |r| r.registration_date);
        Ok(registrations)
    }
}

#[async_trait]
impl ExportHistoryStore for MemoryStore {
    async fn insert(&self, entry: &ExportHistoryEntry) -> StoreResult<()> {
        if self.fail_history_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("history writes disabled".to_string()));
        }

        let mut tables = self.tables.lock().await;
        if tables.export_history.iter().any(|e| e.export_id == entry.export_id) {
            return Err(StoreError::Conflict("export_history_export_id_key".to_string()));
        }
        tables.export_history.push(entry.clone());
        Ok(())
    }

    async fn list_for_admin(&self, admin_user_id: &str, limit: i64) -> StoreResult<Vec<ExportHistoryEntry>> {
        let mut entries: Vec<ExportHistoryEntry> = self
            .tables
            .lock()
            .await
            .export_history
            .iter()
            .filter(|e| e.admin_user_id == admin_user_id)
            .cloned()
            .collect();
        newest_first(&mut entries, |e| e.timestamp);
        entries.truncate(take(limit));
        Ok(entries)
    }

    async fn list_all(&self, limit: Option<i64>) -> StoreResult<Vec<ExportHistoryEntry>> {
        let mut entries = self.tables.lock().await.export_history.clone();
        newest_first(&mut entries, |e| e.timestamp);
        if let Some(limit) = limit {
            entries.truncate(take(limit));
        }
        Ok(entries)
    }

    async fn list_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        limit: i64,
    ) -> StoreResult<Vec<ExportHistoryEntry>> {
        let mut entries: Vec<ExportHistoryEntry> = self
            .tables
            .lock()
            .await
            .export_history
            .iter()
            .filter(|e| e.timestamp >= start && e.timestamp <= end)
            .cloned()
            .collect();
        newest_first(&mut entries, |e| e.timestamp);
        entries.truncate(take(limit));
        Ok(entries)
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert(&self, collection: Collection, data: Map<String, Value>) -> StoreResult<StoredRecord> {
        let record = StoredRecord {
            id: Uuid::new_v4(),
            collection,
            data,
            created_at: Utc::now(),
        };
        self.tables.lock().await.records.push(record.clone());
        Ok(record)
    }

    async fn list(&self, collection: Collection) -> StoreResult<Vec<StoredRecord>> {
        let mut records: Vec<StoredRecord> = self
            .tables
            .lock()
            .await
            .records
            .iter()
            .filter(|r| r.collection == collection)
            .cloned()
            .collect();
        newest_first(&mut records, |r| r.created_at);
        Ok(records)
    }
}
