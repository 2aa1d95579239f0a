//! Event repository implementation

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::database::store::EventStore;
use crate::models::{Event, EventContent, EventStatus, FormConfig};
use crate::utils::errors::{StoreError, StoreResult};

const EVENT_COLUMNS: &str = "id, title, description, event_date, event_time, location, instructor, \
     max_participants, current_participants, status, form_config, content, created_at, updated_at";

#[derive(Debug, FromRow)]
struct EventRow {
    id: Uuid,
    title: String,
    description: String,
    event_date: NaiveDate,
    event_time: String,
    location: String,
    instructor: String,
    max_participants: i32,
    current_participants: i32,
    status: String,
    form_config: Json<FormConfig>,
    content: Json<EventContent>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl EventRow {
    fn into_event(self) -> StoreResult<Event> {
        let status = self
            .status
            .parse::<EventStatus>()
            .map_err(|_| StoreError::Corrupt(format!("event {} has status {:?}", self.id, self.status)))?;

        Ok(Event {
            id: self.id,
            title: self.title,
            description: self.description,
            date: self.event_date,
            time: self.event_time,
            location: self.location,
            instructor: self.instructor,
            max_participants: self.max_participants,
            current_participants: self.current_participants,
            status,
            form_config: self.form_config.0,
            content: self.content.0,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn into_events(rows: Vec<EventRow>) -> StoreResult<Vec<Event>> {
    rows.into_iter().map(EventRow::into_event).collect()
}

#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventStore for EventRepository {
    async fn insert(&self, event: &Event) -> StoreResult<Event> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            r#"
            INSERT INTO events (id, title, description, event_date, event_time, location, instructor,
                                max_participants, current_participants, status, form_config, content,
                                created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(event.id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.date)
        .bind(&event.time)
        .bind(&event.location)
        .bind(&event.instructor)
        .bind(event.max_participants)
        .bind(event.current_participants)
        .bind(event.status.as_str())
        .bind(Json(&event.form_config))
        .bind(Json(&event.content))
        .bind(event.created_at)
        .bind(event.updated_at)
        .fetch_one(&self.pool)
        .await?;

        row.into_event()
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Event>> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(EventRow::into_event).transpose()
    }

    async fn save(&self, event: &Event) -> StoreResult<Event> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            r#"
            UPDATE events
            SET title = $2,
                description = $3,
                event_date = $4,
                event_time = $5,
                location = $6,
                instructor = $7,
                max_participants = $8,
                status = $9,
                form_config = $10,
                content = $11,
                updated_at = $12
            WHERE id = $1
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(event.id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.date)
        .bind(&event.time)
        .bind(&event.location)
        .bind(&event.instructor)
        .bind(event.max_participants)
        .bind(event.status.as_str())
        .bind(Json(&event.form_config))
        .bind(Json(&event.content))
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or_else(|| StoreError::NotFound {
            entity: "event",
            id: event.id.to_string(),
        })?
        .into_event()
    }

    async fn update_status(&self, id: Uuid, status: EventStatus) -> StoreResult<Option<Event>> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            "UPDATE events SET status = $2, updated_at = $3 WHERE id = $1 RETURNING {EVENT_COLUMNS}"
        ))
        .bind(id)
        .bind(status.as_str())
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        row.map(EventRow::into_event).transpose()
    }

    async fn list_all(&self) -> StoreResult<Vec<Event>> {
        let rows = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        into_events(rows)
    }

    async fn list_active(&self) -> StoreResult<Vec<Event>> {
        let rows = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE status = 'active' ORDER BY event_date ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        into_events(rows)
    }

    async fn increment_participants(&self, id: Uuid) -> StoreResult<Option<i32>> {
        let count = sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE events
            SET current_participants = current_participants + 1,
                updated_at = NOW()
            WHERE id = $1 AND current_participants < max_participants
            RETURNING current_participants
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(count)
    }
}
