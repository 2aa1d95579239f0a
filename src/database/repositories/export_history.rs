//! Export history repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::database::store::ExportHistoryStore;
use crate::models::{ExportHistoryEntry, ExportStatus};
use crate::utils::errors::{StoreError, StoreResult};

const HISTORY_COLUMNS: &str = "id, export_id, admin_user_id, admin_email, admin_role, export_type, \
     export_format, filename, record_count, selected_fields, filters, export_size, status, \
     error_message, ip_address, user_agent, timestamp";

#[derive(Debug, FromRow)]
struct HistoryRow {
    id: Uuid,
    export_id: String,
    admin_user_id: String,
    admin_email: String,
    admin_role: String,
    export_type: String,
    export_format: String,
    filename: String,
    record_count: i64,
    selected_fields: Json<Vec<String>>,
    filters: Json<Map<String, Value>>,
    export_size: i64,
    status: String,
    error_message: Option<String>,
    ip_address: String,
    user_agent: String,
    timestamp: DateTime<Utc>,
}

impl HistoryRow {
    fn into_entry(self) -> StoreResult<ExportHistoryEntry> {
        let status = ExportStatus::parse(&self.status).ok_or_else(|| {
            StoreError::Corrupt(format!("export {} has status {:?}", self.export_id, self.status))
        })?;

        Ok(ExportHistoryEntry {
            id: self.id,
            export_id: self.export_id,
            admin_user_id: self.admin_user_id,
            admin_email: self.admin_email,
            admin_role: self.admin_role,
            export_type: self.export_type,
            export_format: self.export_format,
            filename: self.filename,
            record_count: self.record_count,
            selected_fields: self.selected_fields.0,
            filters: self.filters.0,
            export_size: self.export_size,
            status,
            error_message: self.error_message,
            ip_address: self.ip_address,
            user_agent: self.user_agent,
            timestamp: self.timestamp,
        })
    }
}

fn into_entries(rows: Vec<HistoryRow>) -> StoreResult<Vec<ExportHistoryEntry>> {
    rows.into_iter().map(HistoryRow::into_entry).collect()
}

#[derive(Clone)]
pub struct ExportHistoryRepository {
    pool: PgPool,
}

impl ExportHistoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ExportHistoryStore for ExportHistoryRepository {
    async fn insert(&self, entry: &ExportHistoryEntry) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO export_history (id, export_id, admin_user_id, admin_email, admin_role, export_type,
                                        export_format, filename, record_count, selected_fields, filters,
                                        export_size, status, error_message, ip_address, user_agent, timestamp)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            "#,
        )
        .bind(entry.id)
        .bind(&entry.export_id)
        .bind(&entry.admin_user_id)
        .bind(&entry.admin_email)
        .bind(&entry.admin_role)
        .bind(&entry.export_type)
        .bind(&entry.export_format)
        .bind(&entry.filename)
        .bind(entry.record_count)
        .bind(Json(&entry.selected_fields))
        .bind(Json(&entry.filters))
        .bind(entry.export_size)
        .bind(entry.status.as_str())
        .bind(&entry.error_message)
        .bind(&entry.ip_address)
        .bind(&entry.user_agent)
        .bind(entry.timestamp)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_for_admin(&self, admin_user_id: &str, limit: i64) -> StoreResult<Vec<ExportHistoryEntry>> {
        let rows = sqlx::query_as::<_, HistoryRow>(&format!(
            "SELECT {HISTORY_COLUMNS} FROM export_history WHERE admin_user_id = $1 ORDER BY timestamp DESC LIMIT $2"
        ))
        .bind(admin_user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        into_entries(rows)
    }

    async fn list_all(&self, limit: Option<i64>) -> StoreResult<Vec<ExportHistoryEntry>> {
        // LIMIT NULL means no limit in PostgreSQL
        let rows = sqlx::query_as::<_, HistoryRow>(&format!(
            "SELECT {HISTORY_COLUMNS} FROM export_history ORDER BY timestamp DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        into_entries(rows)
    }

    async fn list_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        limit: i64,
    ) -> StoreResult<Vec<ExportHistoryEntry>> {
        let rows = sqlx::query_as::<_, HistoryRow>(&format!(
            "SELECT {HISTORY_COLUMNS} FROM export_history \
             WHERE timestamp >= $1 AND timestamp <= $2 ORDER BY timestamp DESC LIMIT $3"
        ))
        .bind(start)
        .bind(end)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        into_entries(rows)
    }
}
