//! Document repository for the opaque collections

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::database::store::RecordStore;
use crate::models::{Collection, StoredRecord};
use crate::utils::errors::{StoreError, StoreResult};

#[derive(Debug, FromRow)]
struct RecordRow {
    id: Uuid,
    collection: String,
    data: Json<Map<String, Value>>,
    created_at: DateTime<Utc>,
}

impl RecordRow {
    fn into_record(self) -> StoreResult<StoredRecord> {
        let collection = self.collection.parse::<Collection>().map_err(|_| {
            StoreError::Corrupt(format!("record {} is in collection {:?}", self.id, self.collection))
        })?;

        Ok(StoredRecord {
            id: self.id,
            collection,
            data: self.data.0,
            created_at: self.created_at,
        })
    }
}

#[derive(Clone)]
pub struct RecordRepository {
    pool: PgPool,
}

impl RecordRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for RecordRepository {
    async fn insert(&self, collection: Collection, data: Map<String, Value>) -> StoreResult<StoredRecord> {
        let row = sqlx::query_as::<_, RecordRow>(
            r#"
            INSERT INTO records (id, collection, data, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, collection, data, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(collection.as_str())
        .bind(Json(&data))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        row.into_record()
    }

    async fn list(&self, collection: Collection) -> StoreResult<Vec<StoredRecord>> {
        let rows = sqlx::query_as::<_, RecordRow>(
            "SELECT id, collection, data, created_at FROM records WHERE collection = $1 ORDER BY created_at DESC",
        )
        .bind(collection.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(RecordRow::into_record).collect()
    }
}
