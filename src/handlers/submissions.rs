//! Public form submissions

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::models::StoredRecord;
use crate::state::AppState;
use crate::utils::errors::Result;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub id: Uuid,
    pub submission_id: Option<String>,
}

impl From<StoredRecord> for SubmissionReceipt {
    fn from(record: StoredRecord) -> Self {
        Self {
            id: record.id,
            submission_id: record
                .data
                .get("submissionId")
                .and_then(Value::as_str)
                .map(str::to_string),
        }
    }
}

pub async fn submit_feedback(
    State(state): State<AppState>,
    Json(document): Json<Map<String, Value>>,
) -> Result<(StatusCode, Json<SubmissionReceipt>)> {
    let record = state.services.submission_service.submit_feedback(document).await?;
    Ok((StatusCode::CREATED, Json(record.into())))
}

pub async fn submit_career_application(
    State(state): State<AppState>,
    Json(document): Json<Map<String, Value>>,
) -> Result<(StatusCode, Json<SubmissionReceipt>)> {
    let record = state
        .services
        .submission_service
        .submit_career_application(document)
        .await?;
    Ok((StatusCode::CREATED, Json(record.into())))
}
