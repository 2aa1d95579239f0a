//! Public form submissions: feedback and career applications

use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use tracing::info;

use crate::database::DatabaseService;
use crate::models::{Collection, ExportRecord, StoredRecord};
use crate::utils::errors::{PortalError, Result};
use crate::utils::helpers::{generate_base36_string, EMAIL_RE};

fn text_field<'a>(document: &'a Map<String, Value>, key: &str) -> &'a str {
    document.get(key).and_then(Value::as_str).map(str::trim).unwrap_or("")
}

/// Contact fields every public form requires
fn validate_contact(document: &Map<String, Value>) -> Result<()> {
    let mut errors = Vec::new();

    if text_field(document, "fullName").is_empty() {
        errors.push("Full name is required");
    }

    let email = text_field(document, "email");
    if email.is_empty() {
        errors.push("Email is required");
    } else if !EMAIL_RE.is_match(email) {
        errors.push("Please enter a valid email address");
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(PortalError::InvalidInput(errors.join(", ")))
    }
}

/// Stamp the server-controlled fields, overwriting any client-supplied values
fn stamp(mut document: Map<String, Value>) -> Map<String, Value> {
    document.insert(
        "timestamp".to_string(),
        Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
    );
    document.insert("submissionId".to_string(), Value::String(generate_base36_string(9)));
    document
}

/// Flatten a stored document into an export record with its id first
pub fn to_export_record(record: StoredRecord) -> ExportRecord {
    let mut flat = Map::with_capacity(record.data.len() + 1);
    flat.insert("id".to_string(), Value::String(record.id.to_string()));
    flat.extend(record.data);
    flat
}

/// Intake for the public feedback and career application forms
#[derive(Clone)]
pub struct SubmissionService {
    db: DatabaseService,
}

impl SubmissionService {
    /// Create a new SubmissionService instance
    pub fn new(db: DatabaseService) -> Self {
        Self { db }
    }

    pub async fn submit_feedback(&self, document: Map<String, Value>) -> Result<StoredRecord> {
        validate_contact(&document)?;

        let record = self.db.records.insert(Collection::Feedback, stamp(document)).await?;
        info!(record_id = %record.id, "Feedback submitted");
        Ok(record)
    }

    pub async fn submit_career_application(&self, document: Map<String, Value>) -> Result<StoredRecord> {
        validate_contact(&document)?;

        let mut document = stamp(document);
        document.insert("status".to_string(), Value::String("pending".to_string()));

        let record = self
            .db
            .records
            .insert(Collection::CareerApplications, document)
            .await?;
        info!(record_id = %record.id, "Career application submitted");
        Ok(record)
    }

    /// Every document in a collection as export records, newest first
    pub async fn documents(&self, collection: Collection) -> Result<Vec<ExportRecord>> {
        let records = self.db.records.list(collection).await?;
        Ok(records.into_iter().map(to_export_record).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;
    use assert_matches::assert_matches;
    use serde_json::json;
    use std::sync::Arc;

    fn document(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    fn service() -> SubmissionService {
        SubmissionService::new(DatabaseService::in_memory(Arc::new(MemoryStore::new())))
    }

    #[tokio::test]
    async fn test_feedback_is_stamped() {
        let submissions = service();
        let record = submissions
            .submit_feedback(document(json!({
                "fullName": "Asha",
                "email": "asha@example.com",
                "ratings": {"content": 5},
                "submissionId": "client-chosen"
            })))
            .await
            .unwrap();

        let id = record.data["submissionId"].as_str().unwrap();
        assert_eq!(id.len(), 9);
        assert_ne!(id, "client-chosen");
        assert!(record.data["timestamp"].as_str().unwrap().ends_with('Z'));
        assert!(record.data.get("status").is_none());
    }

    #[tokio::test]
    async fn test_application_marked_pending() {
        let submissions = service();
        submissions
            .submit_career_application(document(json!({
                "fullName": "Ravi",
                "email": "ravi@example.com",
                "status": "accepted"
            })))
            .await
            .unwrap();

        let documents = submissions.documents(Collection::CareerApplications).await.unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0]["status"], "pending");
        assert_eq!(documents[0].keys().next().map(String::as_str), Some("id"));
    }

    #[tokio::test]
    async fn test_contact_fields_required() {
        let result = service()
            .submit_feedback(document(json!({"email": "nope"})))
            .await;
        assert_matches!(
            result,
            Err(PortalError::InvalidInput(msg)) if msg == "Full name is required, Please enter a valid email address"
        );
    }
}
