//! Registration repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::database::store::RegistrationStore;
use crate::models::{NewRegistration, Registration, RegistrationStatus};
use crate::utils::errors::{StoreError, StoreResult};

const REGISTRATION_COLUMNS: &str = "id, event_id, name, email, roll_number, section, branch, year, \
     phone, previous_experience, special_requirements, how_did_you_hear, registration_date, status";

#[derive(Debug, FromRow)]
struct RegistrationRow {
    id: Uuid,
    event_id: Uuid,
    name: String,
    email: String,
    roll_number: String,
    section: String,
    branch: String,
    year: String,
    phone: Option<String>,
    previous_experience: Option<String>,
    special_requirements: Option<String>,
    how_did_you_hear: Option<String>,
    registration_date: DateTime<Utc>,
    status: String,
}

impl RegistrationRow {
    fn into_registration(self) -> StoreResult<Registration> {
        let status = RegistrationStatus::parse(&self.status).ok_or_else(|| {
            StoreError::Corrupt(format!("registration {} has status {:?}", self.id, self.status))
        })?;

        Ok(Registration {
            id: self.id,
            event_id: self.event_id,
            name: self.name,
            email: self.email,
            roll_number: self.roll_number,
            section: self.section,
            branch: self.branch,
            year: self.year,
            phone: self.phone,
            previous_experience: self.previous_experience,
            special_requirements: self.special_requirements,
            how_did_you_hear: self.how_did_you_hear,
            registration_date: self.registration_date,
            status,
        })
    }
}

fn into_registrations(rows: Vec<RegistrationRow>) -> StoreResult<Vec<Registration>> {
    rows.into_iter().map(RegistrationRow::into_registration).collect()
}

#[derive(Clone)]
pub struct RegistrationRepository {
    pool: PgPool,
}

impl RegistrationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RegistrationStore for RegistrationRepository {
    async fn find_by_event_and_email(
        &self,
        event_id: Uuid,
        email: &str,
    ) -> StoreResult<Option<Registration>> {
        let row = sqlx::query_as::<_, RegistrationRow>(&format!(
            "SELECT {REGISTRATION_COLUMNS} FROM registrations WHERE event_id = $1 AND lower(email) = lower($2)"
        ))
        .bind(event_id)
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(RegistrationRow::into_registration).transpose()
    }

    async fn insert(&self, registration: NewRegistration) -> StoreResult<Registration> {
        let row = sqlx::query_as::<_, RegistrationRow>(&format!(
            r#"
            INSERT INTO registrations (id, event_id, name, email, roll_number, section, branch, year,
                                       phone, previous_experience, special_requirements, how_did_you_hear,
                                       registration_date, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {REGISTRATION_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(registration.event_id)
        .bind(registration.name)
        .bind(registration.email)
        .bind(registration.roll_number)
        .bind(registration.section)
        .bind(registration.branch)
        .bind(registration.year)
        .bind(registration.phone)
        .bind(registration.previous_experience)
        .bind(registration.special_requirements)
        .bind(registration.how_did_you_hear)
        .bind(Utc::now())
        .bind(RegistrationStatus::Confirmed.as_str())
        .fetch_one(&self.pool)
        .await?;

        row.into_registration()
    }

    async fn list_for_event(&self, event_id: Uuid) -> StoreResult<Vec<Registration>> {
        let rows = sqlx::query_as::<_, RegistrationRow>(&format!(
            "SELECT {REGISTRATION_COLUMNS} FROM registrations WHERE event_id = $1 ORDER BY registration_date DESC"
        ))
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        into_registrations(rows)
    }

    async fn list_all(&self) -> StoreResult<Vec<Registration>> {
        let rows = sqlx::query_as::<_, RegistrationRow>(&format!(
            "SELECT {REGISTRATION_COLUMNS} FROM registrations ORDER BY registration_date DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        into_registrations(rows)
    }
}
