//! Registration workflow
//!
//! Validates a submission against the owning event's form configuration,
//! enforces one registration per (event, email) and the event's capacity, then
//! persists the registration and bumps the participant counter.
//!
//! The registration row is the source of truth. The participant counter is a
//! display cache updated with a conditional increment after the insert; a
//! failed counter update is logged and never fails the registration.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::database::DatabaseService;
use crate::models::{FormConfig, NewRegistration, Registration, RegistrationStats, RegistrationSubmission};
use crate::utils::errors::{RegistrationError, RegistrationResult, Result, StoreError};
use crate::utils::helpers::EMAIL_RE;
use crate::utils::logging::{log_best_effort_failure, log_registration_outcome};

pub use crate::models::registration::{format_year_for_display, normalize_year};

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{10}$").expect("valid regex"));

/// Check a submission against a form configuration, collecting every violated rule
pub fn validate_registration(
    submission: &RegistrationSubmission,
    form_config: &FormConfig,
) -> std::result::Result<(), Vec<String>> {
    let mut errors = Vec::new();

    let required = [
        ("name", &submission.name),
        ("email", &submission.email),
        ("rollNumber", &submission.roll_number),
        ("section", &submission.section),
        ("branch", &submission.branch),
        ("year", &submission.year),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            errors.push(format!("{} is required", field));
        }
    }

    let email = submission.email.trim();
    if !email.is_empty() && !EMAIL_RE.is_match(email) {
        errors.push("Please enter a valid email address".to_string());
    }

    if !submission.section.is_empty() && !form_config.section_options.contains(&submission.section) {
        errors.push("Invalid section selected".to_string());
    }

    if !submission.branch.is_empty() && !form_config.branch_options.contains(&submission.branch) {
        errors.push("Invalid branch selected".to_string());
    }

    if !submission.year.is_empty() && !form_config.year_options.contains(&normalize_year(&submission.year)) {
        errors.push("Invalid year selected".to_string());
    }

    if form_config.optional_fields.phone {
        if let Some(phone) = submission.phone.as_deref().filter(|p| !p.is_empty()) {
            if !PHONE_RE.is_match(phone) {
                errors.push("Please enter a valid 10-digit phone number".to_string());
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Keep an optional answer only when its field is enabled and non-blank
fn optional_answer(enabled: bool, value: Option<String>) -> Option<String> {
    value
        .filter(|_| enabled)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn storage_failure(error: StoreError) -> RegistrationError {
    warn!(error_kind = error.kind(), error = %error, "Registration storage failure");
    RegistrationError::Storage(error)
}

/// Event sign-ups: validation, duplicate and capacity checks, persistence
#[derive(Clone)]
pub struct RegistrationWorkflow {
    db: DatabaseService,
}

impl RegistrationWorkflow {
    /// Create a new RegistrationWorkflow instance
    pub fn new(db: DatabaseService) -> Self {
        Self { db }
    }

    /// Register a submitter for an event, checking it against `form_config`
    pub async fn register_for_event(
        &self,
        event_id: Uuid,
        submission: RegistrationSubmission,
        form_config: &FormConfig,
    ) -> RegistrationResult<Registration> {
        let email = submission.email.trim().to_lowercase();
        let result = self.attempt(event_id, submission, form_config).await;

        match &result {
            Ok(registration) => {
                log_registration_outcome(event_id, &email, "confirmed", Some(&registration.id.to_string()))
            }
            Err(e) => log_registration_outcome(event_id, &email, "rejected", Some(&e.to_string())),
        }

        result
    }

    async fn attempt(
        &self,
        event_id: Uuid,
        submission: RegistrationSubmission,
        form_config: &FormConfig,
    ) -> RegistrationResult<Registration> {
        validate_registration(&submission, form_config).map_err(RegistrationError::Validation)?;

        let email = submission.email.trim().to_lowercase();

        let existing = self
            .db
            .registrations
            .find_by_event_and_email(event_id, &email)
            .await
            .map_err(storage_failure)?;
        if existing.is_some() {
            return Err(RegistrationError::AlreadyRegistered);
        }

        let event = self
            .db
            .events
            .find_by_id(event_id)
            .await
            .map_err(storage_failure)?
            .ok_or(RegistrationError::EventNotFound)?;
        if event.is_full() {
            return Err(RegistrationError::EventFull);
        }

        let optional = &form_config.optional_fields;
        let new_registration = NewRegistration {
            event_id,
            name: submission.name.trim().to_string(),
            email,
            roll_number: submission.roll_number.trim().to_string(),
            section: submission.section,
            branch: submission.branch,
            year: normalize_year(&submission.year),
            phone: optional_answer(optional.phone, submission.phone),
            previous_experience: optional_answer(optional.previous_experience, submission.previous_experience),
            special_requirements: optional_answer(
                optional.special_requirements,
                submission.special_requirements,
            ),
            how_did_you_hear: optional_answer(optional.how_did_you_hear, submission.how_did_you_hear),
        };

        let registration = match self.db.registrations.insert(new_registration).await {
            Ok(registration) => registration,
            // Lost a race with a concurrent submission for the same email
            Err(StoreError::Conflict(_)) => return Err(RegistrationError::AlreadyRegistered),
            Err(e) => return Err(storage_failure(e)),
        };

        self.bump_participant_count(event_id).await;

        Ok(registration)
    }

    async fn bump_participant_count(&self, event_id: Uuid) {
        match self.db.events.increment_participants(event_id).await {
            Ok(Some(count)) => debug!(event_id = %event_id, count = count, "Participant count updated"),
            // The row is already stored, so the event now holds more
            // registrations than seats.
            Ok(None) => error!(
                event_id = %event_id,
                "Registration stored over capacity; participant count not updated"
            ),
            Err(e) => log_best_effort_failure("increment_participants", &event_id.to_string(), &e),
        }
    }

    /// Registrations for one event, newest first, years in display form
    pub async fn event_registrations(&self, event_id: Uuid) -> Result<Vec<Registration>> {
        let registrations = self.db.registrations.list_for_event(event_id).await?;
        Ok(registrations.iter().map(Registration::for_display).collect())
    }

    /// Every registration across events, newest first, years in display form
    pub async fn all_registrations(&self) -> Result<Vec<Registration>> {
        let registrations = self.db.registrations.list_all().await?;
        Ok(registrations.iter().map(Registration::for_display).collect())
    }

    pub async fn registration_stats(&self, event_id: Uuid) -> Result<RegistrationStats> {
        let registrations = self.db.registrations.list_for_event(event_id).await?;
        Ok(RegistrationStats::from_registrations(&registrations))
    }
}
