//! Event catalog service
//!
//! Admin-facing CRUD over events plus the public active-event listing.
//! Form configurations are stored as given; [`validate_form_config`] is
//! exposed for callers that accept configurations from admins.

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::config::RegistrationConfig;
use crate::database::DatabaseService;
use crate::models::{AdminPrincipal, CreateEventRequest, Event, EventStatus, FormConfig, UpdateEventRequest};
use crate::utils::errors::{PortalError, Result};
use crate::utils::logging::log_event_action;

/// Check that every option in a form configuration belongs to the reference vocabularies.
///
/// Violations are reported in section, branch, year order.
pub fn validate_form_config(
    config: &FormConfig,
    vocabulary: &RegistrationConfig,
) -> std::result::Result<(), Vec<String>> {
    fn subset(options: &[String], allowed: &[String]) -> bool {
        options.iter().all(|o| allowed.contains(o))
    }

    let mut errors = Vec::new();
    if !subset(&config.section_options, &vocabulary.sections) {
        errors.push("Invalid section options".to_string());
    }
    if !subset(&config.branch_options, &vocabulary.branches) {
        errors.push("Invalid branch options".to_string());
    }
    if !subset(&config.year_options, &vocabulary.years) {
        errors.push("Invalid year options".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Admin-side event management over the event store
#[derive(Clone)]
pub struct EventCatalog {
    db: DatabaseService,
    vocabulary: RegistrationConfig,
}

impl EventCatalog {
    /// Catalog whose form configurations are checked against `vocabulary`
    pub fn new(db: DatabaseService, vocabulary: RegistrationConfig) -> Self {
        Self { db, vocabulary }
    }

    /// Reference vocabularies form configurations are checked against
    pub fn vocabulary(&self) -> &RegistrationConfig {
        &self.vocabulary
    }

    /// Store a new event with an empty participant count.
    ///
    /// The title must be non-blank and the event must offer at least one seat.
    pub async fn create_event(&self, request: CreateEventRequest, admin: &AdminPrincipal) -> Result<Event> {
        if request.title.trim().is_empty() {
            return Err(PortalError::InvalidInput("Event title is required".to_string()));
        }
        if request.max_participants < 1 {
            return Err(PortalError::InvalidInput(
                "Maximum participants must be at least 1".to_string(),
            ));
        }

        let now = Utc::now();
        let event = Event {
            id: Uuid::new_v4(),
            title: request.title.trim().to_string(),
            description: request.description,
            date: request.date,
            time: request.time,
            location: request.location,
            instructor: request.instructor,
            max_participants: request.max_participants,
            current_participants: 0,
            status: request.status.unwrap_or_default(),
            form_config: request.form_config,
            content: request.content,
            created_at: now,
            updated_at: now,
        };

        let event = self.db.events.insert(&event).await?;
        log_event_action(event.id, "created", Some(&admin.id), Some(&event.title));
        Ok(event)
    }

    /// Apply a partial update; fields absent from `request` keep their values
    pub async fn update_event(
        &self,
        id: Uuid,
        request: UpdateEventRequest,
        admin: &AdminPrincipal,
    ) -> Result<Event> {
        if matches!(request.max_participants, Some(max) if max < 1) {
            return Err(PortalError::InvalidInput(
                "Maximum participants must be at least 1".to_string(),
            ));
        }

        let mut event = self.get_event(id).await?;
        request.apply_to(&mut event);

        let event = self.db.events.save(&event).await?;
        log_event_action(event.id, "updated", Some(&admin.id), None);
        Ok(event)
    }

    /// Change an event's status, failing with `EventNotFound` for unknown ids
    pub async fn update_event_status(
        &self,
        id: Uuid,
        status: EventStatus,
        admin: &AdminPrincipal,
    ) -> Result<Event> {
        let event = self
            .db
            .events
            .update_status(id, status)
            .await?
            .ok_or(PortalError::EventNotFound { event_id: id })?;

        log_event_action(id, "status_changed", Some(&admin.id), Some(status.as_str()));
        Ok(event)
    }

    pub async fn get_event(&self, id: Uuid) -> Result<Event> {
        self.db
            .events
            .find_by_id(id)
            .await?
            .ok_or(PortalError::EventNotFound { event_id: id })
    }

    /// Every event regardless of status, newest first
    pub async fn get_all_events(&self) -> Result<Vec<Event>> {
        Ok(self.db.events.list_all().await?)
    }

    /// Active events, soonest first
    pub async fn get_active_events(&self) -> Result<Vec<Event>> {
        let events = self.db.events.list_active().await?;
        debug!(count = events.len(), "Loaded active events");
        Ok(events)
    }
}
