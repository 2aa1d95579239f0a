//! Registration endpoints

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::middleware::AdminUser;
use crate::models::{Registration, RegistrationStats, RegistrationSubmission};
use crate::state::AppState;
use crate::utils::errors::{PortalError, RegistrationError, Result};

/// Register for an event using the event's own form configuration
pub async fn register(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Json(submission): Json<RegistrationSubmission>,
) -> Result<(StatusCode, Json<Registration>)> {
    let event = state
        .services
        .event_catalog
        .get_event(event_id)
        .await
        .map_err(|e| match e {
            PortalError::EventNotFound { .. } => PortalError::Registration(RegistrationError::EventNotFound),
            other => other,
        })?;

    let registration = state
        .services
        .registration_workflow
        .register_for_event(event_id, submission, &event.form_config)
        .await?;

    Ok((StatusCode::CREATED, Json(registration)))
}

pub async fn list_event_registrations(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(event_id): Path<Uuid>,
) -> Result<Json<Vec<Registration>>> {
    Ok(Json(state.services.registration_workflow.event_registrations(event_id).await?))
}

pub async fn event_registration_stats(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(event_id): Path<Uuid>,
) -> Result<Json<RegistrationStats>> {
    Ok(Json(state.services.registration_workflow.registration_stats(event_id).await?))
}

pub async fn list_all_registrations(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<Vec<Registration>>> {
    Ok(Json(state.services.registration_workflow.all_registrations().await?))
}
