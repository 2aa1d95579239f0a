//! Event endpoints: public listing and admin management

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::middleware::{AdminUser, RequireEventManager};
use crate::models::{CreateEventRequest, Event, EventStatus, FormConfig, UpdateEventRequest};
use crate::services::validate_form_config;
use crate::state::AppState;
use crate::utils::errors::{PortalError, Result};

fn check_form_config(state: &AppState, config: &FormConfig) -> Result<()> {
    validate_form_config(config, state.services.event_catalog.vocabulary())
        .map_err(|errors| PortalError::InvalidInput(errors.join(", ")))
}

pub async fn list_active_events(State(state): State<AppState>) -> Result<Json<Vec<Event>>> {
    Ok(Json(state.services.event_catalog.get_active_events().await?))
}

pub async fn get_event(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Event>> {
    Ok(Json(state.services.event_catalog.get_event(id).await?))
}

pub async fn list_all_events(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<Vec<Event>>> {
    Ok(Json(state.services.event_catalog.get_all_events().await?))
}

pub async fn create_event(
    State(state): State<AppState>,
    RequireEventManager(admin): RequireEventManager,
    Json(request): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<Event>)> {
    check_form_config(&state, &request.form_config)?;

    let event = state.services.event_catalog.create_event(request, &admin).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn update_event(
    State(state): State<AppState>,
    RequireEventManager(admin): RequireEventManager,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateEventRequest>,
) -> Result<Json<Event>> {
    if let Some(config) = &request.form_config {
        check_form_config(&state, config)?;
    }

    Ok(Json(state.services.event_catalog.update_event(id, request, &admin).await?))
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: EventStatus,
}

pub async fn update_event_status(
    State(state): State<AppState>,
    RequireEventManager(admin): RequireEventManager,
    Path(id): Path<Uuid>,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<Event>> {
    let event = state
        .services
        .event_catalog
        .update_event_status(id, update.status, &admin)
        .await?;
    Ok(Json(event))
}
