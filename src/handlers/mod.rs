//! HTTP handlers
//!
//! Public routes cover event listing, registration and the feedback and
//! career forms. Everything under `/admin` requires a bearer token; the
//! finer permission checks happen in the extractors and services.

pub mod error;
pub mod events;
pub mod exports;
pub mod health;
pub mod registrations;
pub mod submissions;

use axum::routing::{get, patch, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::middleware::trace_layer;
use crate::state::AppState;

/// Build the application router
pub fn create_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(health::health))
        .route("/events/active", get(events::list_active_events))
        .route("/events/{id}", get(events::get_event))
        .route("/events/{id}/registrations", post(registrations::register))
        .route("/feedback", post(submissions::submit_feedback))
        .route("/career-applications", post(submissions::submit_career_application));

    let admin = Router::new()
        .route("/events", get(events::list_all_events).post(events::create_event))
        .route("/events/{id}", patch(events::update_event))
        .route("/events/{id}/status", put(events::update_event_status))
        .route("/events/{id}/registrations", get(registrations::list_event_registrations))
        .route(
            "/events/{id}/registrations/stats",
            get(registrations::event_registration_stats),
        )
        .route("/registrations", get(registrations::list_all_registrations))
        .route("/exports", post(exports::create_export))
        .route("/exports/fields", get(exports::list_fields))
        .route("/exports/history", get(exports::list_history))
        .route("/exports/history/mine", get(exports::list_my_history))
        .route("/exports/stats", get(exports::export_statistics))
        .route("/backup", get(exports::create_backup));

    Router::new()
        .merge(public)
        .nest("/admin", admin)
        .layer(trace_layer())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
