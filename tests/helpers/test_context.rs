//! In-memory application context for integration tests

use std::sync::Arc;

use axum::Router;
use chrono::NaiveDate;
use community_portal::config::Settings;
use community_portal::database::{DatabaseService, MemoryStore};
use community_portal::models::{AdminPrincipal, AdminRole, CreateEventRequest, Event, FormConfig};
use community_portal::services::ServiceFactory;
use community_portal::{create_router, AppState};

pub const TEST_JWT_SECRET: &str = "integration-test-secret";

/// Settings suitable for tests: fixed secret, no export copies on disk
pub fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.auth.jwt_secret = TEST_JWT_SECRET.to_string();
    settings
}

pub fn principal(role: AdminRole) -> AdminPrincipal {
    let id = format!("{}-1", role.as_str());
    let email = format!("{}@portal.test", role.as_str());
    AdminPrincipal::new(id, email, role)
}

/// Application wired to an in-memory store
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub state: AppState,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_settings(test_settings())
    }

    pub fn with_settings(settings: Settings) -> Self {
        let store = Arc::new(MemoryStore::new());
        let db = DatabaseService::in_memory(store.clone());
        let state = AppState::new(settings, db, None);
        Self { store, state }
    }

    pub fn services(&self) -> &ServiceFactory {
        &self.state.services
    }

    pub fn router(&self) -> Router {
        create_router(self.state.clone())
    }

    /// Bearer header value for an admin of the given role
    pub fn bearer(&self, role: AdminRole) -> String {
        let token = self
            .services()
            .auth_service
            .issue_token(&principal(role))
            .expect("token issued");
        format!("Bearer {}", token)
    }

    pub async fn create_event(&self, title: &str, max_participants: i32, form_config: FormConfig) -> Event {
        let request = CreateEventRequest {
            title: title.to_string(),
            description: "Hands-on session".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 11, 20).expect("valid date"),
            time: "16:00".to_string(),
            location: "Lab 3".to_string(),
            instructor: "Dr. Rao".to_string(),
            max_participants,
            status: None,
            form_config,
            content: Default::default(),
        };

        self.services()
            .event_catalog
            .create_event(request, &principal(AdminRole::Admin))
            .await
            .expect("event created")
    }
}
