//! Shared application state handed to every HTTP handler

use std::sync::Arc;

use crate::config::Settings;
use crate::database::DatabaseService;
use crate::services::ServiceFactory;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub services: ServiceFactory,
    /// Present when backed by PostgreSQL; used by the health check
    pub pool: Option<crate::database::DatabasePool>,
}

impl AppState {
    pub fn new(settings: Settings, db: DatabaseService, pool: Option<crate::database::DatabasePool>) -> Self {
        let services = ServiceFactory::new(&settings, db);
        Self {
            settings: Arc::new(settings),
            services,
            pool,
        }
    }
}
