use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::database::health_check;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub database: &'static str,
    pub version: &'static str,
}

/// Liveness plus database reachability
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthStatus>) {
    let database = match &state.pool {
        Some(pool) => match health_check(pool).await {
            Ok(()) => "up",
            Err(e) => {
                tracing::error!(error = %e, "Database health check failed");
                "down"
            }
        },
        None => "memory",
    };

    let (code, status) = if database == "down" {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    } else {
        (StatusCode::OK, "ok")
    };

    (
        code,
        Json(HealthStatus {
            status,
            database,
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}
