//! Bearer-token extractors for admin routes

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::models::AdminPrincipal;
use crate::services::auth::{AuthService, Permission};
use crate::state::AppState;
use crate::utils::errors::PortalError;

/// Any authenticated admin, taken from the `Authorization: Bearer` header
#[derive(Debug, Clone)]
pub struct AdminUser(pub AdminPrincipal);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = PortalError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| PortalError::Authentication("Missing Authorization header".to_string()))?;

        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            PortalError::Authentication("Expected: Bearer <token>".to_string())
        })?;

        let principal = state.services.auth_service.validate_token(token)?;
        Ok(AdminUser(principal))
    }
}

/// Admin allowed to create and edit events
pub struct RequireEventManager(pub AdminPrincipal);

impl FromRequestParts<AppState> for RequireEventManager {
    type Rejection = PortalError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AdminUser(principal) = AdminUser::from_request_parts(parts, state).await?;
        AuthService::require_permission(&principal, Permission::ManageEvents)?;
        Ok(RequireEventManager(principal))
    }
}
