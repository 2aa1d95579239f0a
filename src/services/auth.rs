//! Authentication service implementation
//!
//! Admin principals are issued by an external identity provider and arrive as
//! HS256 bearer tokens. This service validates those tokens and answers
//! role-based permission questions for the dashboard operations.

use std::collections::HashSet;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::models::{AdminPrincipal, AdminRole};
use crate::utils::errors::{PortalError, Result};
use crate::utils::logging::log_access_denied;

/// Permission levels for dashboard operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    /// Read events and registrations
    ViewDashboard,
    /// Export collections to files
    ExportData,
    /// Create and edit events
    ManageEvents,
    /// Read the global export audit trail and its statistics
    ViewExportHistory,
    /// Snapshot every collection
    CreateBackup,
}

/// JWT claims carried by admin bearer tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Admin user id at the identity provider
    pub sub: String,
    pub email: String,
    pub role: AdminRole,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

/// Issues and checks admin tokens and role permissions
#[derive(Clone)]
pub struct AuthService {
    config: AuthConfig,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    /// Issue a signed token for a principal
    pub fn issue_token(&self, principal: &AdminPrincipal) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: principal.id.clone(),
            email: principal.email.clone(),
            role: principal.role,
            exp: (now + Duration::minutes(self.config.token_ttl_minutes)).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )?;
        Ok(token)
    }

    /// Validate a token and return the principal it names
    pub fn validate_token(&self, token: &str) -> Result<AdminPrincipal> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| PortalError::Authentication(format!("Invalid or expired token: {}", e)))?;

        debug!(admin_id = %data.claims.sub, role = %data.claims.role, "Token validated");
        Ok(AdminPrincipal::new(data.claims.sub, data.claims.email, data.claims.role))
    }

    /// Permissions granted to a role; each role includes those below it
    pub fn permissions_for(role: AdminRole) -> HashSet<Permission> {
        let mut permissions = HashSet::from([Permission::ViewDashboard, Permission::ExportData]);

        if role >= AdminRole::Admin {
            permissions.insert(Permission::ManageEvents);
        }

        if role == AdminRole::SuperAdmin {
            permissions.insert(Permission::ViewExportHistory);
            permissions.insert(Permission::CreateBackup);
        }

        permissions
    }

    pub fn has_permission(principal: &AdminPrincipal, permission: Permission) -> bool {
        Self::permissions_for(principal.role).contains(&permission)
    }

    /// Require specific permission or return error
    pub fn require_permission(principal: &AdminPrincipal, permission: Permission) -> Result<()> {
        if !Self::has_permission(principal, permission) {
            log_access_denied(&principal.id, principal.role.as_str(), &format!("{:?}", permission));
            return Err(PortalError::PermissionDenied(format!(
                "Admin {} lacks required permission: {:?}",
                principal.email, permission
            )));
        }

        Ok(())
    }
}
