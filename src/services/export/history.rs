//! Export history queries
//!
//! Admins may read their own trail; the global trail, range queries and
//! statistics require the super admin role.

use chrono::{DateTime, Utc};

use super::ExportService;
use crate::models::{AdminPrincipal, ExportHistoryEntry, ExportStatistics};
use crate::services::auth::{AuthService, Permission};
use crate::utils::errors::{PortalError, Result};
use crate::utils::logging::log_access_denied;

/// The requested page size, or `default`; zero and negative sizes are rejected
fn page_limit(requested: Option<i64>, default: i64) -> Result<i64> {
    match requested {
        Some(limit) if limit < 1 => Err(PortalError::InvalidInput(format!(
            "limit must be at least 1, got {}",
            limit
        ))),
        Some(limit) => Ok(limit),
        None => Ok(default),
    }
}

impl ExportService {
    /// Exports made by `admin_user_id`, newest first
    pub async fn history_for_admin(
        &self,
        principal: &AdminPrincipal,
        admin_user_id: &str,
        limit: Option<i64>,
    ) -> Result<Vec<ExportHistoryEntry>> {
        if principal.id != admin_user_id && !principal.is_super_admin() {
            log_access_denied(&principal.id, principal.role.as_str(), "export_history");
            return Err(PortalError::PermissionDenied(
                "Only super admins can view other admins' export history".to_string(),
            ));
        }

        let limit = page_limit(limit, self.config.admin_history_limit)?;
        Ok(self.db.export_history.list_for_admin(admin_user_id, limit).await?)
    }

    pub async fn all_history(
        &self,
        principal: &AdminPrincipal,
        limit: Option<i64>,
    ) -> Result<Vec<ExportHistoryEntry>> {
        AuthService::require_permission(principal, Permission::ViewExportHistory)?;

        let limit = page_limit(limit, self.config.global_history_limit)?;
        Ok(self.db.export_history.list_all(Some(limit)).await?)
    }

    pub async fn history_in_range(
        &self,
        principal: &AdminPrincipal,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        limit: Option<i64>,
    ) -> Result<Vec<ExportHistoryEntry>> {
        AuthService::require_permission(principal, Permission::ViewExportHistory)?;

        if start > end {
            return Err(PortalError::InvalidInput(
                "Range start must not be after range end".to_string(),
            ));
        }

        let limit = page_limit(limit, self.config.global_history_limit)?;
        Ok(self.db.export_history.list_in_range(start, end, limit).await?)
    }

    /// Aggregate counts over the whole trail
    pub async fn statistics(&self, principal: &AdminPrincipal) -> Result<ExportStatistics> {
        AuthService::require_permission(principal, Permission::ViewExportHistory)?;

        let entries = self.db.export_history.list_all(None).await?;
        Ok(ExportStatistics::from_entries(&entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExportConfig;
    use crate::database::{DatabaseService, MemoryStore};
    use crate::models::{AdminRole, ExportRecord};
    use crate::services::export::{ClientInfo, ExportOptions};
    use assert_matches::assert_matches;
    use chrono::Duration;
    use serde_json::{json, Map, Value};
    use std::sync::Arc;

    fn service() -> ExportService {
        ExportService::new(
            DatabaseService::in_memory(Arc::new(MemoryStore::new())),
            ExportConfig::default(),
        )
    }

    fn records() -> Vec<ExportRecord> {
        match json!({"fullName": "Asha", "email": "asha@example.com"}) {
            Value::Object(map) => vec![map],
            _ => unreachable!(),
        }
    }

    async fn export_as(exports: &ExportService, admin: &AdminPrincipal, format: &str) {
        let _ = exports
            .export_with_history(
                &records(),
                ExportOptions {
                    format: format.to_string(),
                    filename: "out".to_string(),
                    selected_fields: vec![],
                    export_type: "feedback".to_string(),
                    title: None,
                    acting_admin: admin.clone(),
                    filters: Map::new(),
                    client: ClientInfo::default(),
                },
            )
            .await;
    }

    #[tokio::test]
    async fn test_own_history_visible_to_admin() {
        let exports = service();
        let admin = AdminPrincipal::new("a1", "a1@example.com", AdminRole::Admin);
        let other = AdminPrincipal::new("a2", "a2@example.com", AdminRole::Admin);
        export_as(&exports, &admin, "csv").await;
        export_as(&exports, &other, "csv").await;

        let own = exports.history_for_admin(&admin, "a1", None).await.unwrap();
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].admin_email, "a1@example.com");

        assert_matches!(
            exports.history_for_admin(&admin, "a2", None).await,
            Err(PortalError::PermissionDenied(_))
        );
    }

    #[tokio::test]
    async fn test_global_views_require_super_admin() {
        let exports = service();
        let admin = AdminPrincipal::new("a1", "a1@example.com", AdminRole::Admin);

        assert_matches!(exports.all_history(&admin, None).await, Err(PortalError::PermissionDenied(_)));
        assert_matches!(exports.statistics(&admin).await, Err(PortalError::PermissionDenied(_)));
        let now = Utc::now();
        assert_matches!(
            exports.history_in_range(&admin, now - Duration::days(1), now, None).await,
            Err(PortalError::PermissionDenied(_))
        );
    }

    #[tokio::test]
    async fn test_statistics() {
        let exports = service();
        let admin = AdminPrincipal::new("a1", "a1@example.com", AdminRole::Admin);
        let root = AdminPrincipal::new("s1", "root@example.com", AdminRole::SuperAdmin);
        export_as(&exports, &admin, "csv").await;
        export_as(&exports, &admin, "html").await;
        export_as(&exports, &root, "pdf").await;

        let stats = exports.statistics(&root).await.unwrap();
        assert_eq!(stats.total_exports, 3);
        assert_eq!(stats.successful_exports, 2);
        assert_eq!(stats.failed_exports, 1);
        assert_eq!(stats.exports_by_format["pdf"], 1);
        assert_eq!(stats.exports_by_user["a1@example.com"], 2);
        assert_eq!(stats.total_records_exported, 3);
        assert!(stats.last_export_date.is_some());

        let all = exports.all_history(&root, Some(2)).await.unwrap();
        assert_eq!(all.len(), 2);

        let now = Utc::now();
        let ranged = exports
            .history_in_range(&root, now - Duration::hours(1), now + Duration::hours(1), None)
            .await
            .unwrap();
        assert_eq!(ranged.len(), 3);
    }

    #[tokio::test]
    async fn test_non_positive_limits_are_rejected() {
        let exports = service();
        let admin = AdminPrincipal::new("a1", "a1@example.com", AdminRole::Admin);
        let root = AdminPrincipal::new("s1", "root@example.com", AdminRole::SuperAdmin);
        export_as(&exports, &admin, "csv").await;

        assert_matches!(
            exports.history_for_admin(&admin, "a1", Some(-1)).await,
            Err(PortalError::InvalidInput(_))
        );
        assert_matches!(
            exports.all_history(&root, Some(0)).await,
            Err(PortalError::InvalidInput(_))
        );
        let now = Utc::now();
        assert_matches!(
            exports
                .history_in_range(&root, now - Duration::hours(1), now, Some(-5))
                .await,
            Err(PortalError::InvalidInput(_))
        );

        assert_eq!(exports.history_for_admin(&admin, "a1", Some(1)).await.unwrap().len(), 1);
    }

    #[test]
    fn test_page_limit_defaults_when_absent() {
        assert_eq!(page_limit(None, 50).unwrap(), 50);
        assert_eq!(page_limit(Some(7), 50).unwrap(), 7);
        assert_matches!(page_limit(Some(0), 50), Err(PortalError::InvalidInput(_)));
    }
}
