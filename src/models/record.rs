//! Opaque document collections consumed by exports and backups

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::utils::errors::PortalError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Collection {
    Feedback,
    CareerApplications,
    AdminUsers,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Feedback => "feedback",
            Collection::CareerApplications => "career-applications",
            Collection::AdminUsers => "admin-users",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Collection {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "feedback" => Ok(Collection::Feedback),
            "career-applications" => Ok(Collection::CareerApplications),
            "admin-users" => Ok(Collection::AdminUsers),
            other => Err(PortalError::InvalidInput(format!("Unknown collection: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRecord {
    pub id: Uuid,
    pub collection: Collection,
    pub data: Map<String, Value>,
    pub created_at: DateTime<Utc>,
}
