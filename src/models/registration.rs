//! Registration model

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

const YEAR_DISPLAY: [(&str, &str); 4] = [
    ("1", "1st Year"),
    ("2", "2nd Year"),
    ("3", "3rd Year"),
    ("4", "4th Year"),
];

/// Convert a display-style year ("2nd Year") to its digit form ("2").
///
/// Digit forms are returned as-is and unknown values pass through unchanged,
/// so the result is always safe to feed back in.
pub fn normalize_year(year: &str) -> String {
    let year = year.trim();
    YEAR_DISPLAY
        .iter()
        .find(|(digit, display)| year == *digit || year == *display)
        .map(|(digit, _)| digit.to_string())
        .unwrap_or_else(|| year.to_string())
}

/// Convert a digit year ("3") to its display form ("3rd Year")
pub fn format_year_for_display(year: &str) -> String {
    YEAR_DISPLAY
        .iter()
        .find(|(digit, _)| year == *digit)
        .map(|(_, display)| display.to_string())
        .unwrap_or_else(|| year.to_string())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: Uuid,
    pub event_id: Uuid,
    pub name: String,
    pub email: String,
    pub roll_number: String,
    pub section: String,
    pub branch: String,
    /// Always the digit string "1".."4"
    pub year: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_experience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_requirements: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub how_did_you_hear: Option<String>,
    pub registration_date: DateTime<Utc>,
    pub status: RegistrationStatus,
}

impl Registration {
    /// Copy with the year rewritten to its display form
    pub fn for_display(&self) -> Self {
        let mut registration = self.clone();
        registration.year = format_year_for_display(&self.year);
        registration
    }

    /// Flatten into an export record
    pub fn to_record(&self) -> Map<String, Value> {
        match serde_json::to_value(self.for_display()) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    #[default]
    Confirmed,
    Cancelled,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::Confirmed => "confirmed",
            RegistrationStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "confirmed" => Some(RegistrationStatus::Confirmed),
            "cancelled" => Some(RegistrationStatus::Cancelled),
            _ => None,
        }
    }
}

/// Raw registrant submission as entered in the public form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationSubmission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub roll_number: String,
    #[serde(default)]
    pub section: String,
    #[serde(default)]
    pub branch: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub previous_experience: Option<String>,
    #[serde(default)]
    pub special_requirements: Option<String>,
    #[serde(default)]
    pub how_did_you_hear: Option<String>,
}

/// Validated registration ready to be persisted
#[derive(Debug, Clone)]
pub struct NewRegistration {
    pub event_id: Uuid,
    pub name: String,
    pub email: String,
    pub roll_number: String,
    pub section: String,
    pub branch: String,
    pub year: String,
    pub phone: Option<String>,
    pub previous_experience: Option<String>,
    pub special_requirements: Option<String>,
    pub how_did_you_hear: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationStats {
    pub total: usize,
    pub by_branch: BTreeMap<String, usize>,
    pub by_year: BTreeMap<String, usize>,
    pub by_section: BTreeMap<String, usize>,
}

impl RegistrationStats {
    pub fn from_registrations(registrations: &[Registration]) -> Self {
        let mut stats = Self {
            total: registrations.len(),
            ..Self::default()
        };

        for registration in registrations {
            *stats.by_branch.entry(registration.branch.clone()).or_default() += 1;
            *stats
                .by_year
                .entry(format_year_for_display(&registration.year))
                .or_default() += 1;
            *stats.by_section.entry(registration.section.clone()).or_default() += 1;
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(branch: &str, year: &str, section: &str) -> Registration {
        Registration {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            roll_number: "21CS001".to_string(),
            section: section.to_string(),
            branch: branch.to_string(),
            year: year.to_string(),
            phone: None,
            previous_experience: None,
            special_requirements: None,
            how_did_you_hear: None,
            registration_date: Utc::now(),
            status: RegistrationStatus::Confirmed,
        }
    }

    #[test]
    fn test_year_conversions() {
        assert_eq!(normalize_year("1st Year"), "1");
        assert_eq!(normalize_year("4"), "4");
        assert_eq!(normalize_year("5th Year"), "5th Year");
        assert_eq!(format_year_for_display("3"), "3rd Year");
        assert_eq!(format_year_for_display("3rd Year"), "3rd Year");
    }

    #[test]
    fn test_record_uses_display_year() {
        let record = registration("CSE", "2", "A").to_record();
        assert_eq!(record["year"], "2nd Year");
        assert_eq!(record["rollNumber"], "21CS001");
        assert_eq!(record["status"], "confirmed");
        assert!(record.get("phone").is_none());
    }

    #[test]
    fn test_stats_group_counts() {
        let stats = RegistrationStats::from_registrations(&[
            registration("CSE", "1", "A"),
            registration("CSE", "2", "B"),
            registration("IT", "1", "A"),
        ]);

        assert_eq!(stats.total, 3);
        assert_eq!(stats.by_branch["CSE"], 2);
        assert_eq!(stats.by_year["1st Year"], 2);
        assert_eq!(stats.by_section["B"], 1);
    }
}
