//! Field selection and cell rendering shared by every export format

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::models::ExportRecord;
use crate::utils::helpers::{capitalize, format_locale_datetime};

/// Display names for known fields; anything else is capitalized
const HEADER_LABELS: &[(&str, &str)] = &[
    ("fullName", "FullName"),
    ("email", "Email"),
    ("phone", "Phone"),
    ("rollNumber", "RollNumber"),
    ("contactNumber", "ContactNumber"),
    ("department", "Department"),
    ("year", "Year"),
    ("section", "Section"),
    ("overallExperience", "OverallExperience"),
    ("ratings", "Ratings"),
    ("timestamp", "Timestamp"),
    ("domainInterest", "DomainInterest"),
    ("timeCommitment", "TimeCommitment"),
    ("status", "Status"),
    ("motivation", "Motivation"),
    ("previousExperience", "PreviousExperience"),
    ("submissionId", "SubmissionId"),
    ("branch", "Branch"),
    ("yearOfStudy", "YearOfStudy"),
    ("skills", "Skills"),
    ("linkedin", "LinkedIn"),
    ("github", "GitHub"),
    ("portfolio", "Portfolio"),
];

/// The field list an export uses: the selection, or every key of the first record
pub fn resolve_fields(records: &[ExportRecord], selected: &[String]) -> Vec<String> {
    if !selected.is_empty() {
        return selected.to_vec();
    }

    records
        .first()
        .map(|record| record.keys().cloned().collect())
        .unwrap_or_default()
}

pub fn header_label(field: &str) -> String {
    HEADER_LABELS
        .iter()
        .find(|(key, _)| *key == field)
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| capitalize(field))
}

/// Integral values print without a fractional part, so `4.0` reads `4`
pub fn format_number(n: &serde_json::Number) -> String {
    if n.is_f64() {
        if let Some(v) = n.as_f64() {
            if v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 {
                return (v as i64).to_string();
            }
        }
    }
    n.to_string()
}

/// `key: value` pairs for the positive numeric entries of a ratings map
fn format_ratings(ratings: &serde_json::Map<String, Value>) -> String {
    ratings
        .iter()
        .filter_map(|(key, value)| match value {
            Value::Number(n) if n.as_f64().is_some_and(|v| v > 0.0) => {
                Some(format!("{}: {}", key, format_number(n)))
            }
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Flatten a value to a single line of text.
///
/// A `ratings` map becomes `key: value` pairs, any other object or array
/// becomes compact JSON, null or missing becomes the empty string.
pub fn flatten_value(field: &str, value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::Object(map)) if field == "ratings" => format_ratings(map),
        Some(value @ (Value::Object(_) | Value::Array(_))) => value.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => format_number(n),
        Some(other) => other.to_string(),
    }
}

/// Render a timestamp-like value in locale date-time form
pub fn format_timestamp_value(value: Option<&Value>) -> String {
    let parsed: Option<DateTime<Utc>> = match value {
        None | Some(Value::Null) => return String::new(),
        Some(Value::String(s)) => DateTime::parse_from_rfc3339(s)
            .map(|ts| ts.with_timezone(&Utc))
            .ok(),
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
        Some(_) => None,
    };

    parsed
        .map(format_locale_datetime)
        .unwrap_or_else(|| "Invalid Date".to_string())
}
