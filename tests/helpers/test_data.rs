//! Test data helpers for registrations and form submissions

use community_portal::models::{FormConfig, OptionalFields, RegistrationSubmission};
use fake::faker::name::en::Name;
use fake::Fake;
use serde_json::{json, Map, Value};

/// Form accepting sections A/B, branches CSE/IT and every year
pub fn standard_form_config() -> FormConfig {
    FormConfig {
        section_options: vec!["A".to_string(), "B".to_string()],
        branch_options: vec!["CSE".to_string(), "IT".to_string()],
        year_options: ["1", "2", "3", "4"].iter().map(|y| y.to_string()).collect(),
        optional_fields: OptionalFields {
            phone: true,
            ..OptionalFields::default()
        },
        how_did_you_hear_options: Vec::new(),
    }
}

pub fn submission(name: &str, email: &str, year: &str) -> RegistrationSubmission {
    RegistrationSubmission {
        name: name.to_string(),
        email: email.to_string(),
        roll_number: "21CS042".to_string(),
        section: "A".to_string(),
        branch: "CSE".to_string(),
        year: year.to_string(),
        ..RegistrationSubmission::default()
    }
}

/// A valid submission with a generated name and a unique address
pub fn fake_submission(index: usize) -> RegistrationSubmission {
    let name: String = Name().fake();
    let mut submission = submission(&name, &format!("student{}@college.test", index), "1st Year");
    submission.roll_number = format!("21CS{:03}", index);
    submission
}

pub fn feedback_document(name: &str, email: &str) -> Map<String, Value> {
    as_map(json!({
        "fullName": name,
        "email": email,
        "department": "CSE",
        "overallExperience": "Great session",
        "ratings": {"content": 5, "speaker": 4, "venue": 0}
    }))
}

pub fn as_map(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {}", other),
    }
}
