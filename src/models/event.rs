//! Event model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::errors::PortalError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub time: String,
    pub location: String,
    pub instructor: String,
    pub max_participants: i32,
    pub current_participants: i32,
    pub status: EventStatus,
    pub form_config: FormConfig,
    #[serde(flatten)]
    pub content: EventContent,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    pub fn is_full(&self) -> bool {
        self.current_participants >= self.max_participants
    }

    pub fn available_seats(&self) -> i32 {
        (self.max_participants - self.current_participants).max(0)
    }
}

/// Per-event declaration of legal registration values and enabled optional fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormConfig {
    #[serde(default)]
    pub section_options: Vec<String>,
    #[serde(default)]
    pub branch_options: Vec<String>,
    #[serde(default)]
    pub year_options: Vec<String>,
    #[serde(default)]
    pub optional_fields: OptionalFields,
    #[serde(default)]
    pub how_did_you_hear_options: Vec<String>,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            section_options: ('A'..='H').map(|c| c.to_string()).collect(),
            branch_options: vec!["CSE".to_string(), "IT".to_string(), "ECE".to_string()],
            year_options: ["1", "2", "3", "4"].iter().map(|y| y.to_string()).collect(),
            optional_fields: OptionalFields::default(),
            how_did_you_hear_options: [
                "Social Media",
                "College Notice Board",
                "Friend/Classmate",
                "Faculty Member",
                "Other",
            ]
            .iter()
            .map(|o| o.to_string())
            .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionalFields {
    #[serde(default)]
    pub phone: bool,
    #[serde(default)]
    pub previous_experience: bool,
    #[serde(default)]
    pub special_requirements: bool,
    #[serde(default)]
    pub how_did_you_hear: bool,
}

/// Instructional content shown on the event page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_instructions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_button_text: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    #[default]
    Active,
    Inactive,
    Completed,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Active => "active",
            EventStatus::Inactive => "inactive",
            EventStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(EventStatus::Active),
            "inactive" => Ok(EventStatus::Inactive),
            "completed" => Ok(EventStatus::Completed),
            other => Err(PortalError::InvalidInput(format!("Unknown event status: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub instructor: String,
    pub max_participants: i32,
    #[serde(default)]
    pub status: Option<EventStatus>,
    #[serde(default)]
    pub form_config: FormConfig,
    #[serde(default, flatten)]
    pub content: EventContent,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub instructor: Option<String>,
    pub max_participants: Option<i32>,
    pub status: Option<EventStatus>,
    pub form_config: Option<FormConfig>,
    pub content: Option<EventContent>,
}

impl UpdateEventRequest {
    /// Apply the patch to an event in place
    pub fn apply_to(self, event: &mut Event) {
        if let Some(title) = self.title {
            event.title = title;
        }
        if let Some(description) = self.description {
            event.description = description;
        }
        if let Some(date) = self.date {
            event.date = date;
        }
        if let Some(time) = self.time {
            event.time = time;
        }
        if let Some(location) = self.location {
            event.location = location;
        }
        if let Some(instructor) = self.instructor {
            event.instructor = instructor;
        }
        if let Some(max_participants) = self.max_participants {
            event.max_participants = max_participants;
        }
        if let Some(status) = self.status {
            event.status = status;
        }
        if let Some(form_config) = self.form_config {
            event.form_config = form_config;
        }
        if let Some(content) = self.content {
            event.content = content;
        }
    }
}
