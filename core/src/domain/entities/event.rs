//! Calendar events: tasks, vet visits, harvest dates and reminders.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::{clean, missing_text, optional_datetime, CategoryCount};
use crate::errors::ValidationError;

pub const DEFAULT_EVENT_PRIORITY: &str = "medium";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Pending => "pending",
            EventStatus::InProgress => "in_progress",
            EventStatus::Completed => "completed",
            EventStatus::Cancelled => "cancelled",
        }
    }

    /// Finished events never count as overdue
    pub fn is_open(&self) -> bool {
        matches!(self, EventStatus::Pending | EventStatus::InProgress)
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "pending" => Ok(EventStatus::Pending),
            "in_progress" => Ok(EventStatus::InProgress),
            "completed" => Ok(EventStatus::Completed),
            "cancelled" => Ok(EventStatus::Cancelled),
            other => Err(ValidationError::InvalidStatus {
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub event_type: String,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_all_day: bool,
    pub status: EventStatus,
    pub priority: String,
    pub location: Option<String>,
    pub related_entity_type: Option<String>,
    pub related_entity_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub is_all_day: Option<bool>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub location: Option<String>,
    pub related_entity_type: Option<String>,
    pub related_entity_id: Option<String>,
}

impl NewEvent {
    pub fn into_event(self, user_id: Uuid) -> Result<Event, ValidationError> {
        let missing = missing_text(&[
            ("title", &self.title),
            ("type", &self.event_type),
            ("startDate", &self.start_date),
        ]);
        if !missing.is_empty() {
            return Err(ValidationError::missing_fields(missing));
        }

        let start_date = optional_datetime("startDate", self.start_date.as_deref())?
            .ok_or_else(|| ValidationError::missing_fields(["startDate"]))?;
        let end_date = optional_datetime("endDate", self.end_date.as_deref())?;
        let status = match clean(self.status) {
            Some(raw) => raw.parse()?,
            None => EventStatus::default(),
        };

        let now = Utc::now();
        Ok(Event {
            id: Uuid::new_v4(),
            user_id,
            title: clean(self.title).unwrap_or_default(),
            description: clean(self.description),
            event_type: clean(self.event_type).unwrap_or_default(),
            start_date,
            end_date,
            is_all_day: self.is_all_day.unwrap_or(false),
            status,
            priority: clean(self.priority).unwrap_or_else(|| DEFAULT_EVENT_PRIORITY.to_string()),
            location: clean(self.location),
            related_entity_type: clean(self.related_entity_type),
            related_entity_id: clean(self.related_entity_id),
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub is_all_day: Option<bool>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub location: Option<String>,
}

impl EventUpdate {
    pub fn apply(self, event: &mut Event) -> Result<(), ValidationError> {
        if let Some(start) = optional_datetime("startDate", self.start_date.as_deref())? {
            event.start_date = start;
        }
        if let Some(end) = optional_datetime("endDate", self.end_date.as_deref())? {
            event.end_date = Some(end);
        }
        if let Some(raw) = clean(self.status) {
            event.status = raw.parse()?;
        }
        if let Some(all_day) = self.is_all_day {
            event.is_all_day = all_day;
        }
        for (slot, value) in [
            (&mut event.title, self.title),
            (&mut event.event_type, self.event_type),
            (&mut event.priority, self.priority),
        ] {
            if let Some(value) = clean(value) {
                *slot = value;
            }
        }
        for (slot, value) in [
            (&mut event.description, self.description),
            (&mut event.location, self.location),
        ] {
            if value.is_some() {
                *slot = clean(value);
            }
        }
        event.updated_at = Utc::now();
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    pub event_type: Option<String>,
    pub status: Option<EventStatus>,
    /// Events starting at or after this instant
    pub start_date: Option<DateTime<Utc>>,
    /// Events starting at or before this instant
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventStatistics {
    pub total: i64,
    pub pending: i64,
    pub completed: i64,
    /// Open events whose start date has passed
    pub overdue: i64,
    /// Open events starting within the next seven days
    pub upcoming: i64,
    pub by_type: Vec<CategoryCount>,
}
