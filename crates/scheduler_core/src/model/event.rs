//! Calendar event record.
//!
//! # Invariants
//! - `date` + `time` combine to one local due instant.
//! - `is_completed` is only ever flipped by an explicit patch.

use super::{non_blank, Collection, Record, UnknownVariant, ValidationError};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Event category shown next to the title.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    #[default]
    Meeting,
    Birthday,
    Festival,
    Custom,
}

impl EventType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Meeting => "meeting",
            Self::Birthday => "birthday",
            Self::Festival => "festival",
            Self::Custom => "custom",
        }
    }
}

impl Display for EventType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "meeting" => Ok(Self::Meeting),
            "birthday" => Ok(Self::Birthday),
            "festival" => Ok(Self::Festival),
            "custom" => Ok(Self::Custom),
            _ => Err(UnknownVariant {
                kind: "event type",
                value: value.to_string(),
            }),
        }
    }
}

/// Persisted calendar event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub date: NaiveDate,
    #[serde(with = "super::clock_time")]
    pub time: NaiveTime,
    #[serde(rename = "type")]
    pub kind: EventType,
    pub reminder_minutes: u32,
    #[serde(default)]
    pub is_completed: bool,
    pub created_date: DateTime<Utc>,
}

impl Event {
    /// Local wall-clock instant at which the event takes place.
    pub fn due_instant(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }
}

impl Record for Event {
    type Patch = EventPatch;

    const COLLECTION: Collection = Collection::Events;

    fn id(&self) -> &str {
        &self.id
    }

    fn apply_patch(&mut self, patch: &EventPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(time) = patch.time {
            self.time = time;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(reminder_minutes) = patch.reminder_minutes {
            self.reminder_minutes = reminder_minutes;
        }
        if let Some(is_completed) = patch.is_completed {
            self.is_completed = is_completed;
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        non_blank(&self.title)
    }
}

/// Allowlisted partial update for an [`Event`].
///
/// Absent fields leave the stored value untouched. `description: null`
/// clears the description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EventPatch {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "super::present")]
    pub description: Option<Option<String>>,
    pub date: Option<NaiveDate>,
    #[serde(default, with = "super::clock_time::option")]
    pub time: Option<NaiveTime>,
    #[serde(rename = "type")]
    pub kind: Option<EventType>,
    pub reminder_minutes: Option<u32>,
    pub is_completed: Option<bool>,
}

impl EventPatch {
    /// Patch that only marks the event as completed.
    pub fn completed() -> Self {
        Self {
            is_completed: Some(true),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Parses `HH:MM` (seconds tolerated) into a clock time.
pub fn parse_clock_time(value: &str) -> Option<NaiveTime> {
    super::clock_time::parse(value)
}

#[cfg(test)]
mod tests {
    use super::{parse_clock_time, Event, EventPatch, EventType};
    use crate::model::Record;
    use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};

    fn sample() -> Event {
        Event {
            id: "evt1".to_string(),
            title: "Standup".to_string(),
            description: None,
            date: NaiveDate::from_ymd_opt(2026, 3, 4).unwrap(),
            time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            kind: EventType::Meeting,
            reminder_minutes: 15,
            is_completed: false,
            created_date: Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap(),
        }
    }

    #[test]
    fn wire_format_uses_camel_case_and_short_time() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["date"], "2026-03-04");
        assert_eq!(json["time"], "09:30");
        assert_eq!(json["type"], "meeting");
        assert_eq!(json["reminderMinutes"], 15);
        assert_eq!(json["isCompleted"], false);
        assert!(json.get("createdDate").is_some());
    }

    #[test]
    fn patch_rejects_fields_outside_allowlist() {
        let err = serde_json::from_str::<EventPatch>(r#"{"title":"x","color":"red"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("unknown field"));
    }

    #[test]
    fn patch_null_description_clears_it() {
        let mut event = sample();
        event.description = Some("notes".to_string());
        let patch: EventPatch = serde_json::from_str(r#"{"description":null}"#).unwrap();
        event.apply_patch(&patch);
        assert_eq!(event.description, None);
        assert_eq!(event.title, "Standup");
    }

    #[test]
    fn clock_time_accepts_seconds() {
        assert_eq!(
            parse_clock_time("07:05:59"),
            NaiveTime::from_hms_opt(7, 5, 59)
        );
        assert_eq!(parse_clock_time("25:00"), None);
    }
}
