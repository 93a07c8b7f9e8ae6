//! Event views: by calendar day, upcoming, attended.
//!
//! # Invariants
//! - `upcoming` and `attended` partition any event list exactly.
//! - Sorting is stable; ties keep store order.

use crate::model::event::Event;
use chrono::{Datelike, NaiveDate, NaiveDateTime};

/// Events whose date is `date`, in store order.
pub fn events_on(events: &[Event], date: NaiveDate) -> Vec<&Event> {
    events.iter().filter(|event| event.date == date).collect()
}

/// Events dated inside `year`/`month`, in store order.
pub fn events_in_month(events: &[Event], year: i32, month: u32) -> Vec<&Event> {
    events
        .iter()
        .filter(|event| event.date.year() == year && event.date.month() == month)
        .collect()
}

/// True for a pending event whose due instant is strictly after `now`.
pub fn is_upcoming(event: &Event, now: NaiveDateTime) -> bool {
    !event.is_completed && event.due_instant() > now
}

/// Pending future events, earliest first.
pub fn upcoming(events: &[Event], now: NaiveDateTime) -> Vec<&Event> {
    let mut upcoming: Vec<&Event> = events
        .iter()
        .filter(|event| is_upcoming(event, now))
        .collect();
    upcoming.sort_by_key(|event| event.due_instant());
    upcoming
}

/// Everything not upcoming (past or completed), most recent first.
///
/// A past event that was never completed lands here too; overdue styling is
/// a presentation concern.
pub fn attended(events: &[Event], now: NaiveDateTime) -> Vec<&Event> {
    let mut attended: Vec<&Event> = events
        .iter()
        .filter(|event| !is_upcoming(event, now))
        .collect();
    attended.sort_by(|a, b| b.due_instant().cmp(&a.due_instant()));
    attended
}
