//! Event use-case service.
//!
//! # Responsibility
//! - Create events from drafts: validate, stamp id and creation time, apply
//!   the default reminder offset from settings.
//! - Provide edit/complete/delete entry points and the event views.
//!
//! # Invariants
//! - Title, date and time are required before anything is persisted.
//! - Service APIs never bypass `RecordStore` validation/persistence.

use super::{normalize_text, ServiceResult};
use crate::model::event::{Event, EventPatch, EventType};
use crate::model::id::generate_id_at;
use crate::model::{non_blank, ValidationError};
use crate::query::events::{attended, events_in_month, events_on, upcoming};
use crate::repo::medium::StorageMedium;
use crate::repo::record_store::RecordStore;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use log::info;

/// Caller input for a new event, as collected by a form or CLI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDraft {
    pub title: String,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub kind: EventType,
    /// Falls back to `Settings::default_reminder_time` when `None`.
    pub reminder_minutes: Option<u32>,
}

impl EventDraft {
    pub fn validate(&self) -> Result<(NaiveDate, NaiveTime), ValidationError> {
        non_blank(&self.title)?;
        let date = self.date.ok_or(ValidationError::MissingDate)?;
        let time = self.time.ok_or(ValidationError::MissingTime)?;
        Ok((date, time))
    }
}

/// Event facade borrowing the process-wide store.
pub struct EventService<'s, M: StorageMedium> {
    store: &'s RecordStore<M>,
}

impl<'s, M: StorageMedium> EventService<'s, M> {
    pub fn new(store: &'s RecordStore<M>) -> Self {
        Self { store }
    }

    /// Validates `draft` and persists a new pending event.
    pub fn create(&self, draft: EventDraft) -> ServiceResult<Event> {
        let (date, time) = draft.validate()?;
        let reminder_minutes = match draft.reminder_minutes {
            Some(minutes) => minutes,
            None => self.store.settings()?.default_reminder_time,
        };
        let now = Utc::now();
        let event = Event {
            id: generate_id_at(now),
            title: draft.title.trim().to_string(),
            description: normalize_text(draft.description),
            date,
            time,
            kind: draft.kind,
            reminder_minutes,
            is_completed: false,
            created_date: now,
        };

        self.store.add(event.clone())?;
        info!(
            "event=event_create module=service status=ok id={} type={}",
            event.id, event.kind
        );
        Ok(event)
    }

    pub fn get(&self, id: &str) -> ServiceResult<Option<Event>> {
        Ok(self.store.find(id)?)
    }

    pub fn list(&self) -> ServiceResult<Vec<Event>> {
        Ok(self.store.events()?)
    }

    /// Applies an allowlisted patch. Unknown ids fail with `NotFound`.
    pub fn update(&self, id: &str, patch: &EventPatch) -> ServiceResult<Event> {
        let event = self.store.update::<Event>(id, patch)?;
        info!("event=event_update module=service status=ok id={id}");
        Ok(event)
    }

    pub fn complete(&self, id: &str) -> ServiceResult<Event> {
        self.update(id, &EventPatch::completed())
    }

    /// Deletes by id; unknown ids succeed without changing anything.
    pub fn delete(&self, id: &str) -> ServiceResult<()> {
        self.store.delete::<Event>(id)?;
        info!("event=event_delete module=service status=ok id={id}");
        Ok(())
    }

    pub fn on_date(&self, date: NaiveDate) -> ServiceResult<Vec<Event>> {
        let events = self.store.events()?;
        Ok(events_on(&events, date).into_iter().cloned().collect())
    }

    pub fn in_month(&self, year: i32, month: u32) -> ServiceResult<Vec<Event>> {
        let events = self.store.events()?;
        Ok(events_in_month(&events, year, month)
            .into_iter()
            .cloned()
            .collect())
    }

    pub fn upcoming(&self, now: NaiveDateTime) -> ServiceResult<Vec<Event>> {
        let events = self.store.events()?;
        Ok(upcoming(&events, now).into_iter().cloned().collect())
    }

    pub fn attended(&self, now: NaiveDateTime) -> ServiceResult<Vec<Event>> {
        let events = self.store.events()?;
        Ok(attended(&events, now).into_iter().cloned().collect())
    }
}
