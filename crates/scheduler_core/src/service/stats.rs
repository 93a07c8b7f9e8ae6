//! Store-wide counters.

use super::ServiceResult;
use crate::query::events::is_upcoming;
use crate::repo::medium::StorageMedium;
use crate::repo::record_store::RecordStore;
use chrono::NaiveDateTime;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StorageStats {
    pub total_events: usize,
    pub upcoming_events: usize,
    pub attended_events: usize,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub pending_tasks: usize,
}

/// Counts events and tasks relative to `now`.
pub fn storage_stats<M: StorageMedium>(
    store: &RecordStore<M>,
    now: NaiveDateTime,
) -> ServiceResult<StorageStats> {
    let events = store.events()?;
    let tasks = store.tasks()?;
    let upcoming_events = events.iter().filter(|event| is_upcoming(event, now)).count();
    let completed_tasks = tasks.iter().filter(|task| task.is_completed).count();

    Ok(StorageStats {
        total_events: events.len(),
        upcoming_events,
        attended_events: events.len() - upcoming_events,
        total_tasks: tasks.len(),
        completed_tasks,
        pending_tasks: tasks.len() - completed_tasks,
    })
}
