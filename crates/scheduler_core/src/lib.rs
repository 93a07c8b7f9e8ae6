//! Scheduler core: calendar events, to-do tasks, settings and reminders.
//! This crate is the single source of truth for record invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod reminder;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::event::{parse_clock_time, Event, EventPatch, EventType};
pub use model::id::generate_id;
pub use model::settings::{Settings, SettingsPatch, Theme};
pub use model::snapshot::{Snapshot, SnapshotImport};
pub use model::task::{Priority, Task, TaskPatch};
pub use model::{Collection, Record, UnknownVariant, ValidationError};
pub use query::tasks::{StatusFilter, TaskFilter, TaskStats};
pub use reminder::{ReminderEvaluator, ReminderPolicy, ReminderSignal, REMINDER_POLL_INTERVAL};
pub use repo::medium::{MediumError, MemoryMedium, SqliteMedium, StorageMedium};
pub use repo::record_store::{
    ChangeKind, RecordStore, StoreChange, StoreError, StoreResult, SubscriptionId,
};
pub use service::event_service::{EventDraft, EventService};
pub use service::reminder_service::ReminderService;
pub use service::stats::{storage_stats, StorageStats};
pub use service::task_service::{TaskDraft, TaskService};
pub use service::{ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
