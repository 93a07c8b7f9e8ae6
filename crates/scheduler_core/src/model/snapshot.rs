//! Export/import document covering all three collections.

use super::event::Event;
use super::settings::Settings;
use super::task::Task;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Full export of the store at `export_timestamp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub events: Vec<Event>,
    pub tasks: Vec<Task>,
    pub settings: Settings,
    pub export_timestamp: DateTime<Utc>,
}

/// Import document. Each collection is applied only when present.
///
/// Older exports named the timestamp `exportDate`; both spellings are read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotImport {
    pub events: Option<Vec<Event>>,
    pub tasks: Option<Vec<Task>>,
    pub settings: Option<Settings>,
    #[serde(alias = "exportDate")]
    pub export_timestamp: Option<DateTime<Utc>>,
}

impl From<Snapshot> for SnapshotImport {
    fn from(snapshot: Snapshot) -> Self {
        Self {
            events: Some(snapshot.events),
            tasks: Some(snapshot.tasks),
            settings: Some(snapshot.settings),
            export_timestamp: Some(snapshot.export_timestamp),
        }
    }
}
