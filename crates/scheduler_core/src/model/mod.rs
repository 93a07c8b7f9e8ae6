//! Domain model for scheduler records.
//!
//! # Responsibility
//! - Define the persisted shapes of events, tasks and settings.
//! - Define per-entity patches with a closed field allowlist.
//! - Validate records before they reach the medium.
//!
//! # Invariants
//! - Every event/task carries an opaque string `id` from `generate_id`.
//! - Persisted JSON uses camelCase field names.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

mod clock_time;
pub mod event;
pub mod id;
pub mod settings;
pub mod snapshot;
pub mod task;

/// One of the three independently persisted collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Events,
    Tasks,
    Settings,
}

impl Collection {
    pub const ALL: [Collection; 3] = [Self::Events, Self::Tasks, Self::Settings];

    /// Key under which the collection document is stored in the medium.
    pub fn storage_key(self) -> &'static str {
        match self {
            Self::Events => "scheduler_events",
            Self::Tasks => "scheduler_tasks",
            Self::Settings => "scheduler_settings",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Events => "events",
            Self::Tasks => "tasks",
            Self::Settings => "settings",
        }
    }
}

impl Display for Collection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A record living in a list-shaped collection (events or tasks).
pub trait Record: Serialize + DeserializeOwned + Clone {
    /// Partial update accepted by `RecordStore::update`.
    type Patch;

    const COLLECTION: Collection;

    fn id(&self) -> &str;

    /// Merges the present patch fields over this record.
    fn apply_patch(&mut self, patch: &Self::Patch);

    fn validate(&self) -> Result<(), ValidationError>;
}

/// Input rejected before it is persisted.
///
/// `Display` output is phrased for end users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyTitle,
    MissingDate,
    MissingTime,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "Please enter a title"),
            Self::MissingDate => write!(f, "Please choose a date"),
            Self::MissingTime => write!(f, "Please choose a time"),
        }
    }
}

impl Error for ValidationError {}

/// Text that does not name any variant of a closed enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl Display for UnknownVariant {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown {} `{}`", self.kind, self.value)
    }
}

impl Error for UnknownVariant {}

pub(crate) fn non_blank(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    Ok(())
}

/// Distinguishes an explicit `null` (`Some(None)`) from an absent field
/// (`None`) in patch documents.
pub(crate) fn present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}
