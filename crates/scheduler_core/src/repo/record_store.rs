//! Record store over a key-value medium.
//!
//! # Responsibility
//! - Persist events, tasks and settings as whole JSON documents.
//! - Offer add/update/delete/find convenience wrappers over whole-collection
//!   read-modify-write.
//! - Export, import and clear the three collections.
//! - Notify subscribers after every successful write.
//!
//! # Invariants
//! - Writes replace a whole collection; there is no field-level persistence.
//! - A rejected write (validation, serialization, medium) leaves the
//!   previously persisted document untouched and emits no notification.
//! - `update` on an unknown id fails; `delete` on an unknown id succeeds.
//! - After `open` and after `clear_all`, all three collections exist.

use crate::model::settings::{Settings, SettingsPatch};
use crate::model::snapshot::{Snapshot, SnapshotImport};
use crate::model::{event::Event, task::Task, Collection, Record, ValidationError};
use crate::repo::medium::{MediumError, StorageMedium};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    Medium(MediumError),
    Serialization(serde_json::Error),
    InvalidData {
        collection: Collection,
        message: String,
    },
    NotFound {
        collection: Collection,
        id: String,
    },
    Validation(ValidationError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Medium(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "serialization failed: {err}"),
            Self::InvalidData {
                collection,
                message,
            } => write!(f, "invalid persisted {collection} data: {message}"),
            Self::NotFound { collection, id } => {
                write!(f, "no record `{id}` in {collection}")
            }
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Medium(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::InvalidData { .. } | Self::NotFound { .. } => None,
        }
    }
}

impl From<MediumError> for StoreError {
    fn from(value: MediumError) -> Self {
        Self::Medium(value)
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// What happened to a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeKind {
    Added { id: String },
    Updated { id: String },
    Deleted { id: String },
    Replaced,
    Imported,
    Cleared,
}

/// Notification emitted after a successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreChange {
    pub collection: Collection,
    pub kind: ChangeKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Rc<dyn Fn(&StoreChange)>;

/// Persistence facade for the three scheduler collections.
pub struct RecordStore<M: StorageMedium> {
    medium: M,
    listeners: RefCell<Vec<(SubscriptionId, Listener)>>,
    next_subscription: Cell<u64>,
}

impl<M: StorageMedium> RecordStore<M> {
    /// Wraps `medium` and creates any missing collection.
    pub fn open(medium: M) -> StoreResult<Self> {
        let store = Self {
            medium,
            listeners: RefCell::default(),
            next_subscription: Cell::new(1),
        };
        store.initialize()?;
        Ok(store)
    }

    pub fn medium(&self) -> &M {
        &self.medium
    }

    /// Registers `listener` for every subsequent change.
    pub fn subscribe(&self, listener: impl Fn(&StoreChange) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.get());
        self.next_subscription.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    /// Returns whether a listener was registered under `id`.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    /// Reads a list collection. An absent key reads as empty.
    pub fn list<R: Record>(&self) -> StoreResult<Vec<R>> {
        let collection = R::COLLECTION;
        match self.medium.get_item(collection.storage_key())? {
            Some(text) => {
                serde_json::from_str(&text).map_err(|err| StoreError::InvalidData {
                    collection,
                    message: err.to_string(),
                })
            }
            None => Ok(Vec::new()),
        }
    }

    pub fn events(&self) -> StoreResult<Vec<Event>> {
        self.list()
    }

    pub fn tasks(&self) -> StoreResult<Vec<Task>> {
        self.list()
    }

    /// Replaces a whole list collection.
    pub fn save<R: Record>(&self, records: &[R]) -> StoreResult<()> {
        self.write(R::COLLECTION, records)?;
        self.notify(R::COLLECTION, ChangeKind::Replaced);
        Ok(())
    }

    pub fn find<R: Record>(&self, id: &str) -> StoreResult<Option<R>> {
        Ok(self
            .list::<R>()?
            .into_iter()
            .find(|record| record.id() == id))
    }

    /// Appends one record and persists the collection.
    pub fn add<R: Record>(&self, record: R) -> StoreResult<()> {
        record.validate()?;
        let id = record.id().to_string();
        let mut records = self.list::<R>()?;
        records.push(record);
        self.write(R::COLLECTION, &records)?;
        self.notify(R::COLLECTION, ChangeKind::Added { id });
        Ok(())
    }

    /// Merges `patch` over the record with `id` and persists the collection.
    ///
    /// # Errors
    /// - `NotFound` when no record has that id; nothing is written.
    /// - `Validation` when the merged record is invalid; nothing is written.
    pub fn update<R: Record>(&self, id: &str, patch: &R::Patch) -> StoreResult<R> {
        let mut records = self.list::<R>()?;
        let Some(record) = records.iter_mut().find(|record| record.id() == id) else {
            warn!(
                "event=store_update module=repo status=not_found collection={}",
                R::COLLECTION
            );
            return Err(StoreError::NotFound {
                collection: R::COLLECTION,
                id: id.to_string(),
            });
        };
        record.apply_patch(patch);
        record.validate()?;
        let updated = record.clone();

        self.write(R::COLLECTION, &records)?;
        self.notify(R::COLLECTION, ChangeKind::Updated { id: id.to_string() });
        Ok(updated)
    }

    /// Persists the collection without the record `id`.
    ///
    /// An unknown id is not an error: the collection is rewritten unchanged.
    pub fn delete<R: Record>(&self, id: &str) -> StoreResult<()> {
        let mut records = self.list::<R>()?;
        let before = records.len();
        records.retain(|record| record.id() != id);
        let removed = records.len() != before;

        self.write(R::COLLECTION, &records)?;
        if removed {
            self.notify(R::COLLECTION, ChangeKind::Deleted { id: id.to_string() });
        }
        Ok(())
    }

    /// Reads settings, falling back to defaults when the key is absent.
    pub fn settings(&self) -> StoreResult<Settings> {
        let collection = Collection::Settings;
        match self.medium.get_item(collection.storage_key())? {
            Some(text) => {
                serde_json::from_str(&text).map_err(|err| StoreError::InvalidData {
                    collection,
                    message: err.to_string(),
                })
            }
            None => Ok(Settings::default()),
        }
    }

    pub fn save_settings(&self, settings: &Settings) -> StoreResult<()> {
        self.write(Collection::Settings, settings)?;
        self.notify(Collection::Settings, ChangeKind::Replaced);
        Ok(())
    }

    /// Shallow-merges `patch` over the stored settings.
    pub fn update_settings(&self, patch: &SettingsPatch) -> StoreResult<Settings> {
        let mut settings = self.settings()?;
        settings.apply_patch(patch);
        self.save_settings(&settings)?;
        Ok(settings)
    }

    /// Captures all three collections.
    pub fn export_snapshot(&self, now: DateTime<Utc>) -> StoreResult<Snapshot> {
        Ok(Snapshot {
            events: self.events()?,
            tasks: self.tasks()?,
            settings: self.settings()?,
            export_timestamp: now,
        })
    }

    /// Pretty-printed JSON form of [`Self::export_snapshot`].
    pub fn export_json(&self, now: DateTime<Utc>) -> StoreResult<String> {
        let snapshot = self.export_snapshot(now)?;
        serde_json::to_string_pretty(&snapshot).map_err(StoreError::Serialization)
    }

    /// Overwrites every collection present in `data`; absent ones are kept.
    ///
    /// All-or-nothing: if any write is rejected, collections already written
    /// by this call are restored and no notification is emitted.
    pub fn import_snapshot(&self, data: &SnapshotImport) -> StoreResult<()> {
        let mut staged = Vec::new();
        if let Some(events) = &data.events {
            staged.push((Collection::Events, encode(Collection::Events, events)?));
        }
        if let Some(tasks) = &data.tasks {
            staged.push((Collection::Tasks, encode(Collection::Tasks, tasks)?));
        }
        if let Some(settings) = &data.settings {
            staged.push((Collection::Settings, encode(Collection::Settings, settings)?));
        }

        let mut previous = Vec::with_capacity(staged.len());
        for (collection, _) in &staged {
            previous.push((*collection, self.medium.get_item(collection.storage_key())?));
        }

        for (written, (collection, text)) in staged.iter().enumerate() {
            if let Err(err) = self.put(*collection, text) {
                self.restore(&previous[..written]);
                warn!("event=store_import module=repo status=error error_code=rolled_back");
                return Err(err);
            }
        }

        for (collection, _) in &staged {
            self.notify(*collection, ChangeKind::Imported);
        }
        info!(
            "event=store_import module=repo status=ok events={} tasks={} settings={}",
            data.events.as_ref().map_or(0, Vec::len),
            data.tasks.as_ref().map_or(0, Vec::len),
            data.settings.is_some()
        );
        Ok(())
    }

    /// Parses an exported document and imports it.
    ///
    /// # Errors
    /// - `Serialization` when the text is not a structurally valid snapshot.
    ///   Missing top-level fields are not an error.
    pub fn import_json(&self, text: &str) -> StoreResult<()> {
        let data: SnapshotImport = serde_json::from_str(text).map_err(|err| {
            warn!("event=store_import module=repo status=error error_code=malformed_snapshot");
            StoreError::Serialization(err)
        })?;
        self.import_snapshot(&data)
    }

    /// Removes all three collections, then re-creates them empty/default.
    pub fn clear_all(&self) -> StoreResult<()> {
        for collection in Collection::ALL {
            self.medium.remove_item(collection.storage_key())?;
        }
        self.initialize()?;
        for collection in Collection::ALL {
            self.notify(collection, ChangeKind::Cleared);
        }
        info!("event=store_clear module=repo status=ok");
        Ok(())
    }

    fn initialize(&self) -> StoreResult<()> {
        for collection in [Collection::Events, Collection::Tasks] {
            if self.medium.get_item(collection.storage_key())?.is_none() {
                self.write::<[Event]>(collection, &[])?;
            }
        }
        if self
            .medium
            .get_item(Collection::Settings.storage_key())?
            .is_none()
        {
            self.write(Collection::Settings, &Settings::default())?;
        }
        Ok(())
    }

    fn write<T: Serialize + ?Sized>(&self, collection: Collection, value: &T) -> StoreResult<()> {
        let text = encode(collection, value)?;
        self.put(collection, &text)
    }

    fn put(&self, collection: Collection, text: &str) -> StoreResult<()> {
        if let Err(err) = self.medium.set_item(collection.storage_key(), text) {
            warn!(
                "event=store_write module=repo status=error collection={collection} error_code=medium_rejected error={err}"
            );
            return Err(err.into());
        }

        debug!(
            "event=store_write module=repo status=ok collection={collection} bytes={}",
            text.len()
        );
        Ok(())
    }

    /// Puts back documents captured before a multi-collection write.
    fn restore(&self, previous: &[(Collection, Option<String>)]) {
        for (collection, text) in previous {
            let key = collection.storage_key();
            let result = match text {
                Some(text) => self.medium.set_item(key, text),
                None => self.medium.remove_item(key),
            };
            if let Err(err) = result {
                warn!(
                    "event=store_restore module=repo status=error collection={collection} error={err}"
                );
            }
        }
    }

    fn notify(&self, collection: Collection, kind: ChangeKind) {
        let change = StoreChange { collection, kind };
        let listeners: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener(&change);
        }
    }
}

fn encode<T: Serialize + ?Sized>(collection: Collection, value: &T) -> StoreResult<String> {
    serde_json::to_string(value).map_err(|err| {
        warn!(
            "event=store_write module=repo status=error collection={collection} error_code=serialize_failed"
        );
        StoreError::Serialization(err)
    })
}
