//! Task use-case service.
//!
//! # Responsibility
//! - Create tasks from drafts and toggle completion.
//! - Serve the filtered + sorted task list and its counters.
//!
//! # Invariants
//! - `completed_date` is stamped on completion and cleared on reopen.
//! - Listing always applies filters first, then `sort_tasks`.

use super::{normalize_text, ServiceResult};
use crate::model::id::generate_id_at;
use crate::model::task::{Priority, Task, TaskPatch, DEFAULT_CATEGORY};
use crate::model::{non_blank, Collection, ValidationError};
use crate::query::tasks::{
    apply_filters, overdue_tasks, sort_tasks, task_stats, TaskFilter, TaskStats,
};
use crate::repo::medium::StorageMedium;
use crate::repo::record_store::{RecordStore, StoreError};
use chrono::{DateTime, NaiveDate, Utc};
use log::info;

/// Caller input for a new task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    /// Blank input falls back to [`DEFAULT_CATEGORY`].
    pub category: Option<String>,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
}

impl TaskDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        non_blank(&self.title)
    }
}

pub struct TaskService<'s, M: StorageMedium> {
    store: &'s RecordStore<M>,
}

impl<'s, M: StorageMedium> TaskService<'s, M> {
    pub fn new(store: &'s RecordStore<M>) -> Self {
        Self { store }
    }

    pub fn create(&self, draft: TaskDraft) -> ServiceResult<Task> {
        draft.validate()?;
        let now = Utc::now();
        let task = Task {
            id: generate_id_at(now),
            title: draft.title.trim().to_string(),
            description: normalize_text(draft.description),
            category: normalize_text(draft.category)
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            priority: draft.priority,
            due_date: draft.due_date,
            is_completed: false,
            completed_date: None,
            created_date: now,
        };

        self.store.add(task.clone())?;
        info!(
            "event=task_create module=service status=ok id={} priority={}",
            task.id, task.priority
        );
        Ok(task)
    }

    pub fn get(&self, id: &str) -> ServiceResult<Option<Task>> {
        Ok(self.store.find(id)?)
    }

    pub fn update(&self, id: &str, patch: &TaskPatch) -> ServiceResult<Task> {
        let task = self.store.update::<Task>(id, patch)?;
        info!("event=task_update module=service status=ok id={id}");
        Ok(task)
    }

    /// Flips completion of task `id` at `now`.
    pub fn toggle_completion(&self, id: &str, now: DateTime<Utc>) -> ServiceResult<Task> {
        let task = self
            .store
            .find::<Task>(id)?
            .ok_or_else(|| StoreError::NotFound {
                collection: Collection::Tasks,
                id: id.to_string(),
            })?;
        let updated = self.store.update::<Task>(id, &task.toggle_patch(now))?;
        info!(
            "event=task_toggle module=service status=ok id={id} completed={}",
            updated.is_completed
        );
        Ok(updated)
    }

    pub fn delete(&self, id: &str) -> ServiceResult<()> {
        self.store.delete::<Task>(id)?;
        info!("event=task_delete module=service status=ok id={id}");
        Ok(())
    }

    /// Tasks matching `filter`, in display order.
    pub fn list(&self, filter: &TaskFilter) -> ServiceResult<Vec<Task>> {
        let tasks = self.store.tasks()?;
        let mut visible = apply_filters(&tasks, filter);
        sort_tasks(&mut visible);
        Ok(visible.into_iter().cloned().collect())
    }

    pub fn overdue(&self, today: NaiveDate) -> ServiceResult<Vec<Task>> {
        let tasks = self.store.tasks()?;
        Ok(overdue_tasks(&tasks, today).into_iter().cloned().collect())
    }

    pub fn stats(&self, today: NaiveDate) -> ServiceResult<TaskStats> {
        Ok(task_stats(&self.store.tasks()?, today))
    }
}
