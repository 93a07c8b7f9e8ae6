//! To-do task record.
//!
//! # Invariants
//! - `completed_date` is `Some` only while `is_completed` is true.
//! - `due_date` has no time component; comparisons are by calendar day.

use super::{non_blank, Collection, Record, UnknownVariant, ValidationError};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Category assigned when the caller does not pick one.
pub const DEFAULT_CATEGORY: &str = "personal";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Fixed sort rank: high=3, medium=2, low=1.
    pub fn rank(self) -> u8 {
        match self {
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(UnknownVariant {
                kind: "priority",
                value: value.to_string(),
            }),
        }
    }
}

/// Persisted to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: String,
    pub priority: Priority,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub completed_date: Option<DateTime<Utc>>,
    pub created_date: DateTime<Utc>,
}

impl Task {
    /// Patch that flips completion, stamping or clearing `completed_date`.
    pub fn toggle_patch(&self, now: DateTime<Utc>) -> TaskPatch {
        let completing = !self.is_completed;
        TaskPatch {
            is_completed: Some(completing),
            completed_date: Some(completing.then_some(now)),
            ..TaskPatch::default()
        }
    }
}

impl Record for Task {
    type Patch = TaskPatch;

    const COLLECTION: Collection = Collection::Tasks;

    fn id(&self) -> &str {
        &self.id
    }

    fn apply_patch(&mut self, patch: &TaskPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(category) = &patch.category {
            self.category = category.clone();
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(completed_date) = patch.completed_date {
            self.completed_date = completed_date;
        }
        if let Some(is_completed) = patch.is_completed {
            self.is_completed = is_completed;
            if !is_completed {
                self.completed_date = None;
            }
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        non_blank(&self.title)
    }
}

/// Allowlisted partial update for a [`Task`].
///
/// `dueDate: null` removes the due date; an absent `dueDate` keeps it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TaskPatch {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "super::present")]
    pub description: Option<Option<String>>,
    pub category: Option<String>,
    pub priority: Option<Priority>,
    #[serde(default, deserialize_with = "super::present")]
    pub due_date: Option<Option<NaiveDate>>,
    pub is_completed: Option<bool>,
    #[serde(default, deserialize_with = "super::present")]
    pub completed_date: Option<Option<DateTime<Utc>>>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::{Priority, Task, TaskPatch};
    use crate::model::Record;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn sample() -> Task {
        Task {
            id: "tsk1".to_string(),
            title: "Ship report".to_string(),
            description: None,
            category: "work".to_string(),
            priority: Priority::High,
            due_date: NaiveDate::from_ymd_opt(2026, 5, 1),
            is_completed: false,
            completed_date: None,
            created_date: Utc.with_ymd_and_hms(2026, 4, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn toggle_stamps_and_clears_completed_date() {
        let now = Utc.with_ymd_and_hms(2026, 4, 2, 9, 0, 0).unwrap();
        let mut task = sample();

        let complete = task.toggle_patch(now);
        task.apply_patch(&complete);
        assert!(task.is_completed);
        assert_eq!(task.completed_date, Some(now));

        let reopen = task.toggle_patch(now);
        task.apply_patch(&reopen);
        assert!(!task.is_completed);
        assert_eq!(task.completed_date, None);
    }

    #[test]
    fn reopening_without_explicit_date_still_clears_it() {
        let mut task = sample();
        task.is_completed = true;
        task.completed_date = Some(Utc.with_ymd_and_hms(2026, 4, 3, 0, 0, 0).unwrap());

        task.apply_patch(&TaskPatch {
            is_completed: Some(false),
            ..TaskPatch::default()
        });
        assert_eq!(task.completed_date, None);
    }

    #[test]
    fn patch_distinguishes_null_from_absent_due_date() {
        let clear: TaskPatch = serde_json::from_str(r#"{"dueDate":null}"#).unwrap();
        assert_eq!(clear.due_date, Some(None));

        let keep: TaskPatch = serde_json::from_str(r#"{"priority":"low"}"#).unwrap();
        assert_eq!(keep.due_date, None);
        assert_eq!(keep.priority, Some(Priority::Low));
    }

    #[test]
    fn priority_rank_is_fixed() {
        assert!(Priority::High.rank() > Priority::Medium.rank());
        assert!(Priority::Medium.rank() > Priority::Low.rank());
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert!("urgent".parse::<Priority>().is_err());
    }
}
