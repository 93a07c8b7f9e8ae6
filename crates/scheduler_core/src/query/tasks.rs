//! Task views: filtering, ordering, due-date proximity.
//!
//! # Invariants
//! - Filters compose with logical AND.
//! - `compare_tasks` applies its keys as sequential tiebreaks.
//! - `is_overdue`, `is_due_today` and `is_due_soon` never hold together.

use crate::model::task::{Priority, Task};
use crate::model::UnknownVariant;
use chrono::NaiveDate;
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::str::FromStr;

/// Filter value that disables a criterion.
pub const ALL_SENTINEL: &str = "all";

/// Completion criterion of a [`TaskFilter`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Completed,
    Pending,
}

impl FromStr for StatusFilter {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            ALL_SENTINEL => Ok(Self::All),
            "completed" => Ok(Self::Completed),
            "pending" => Ok(Self::Pending),
            _ => Err(UnknownVariant {
                kind: "status filter",
                value: value.to_string(),
            }),
        }
    }
}

/// Task list filter. `None` criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub category: Option<String>,
    pub priority: Option<Priority>,
    pub status: StatusFilter,
}

impl TaskFilter {
    /// Builds a filter from UI-style values where `"all"` disables a field.
    pub fn from_sentinels(
        category: &str,
        priority: &str,
        status: &str,
    ) -> Result<Self, UnknownVariant> {
        let category = (category != ALL_SENTINEL).then(|| category.to_string());
        let priority = if priority == ALL_SENTINEL {
            None
        } else {
            Some(priority.parse()?)
        };
        Ok(Self {
            category,
            priority,
            status: status.parse()?,
        })
    }

    pub fn matches(&self, task: &Task) -> bool {
        if let Some(category) = &self.category {
            if &task.category != category {
                return false;
            }
        }
        if let Some(priority) = self.priority {
            if task.priority != priority {
                return false;
            }
        }
        match self.status {
            StatusFilter::All => true,
            StatusFilter::Completed => task.is_completed,
            StatusFilter::Pending => !task.is_completed,
        }
    }
}

pub fn apply_filters<'a>(tasks: &'a [Task], filter: &TaskFilter) -> Vec<&'a Task> {
    tasks.iter().filter(|task| filter.matches(task)).collect()
}

/// Display order for tasks:
/// 1. incomplete before completed,
/// 2. higher priority first,
/// 3. earlier due date first, dated before undated,
/// 4. newer `created_date` first.
pub fn compare_tasks(a: &Task, b: &Task) -> Ordering {
    a.is_completed
        .cmp(&b.is_completed)
        .then_with(|| b.priority.rank().cmp(&a.priority.rank()))
        .then_with(|| match (a.due_date, b.due_date) {
            (Some(left), Some(right)) => left.cmp(&right),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| b.created_date.cmp(&a.created_date))
}

/// Stable in-place sort by [`compare_tasks`].
pub fn sort_tasks<T: Borrow<Task>>(tasks: &mut [T]) {
    tasks.sort_by(|a, b| compare_tasks(a.borrow(), b.borrow()));
}

/// Pending task due before `today`.
pub fn is_overdue(task: &Task, today: NaiveDate) -> bool {
    pending_due_date(task).is_some_and(|due| due < today)
}

pub fn is_due_today(task: &Task, today: NaiveDate) -> bool {
    pending_due_date(task).is_some_and(|due| due == today)
}

/// Pending task due 1 to 7 calendar days after `today`.
pub fn is_due_soon(task: &Task, today: NaiveDate) -> bool {
    pending_due_date(task).is_some_and(|due| (1..=7).contains(&(due - today).num_days()))
}

pub fn overdue_tasks(tasks: &[Task], today: NaiveDate) -> Vec<&Task> {
    tasks.iter().filter(|task| is_overdue(task, today)).collect()
}

/// Counters shown above the task list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
    pub overdue: usize,
}

pub fn task_stats(tasks: &[Task], today: NaiveDate) -> TaskStats {
    let completed = tasks.iter().filter(|task| task.is_completed).count();
    TaskStats {
        total: tasks.len(),
        pending: tasks.len() - completed,
        completed,
        overdue: overdue_tasks(tasks, today).len(),
    }
}

fn pending_due_date(task: &Task) -> Option<NaiveDate> {
    if task.is_completed {
        return None;
    }
    task.due_date
}

#[cfg(test)]
mod tests {
    use super::{is_due_soon, is_due_today, is_overdue, StatusFilter, TaskFilter};
    use crate::model::task::{Priority, Task};
    use chrono::{Duration, NaiveDate, TimeZone, Utc};

    fn task_due(due: Option<NaiveDate>) -> Task {
        Task {
            id: "t".to_string(),
            title: "t".to_string(),
            description: None,
            category: "work".to_string(),
            priority: Priority::Medium,
            due_date: due,
            is_completed: false,
            completed_date: None,
            created_date: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn due_predicates_are_mutually_exclusive_across_a_window() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
        for offset in -10..=10 {
            let task = task_due(Some(today + Duration::days(offset)));
            let hits = [
                is_overdue(&task, today),
                is_due_today(&task, today),
                is_due_soon(&task, today),
            ]
            .into_iter()
            .filter(|hit| *hit)
            .count();
            let expected = usize::from(offset <= 7);
            assert_eq!(hits, expected, "offset {offset}");
        }
    }

    #[test]
    fn due_soon_bounds_are_inclusive() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
        assert!(is_due_soon(&task_due(Some(today + Duration::days(1))), today));
        assert!(is_due_soon(&task_due(Some(today + Duration::days(7))), today));
        assert!(!is_due_soon(&task_due(Some(today + Duration::days(8))), today));
    }

    #[test]
    fn completed_or_undated_tasks_match_no_predicate() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
        let mut done = task_due(Some(today - Duration::days(3)));
        done.is_completed = true;
        assert!(!is_overdue(&done, today));
        assert!(!is_overdue(&task_due(None), today));
        assert!(!is_due_today(&task_due(None), today));
    }

    #[test]
    fn sentinel_parsing_disables_criteria() {
        let filter = TaskFilter::from_sentinels("all", "all", "all").unwrap();
        assert_eq!(filter, TaskFilter::default());

        let filter = TaskFilter::from_sentinels("home", "low", "pending").unwrap();
        assert_eq!(filter.category.as_deref(), Some("home"));
        assert_eq!(filter.priority, Some(Priority::Low));
        assert_eq!(filter.status, StatusFilter::Pending);

        assert!(TaskFilter::from_sentinels("all", "urgent", "all").is_err());
    }
}
