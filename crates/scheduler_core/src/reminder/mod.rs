//! Reminder evaluation for calendar events.
//!
//! # Responsibility
//! - Decide, for one poll at `now`, which events get a reminder or an
//!   overdue signal.
//!
//! # Invariants
//! - Completed events never produce a signal.
//! - `minutes_until_due` rounds toward negative infinity.
//! - Under `ExactMinute`, a reminder fires only when a poll lands on the
//!   matching minute. A poll that misses that minute (sleep, drift) misses
//!   the reminder.
//! - Reminders only fire while the due instant is still ahead of `now`.
//! - Overdue signals have no memory and repeat on every poll within the
//!   first 60 minutes after the due instant.

use crate::model::event::Event;
use chrono::{Duration, NaiveDateTime, NaiveTime};
use std::collections::HashSet;
use std::fmt::{Display, Formatter};

/// Cadence at which hosts are expected to call [`ReminderEvaluator::evaluate`].
pub const REMINDER_POLL_INTERVAL: std::time::Duration = std::time::Duration::from_secs(60);

/// How long after the due instant an event keeps producing overdue signals.
pub const OVERDUE_WINDOW_MINUTES: i64 = 60;

/// When a reminder fires relative to `reminder_minutes`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReminderPolicy {
    /// Fire only when `minutes_until_due == reminder_minutes`.
    #[default]
    ExactMinute,
    /// Fire once per event and due instant as soon as
    /// `0 <= minutes_until_due <= reminder_minutes`. Fired keys live in the
    /// evaluator, are pruned once their due instant leaves the overdue
    /// window, and are lost when it is dropped.
    FireOnce,
}

/// Signal produced by one evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderSignal {
    Reminder {
        event_id: String,
        title: String,
        minutes_until_due: i64,
    },
    Overdue {
        event_id: String,
        title: String,
        minutes_overdue: i64,
        scheduled_time: NaiveTime,
    },
}

impl ReminderSignal {
    pub fn event_id(&self) -> &str {
        match self {
            Self::Reminder { event_id, .. } | Self::Overdue { event_id, .. } => event_id,
        }
    }
}

impl Display for ReminderSignal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reminder {
                title,
                minutes_until_due,
                ..
            } => write!(f, "Reminder: {title} starts in {minutes_until_due} minutes"),
            Self::Overdue {
                title,
                scheduled_time,
                ..
            } => write!(
                f,
                "Overdue: {title} was scheduled for {}",
                scheduled_time.format("%-I:%M %p")
            ),
        }
    }
}

/// Whole minutes from `now` until the event's due instant, floored.
pub fn minutes_until_due(event: &Event, now: NaiveDateTime) -> i64 {
    (event.due_instant() - now)
        .num_milliseconds()
        .div_euclid(60_000)
}

/// Stateful evaluator; state is only used by [`ReminderPolicy::FireOnce`].
#[derive(Debug, Default)]
pub struct ReminderEvaluator {
    policy: ReminderPolicy,
    fired: HashSet<(String, NaiveDateTime)>,
}

impl ReminderEvaluator {
    pub fn new(policy: ReminderPolicy) -> Self {
        Self {
            policy,
            fired: HashSet::new(),
        }
    }

    pub fn policy(&self) -> ReminderPolicy {
        self.policy
    }

    /// Evaluates one poll at `now` over `events`, in store order.
    pub fn evaluate(&mut self, events: &[Event], now: NaiveDateTime) -> Vec<ReminderSignal> {
        if self.policy == ReminderPolicy::FireOnce {
            let horizon = now - Duration::minutes(OVERDUE_WINDOW_MINUTES);
            self.fired.retain(|(_, due)| *due >= horizon);
        }

        let mut signals = Vec::new();
        for event in events.iter().filter(|event| !event.is_completed) {
            let minutes = minutes_until_due(event, now);

            if event.due_instant() > now && self.should_remind(event, minutes) {
                signals.push(ReminderSignal::Reminder {
                    event_id: event.id.clone(),
                    title: event.title.clone(),
                    minutes_until_due: minutes,
                });
            }

            if minutes < 0 && minutes.abs() <= OVERDUE_WINDOW_MINUTES {
                signals.push(ReminderSignal::Overdue {
                    event_id: event.id.clone(),
                    title: event.title.clone(),
                    minutes_overdue: minutes.abs(),
                    scheduled_time: event.time,
                });
            }
        }
        signals
    }

    fn should_remind(&mut self, event: &Event, minutes: i64) -> bool {
        let lead = i64::from(event.reminder_minutes);
        match self.policy {
            ReminderPolicy::ExactMinute => minutes == lead,
            ReminderPolicy::FireOnce => {
                (0..=lead).contains(&minutes)
                    && self.fired.insert((event.id.clone(), event.due_instant()))
            }
        }
    }
}
