//! Reminder polling against the store.
//!
//! One call to `poll` is one tick of the host's timer. The service reads
//! the current events on every tick, so edits made between ticks are seen.

use super::ServiceResult;
use crate::reminder::{ReminderEvaluator, ReminderPolicy, ReminderSignal};
use crate::repo::medium::StorageMedium;
use crate::repo::record_store::RecordStore;
use chrono::NaiveDateTime;
use log::{debug, info};

pub struct ReminderService<'s, M: StorageMedium> {
    store: &'s RecordStore<M>,
    evaluator: ReminderEvaluator,
}

impl<'s, M: StorageMedium> ReminderService<'s, M> {
    pub fn new(store: &'s RecordStore<M>, policy: ReminderPolicy) -> Self {
        Self {
            store,
            evaluator: ReminderEvaluator::new(policy),
        }
    }

    /// Evaluates one poll at `now`.
    ///
    /// Returns no signals while `Settings::notifications` is off.
    pub fn poll(&mut self, now: NaiveDateTime) -> ServiceResult<Vec<ReminderSignal>> {
        if !self.store.settings()?.notifications {
            debug!("event=reminder_poll module=service status=skipped reason=notifications_off");
            return Ok(Vec::new());
        }

        let events = self.store.events()?;
        let signals = self.evaluator.evaluate(&events, now);
        if !signals.is_empty() {
            info!(
                "event=reminder_poll module=service status=ok signals={}",
                signals.len()
            );
        }
        Ok(signals)
    }
}
