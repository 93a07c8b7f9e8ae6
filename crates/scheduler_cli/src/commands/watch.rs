use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use log::{info, warn};
use owo_colors::OwoColorize;
use scheduler_core::{ReminderPolicy, ReminderService, StorageMedium, REMINDER_POLL_INTERVAL};
use tokio::time::{interval, MissedTickBehavior};

use super::Store;
use crate::render;

pub fn run(store: &Store<'_>, fire_once: bool) -> Result<()> {
    let policy = if fire_once {
        ReminderPolicy::FireOnce
    } else {
        ReminderPolicy::ExactMinute
    };
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;

    runtime.block_on(poll_loop(store, policy))
}

async fn poll_loop(store: &Store<'_>, policy: ReminderPolicy) -> Result<()> {
    let mut service = ReminderService::new(store, policy);
    let mut ticker = interval(REMINDER_POLL_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut failing = false;

    println!("{}", "Watching for reminders (Ctrl-C to stop)".dimmed());
    info!("event=watch_start module=cli status=ok policy={policy:?}");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let now = Local::now().naive_local();
                for line in poll_once(&mut service, now, &mut failing) {
                    println!("{line}");
                }
            }
            result = &mut ctrl_c => {
                result.context("failed to listen for Ctrl-C")?;
                break;
            }
        }
    }

    info!("event=watch_stop module=cli status=ok");
    Ok(())
}

/// Runs one poll and returns the lines to print.
///
/// A failed poll never ends the loop. The error is logged on every tick but
/// printed only when a run of failures starts.
fn poll_once<M: StorageMedium>(
    service: &mut ReminderService<'_, M>,
    now: NaiveDateTime,
    failing: &mut bool,
) -> Vec<String> {
    match service.poll(now) {
        Ok(signals) => {
            if std::mem::take(failing) {
                info!("event=reminder_poll module=cli status=recovered");
            }
            signals.iter().map(render::signal_line).collect()
        }
        Err(err) => {
            warn!("event=reminder_poll module=cli status=error error={err}");
            if std::mem::replace(failing, true) {
                Vec::new()
            } else {
                vec![format!("Reminder check failed: {err}").red().to_string()]
            }
        }
    }
}
