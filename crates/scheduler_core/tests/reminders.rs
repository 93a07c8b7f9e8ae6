use chrono::{Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use scheduler_core::{
    Event, EventType, MemoryMedium, RecordStore, ReminderEvaluator, ReminderPolicy,
    ReminderService, ReminderSignal, SettingsPatch,
};

#[test]
fn reminder_fires_only_on_the_exact_minute() {
    let events = vec![event_due(due())];
    let mut evaluator = ReminderEvaluator::default();

    let signals = evaluator.evaluate(&events, due() - Duration::minutes(15));
    assert_eq!(signals.len(), 1);
    assert!(matches!(
        &signals[0],
        ReminderSignal::Reminder { minutes_until_due: 15, .. }
    ));

    assert!(evaluator
        .evaluate(&events, due() - Duration::minutes(14))
        .is_empty());
    assert!(evaluator
        .evaluate(&events, due() - Duration::minutes(16))
        .is_empty());
}

#[test]
fn overdue_signal_covers_first_hour_only() {
    let events = vec![event_due(due())];
    let mut evaluator = ReminderEvaluator::default();

    let signals = evaluator.evaluate(&events, due() + Duration::minutes(30));
    assert_eq!(
        signals,
        vec![ReminderSignal::Overdue {
            event_id: "evt".to_string(),
            title: "Board meeting".to_string(),
            minutes_overdue: 30,
            scheduled_time: due().time(),
        }]
    );

    assert!(evaluator
        .evaluate(&events, due() + Duration::minutes(90))
        .is_empty());
}

#[test]
fn overdue_signal_repeats_on_every_poll() {
    let events = vec![event_due(due())];
    let mut evaluator = ReminderEvaluator::default();
    let first = evaluator.evaluate(&events, due() + Duration::minutes(10));
    let second = evaluator.evaluate(&events, due() + Duration::minutes(11));
    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 1);
}

#[test]
fn zero_lead_reminder_does_not_fire_once_the_event_has_started() {
    let mut event = event_due(due());
    event.reminder_minutes = 0;
    let events = vec![event];

    for policy in [ReminderPolicy::ExactMinute, ReminderPolicy::FireOnce] {
        let mut evaluator = ReminderEvaluator::new(policy);
        assert!(evaluator.evaluate(&events, due()).is_empty());
        assert!(matches!(
            &evaluator.evaluate(&events, due() - Duration::seconds(30))[..],
            [ReminderSignal::Reminder { minutes_until_due: 0, .. }]
        ));
    }
}

#[test]
fn completed_events_never_signal() {
    let mut done = event_due(due());
    done.is_completed = true;
    let events = vec![done];
    let mut evaluator = ReminderEvaluator::default();

    assert!(evaluator
        .evaluate(&events, due() - Duration::minutes(15))
        .is_empty());
    assert!(evaluator
        .evaluate(&events, due() + Duration::minutes(15))
        .is_empty());
}

#[test]
fn fire_once_policy_catches_up_after_a_missed_minute() {
    let events = vec![event_due(due())];
    let mut evaluator = ReminderEvaluator::new(ReminderPolicy::FireOnce);

    assert!(evaluator
        .evaluate(&events, due() - Duration::minutes(20))
        .is_empty());
    // The poll at T-15 was missed; T-12 still fires, once.
    let late = evaluator.evaluate(&events, due() - Duration::minutes(12));
    assert!(matches!(
        &late[..],
        [ReminderSignal::Reminder { minutes_until_due: 12, .. }]
    ));
    assert!(evaluator
        .evaluate(&events, due() - Duration::minutes(11))
        .is_empty());
}

#[test]
fn fire_once_policy_rearms_when_event_is_rescheduled() {
    let mut events = vec![event_due(due())];
    let mut evaluator = ReminderEvaluator::new(ReminderPolicy::FireOnce);
    assert_eq!(
        evaluator
            .evaluate(&events, due() - Duration::minutes(5))
            .len(),
        1
    );

    let moved = due() + Duration::hours(2);
    events[0] = event_due(moved);
    assert_eq!(
        evaluator
            .evaluate(&events, moved - Duration::minutes(5))
            .len(),
        1
    );
}

#[test]
fn service_poll_reads_store_and_honours_notification_switch() {
    let store = RecordStore::open(MemoryMedium::new()).unwrap();
    store.add(event_due(due())).unwrap();
    let mut service = ReminderService::new(&store, ReminderPolicy::ExactMinute);

    let at_reminder = due() - Duration::minutes(15);
    assert_eq!(service.poll(at_reminder).unwrap().len(), 1);

    store
        .update_settings(&SettingsPatch {
            notifications: Some(false),
            ..SettingsPatch::default()
        })
        .unwrap();
    assert!(service.poll(at_reminder).unwrap().is_empty());
}

fn due() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 9, 14)
        .unwrap()
        .and_hms_opt(15, 0, 0)
        .unwrap()
}

fn event_due(at: NaiveDateTime) -> Event {
    Event {
        id: "evt".to_string(),
        title: "Board meeting".to_string(),
        description: None,
        date: at.date(),
        time: at.time(),
        kind: EventType::Meeting,
        reminder_minutes: 15,
        is_completed: false,
        created_date: Utc.with_ymd_and_hms(2026, 9, 1, 0, 0, 0).unwrap(),
    }
}
