use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use scheduler_core::db::open_db_in_memory;
use scheduler_core::{
    ChangeKind, Collection, Event, EventPatch, EventType, MemoryMedium, Priority, RecordStore,
    Settings, SettingsPatch, SnapshotImport, SqliteMedium, StorageMedium, StoreChange, StoreError,
    Task, TaskPatch, Theme, ValidationError,
};
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn open_initializes_empty_collections_and_default_settings() {
    let medium = MemoryMedium::new();
    let store = RecordStore::open(&medium).unwrap();

    assert!(store.events().unwrap().is_empty());
    assert!(store.tasks().unwrap().is_empty());
    assert_eq!(
        store.settings().unwrap(),
        Settings {
            theme: Theme::Light,
            default_reminder_time: 15,
            notifications: true,
        }
    );
    for collection in Collection::ALL {
        assert!(medium.contains_key(collection.storage_key()));
    }
}

#[test]
fn open_keeps_existing_documents() {
    let medium = MemoryMedium::new();
    medium
        .set_item(
            "scheduler_settings",
            r#"{"theme":"dark","defaultReminderTime":5,"notifications":false}"#,
        )
        .unwrap();

    let store = RecordStore::open(&medium).unwrap();
    let settings = store.settings().unwrap();
    assert_eq!(settings.theme, Theme::Dark);
    assert_eq!(settings.default_reminder_time, 5);
    assert!(!settings.notifications);
}

#[test]
fn add_find_update_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let store = RecordStore::open(SqliteMedium::try_new(&conn).unwrap()).unwrap();

    store.add(event("e1", "Standup")).unwrap();
    store.add(event("e2", "Retro")).unwrap();

    let patch = EventPatch {
        title: Some("Sprint retro".to_string()),
        reminder_minutes: Some(30),
        ..EventPatch::default()
    };
    let updated = store.update::<Event>("e2", &patch).unwrap();
    assert_eq!(updated.title, "Sprint retro");
    assert_eq!(updated.reminder_minutes, 30);
    assert_eq!(updated.kind, EventType::Meeting);

    let loaded = store.find::<Event>("e2").unwrap().unwrap();
    assert_eq!(loaded, updated);
    let order: Vec<_> = store
        .events()
        .unwrap()
        .into_iter()
        .map(|event| event.id)
        .collect();
    assert_eq!(order, ["e1", "e2"]);
}

#[test]
fn update_unknown_id_fails_and_leaves_collection_unchanged() {
    let store = RecordStore::open(MemoryMedium::new()).unwrap();
    store.add(task("t1", "Walk dog")).unwrap();
    let before = store.tasks().unwrap();

    let patch = TaskPatch {
        title: Some("ghost".to_string()),
        ..TaskPatch::default()
    };
    let err = store.update::<Task>("missing", &patch).unwrap_err();
    assert!(matches!(
        err,
        StoreError::NotFound { collection: Collection::Tasks, ref id } if id == "missing"
    ));
    assert_eq!(store.tasks().unwrap(), before);
}

#[test]
fn delete_unknown_id_succeeds_and_leaves_collection_unchanged() {
    let store = RecordStore::open(MemoryMedium::new()).unwrap();
    store.add(task("t1", "Walk dog")).unwrap();
    let before = store.tasks().unwrap();

    store.delete::<Task>("missing").unwrap();
    assert_eq!(store.tasks().unwrap(), before);

    store.delete::<Task>("t1").unwrap();
    assert!(store.tasks().unwrap().is_empty());
}

#[test]
fn invalid_records_are_not_persisted() {
    let store = RecordStore::open(MemoryMedium::new()).unwrap();
    let err = store.add(task("t1", "   ")).unwrap_err();
    assert!(matches!(err, StoreError::Validation(ValidationError::EmptyTitle)));
    assert!(store.tasks().unwrap().is_empty());

    store.add(task("t2", "Real title")).unwrap();
    let blank = TaskPatch {
        title: Some(String::new()),
        ..TaskPatch::default()
    };
    assert!(store.update::<Task>("t2", &blank).is_err());
    assert_eq!(store.tasks().unwrap()[0].title, "Real title");
}

#[test]
fn medium_failure_keeps_previous_document() {
    let medium = MemoryMedium::with_quota(400);
    let store = RecordStore::open(&medium).unwrap();
    store.add(task("t1", "Fits")).unwrap();
    let before = medium.get_item("scheduler_tasks").unwrap();

    let huge = task("t2", &"x".repeat(1_000));
    let err = store.add(huge).unwrap_err();
    assert!(matches!(err, StoreError::Medium(_)));
    assert_eq!(medium.get_item("scheduler_tasks").unwrap(), before);
}

#[test]
fn corrupt_documents_are_reported_not_masked() {
    let medium = MemoryMedium::new();
    let store = RecordStore::open(&medium).unwrap();
    medium.set_item("scheduler_events", "{not json").unwrap();

    let err = store.events().unwrap_err();
    assert!(matches!(
        err,
        StoreError::InvalidData {
            collection: Collection::Events,
            ..
        }
    ));
}

#[test]
fn update_settings_merges_shallowly() {
    let store = RecordStore::open(MemoryMedium::new()).unwrap();
    let patch = SettingsPatch {
        theme: Some(Theme::Dark),
        ..SettingsPatch::default()
    };
    let settings = store.update_settings(&patch).unwrap();
    assert_eq!(settings.theme, Theme::Dark);
    assert_eq!(settings.default_reminder_time, 15);
    assert!(settings.notifications);
    assert_eq!(store.settings().unwrap(), settings);
}

#[test]
fn export_then_import_into_empty_store_reproduces_collections() {
    let source = RecordStore::open(MemoryMedium::new()).unwrap();
    source.add(event("e1", "Standup")).unwrap();
    source.add(task("t1", "Ship report")).unwrap();
    source
        .update_settings(&SettingsPatch {
            default_reminder_time: Some(45),
            ..SettingsPatch::default()
        })
        .unwrap();

    let exported_at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
    let json = source.export_json(exported_at).unwrap();
    assert!(json.contains("\"exportTimestamp\""));

    let target = RecordStore::open(MemoryMedium::new()).unwrap();
    target.import_json(&json).unwrap();

    assert_eq!(target.events().unwrap(), source.events().unwrap());
    assert_eq!(target.tasks().unwrap(), source.tasks().unwrap());
    assert_eq!(target.settings().unwrap(), source.settings().unwrap());
}

#[test]
fn import_leaves_absent_collections_untouched() {
    let store = RecordStore::open(MemoryMedium::new()).unwrap();
    store.add(event("e1", "Keep me")).unwrap();

    store
        .import_json(r#"{"tasks":[], "exportDate":"2025-01-01T00:00:00.000Z"}"#)
        .unwrap();
    assert_eq!(store.events().unwrap().len(), 1);

    store
        .import_snapshot(&SnapshotImport {
            events: Some(Vec::new()),
            ..SnapshotImport::default()
        })
        .unwrap();
    assert!(store.events().unwrap().is_empty());
}

#[test]
fn import_rejects_structurally_invalid_documents() {
    let store = RecordStore::open(MemoryMedium::new()).unwrap();
    store.add(event("e1", "Keep me")).unwrap();

    let err = store.import_json(r#"{"events": "nope"}"#).unwrap_err();
    assert!(matches!(err, StoreError::Serialization(_)));
    assert!(store.import_json("not json at all").is_err());
    assert_eq!(store.events().unwrap().len(), 1);
}

#[test]
fn rejected_import_restores_earlier_collections_and_stays_silent() {
    let medium = MemoryMedium::with_quota(600);
    let store = RecordStore::open(&medium).unwrap();
    store.add(event("e1", "Keep me")).unwrap();
    let events_before = medium.get_item("scheduler_events").unwrap();
    let seen: Rc<RefCell<Vec<StoreChange>>> = Rc::default();
    let sink = Rc::clone(&seen);
    store.subscribe(move |change| sink.borrow_mut().push(change.clone()));

    let data = SnapshotImport {
        events: Some(vec![event("e2", "Replacement")]),
        tasks: Some(
            (0..20)
                .map(|index| task(&format!("t{index}"), "Bulk imported task"))
                .collect(),
        ),
        ..SnapshotImport::default()
    };
    let err = store.import_snapshot(&data).unwrap_err();

    assert!(matches!(err, StoreError::Medium(_)));
    assert_eq!(medium.get_item("scheduler_events").unwrap(), events_before);
    assert!(store.tasks().unwrap().is_empty());
    assert!(seen.borrow().is_empty());
}

#[test]
fn clear_all_reinitializes_instead_of_removing() {
    let medium = MemoryMedium::new();
    let store = RecordStore::open(&medium).unwrap();
    store.add(event("e1", "Standup")).unwrap();
    store.add(task("t1", "Walk dog")).unwrap();
    store
        .update_settings(&SettingsPatch {
            theme: Some(Theme::Dark),
            ..SettingsPatch::default()
        })
        .unwrap();

    store.clear_all().unwrap();

    assert!(store.events().unwrap().is_empty());
    assert!(store.tasks().unwrap().is_empty());
    assert_eq!(store.settings().unwrap(), Settings::default());
    assert_eq!(
        medium.get_item("scheduler_events").unwrap().as_deref(),
        Some("[]")
    );
}

#[test]
fn subscribers_see_successful_writes_only() {
    let store = RecordStore::open(MemoryMedium::new()).unwrap();
    let seen: Rc<RefCell<Vec<StoreChange>>> = Rc::default();
    let sink = Rc::clone(&seen);
    let subscription = store.subscribe(move |change| sink.borrow_mut().push(change.clone()));

    store.add(task("t1", "Walk dog")).unwrap();
    store.update::<Task>("t1", &TaskPatch::default()).unwrap();
    let _ = store.update::<Task>("missing", &TaskPatch::default());
    store.delete::<Task>("missing").unwrap();
    store.delete::<Task>("t1").unwrap();

    assert_eq!(
        seen.borrow()
            .iter()
            .map(|change| change.kind.clone())
            .collect::<Vec<_>>(),
        vec![
            ChangeKind::Added {
                id: "t1".to_string()
            },
            ChangeKind::Updated {
                id: "t1".to_string()
            },
            ChangeKind::Deleted {
                id: "t1".to_string()
            },
        ]
    );
    assert!(seen
        .borrow()
        .iter()
        .all(|change| change.collection == Collection::Tasks));

    assert!(store.unsubscribe(subscription));
    assert!(!store.unsubscribe(subscription));
    store.add(task("t2", "Unobserved")).unwrap();
    assert_eq!(seen.borrow().len(), 3);
}

fn event(id: &str, title: &str) -> Event {
    Event {
        id: id.to_string(),
        title: title.to_string(),
        description: None,
        date: NaiveDate::from_ymd_opt(2026, 4, 20).unwrap(),
        time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        kind: EventType::Meeting,
        reminder_minutes: 15,
        is_completed: false,
        created_date: Utc.with_ymd_and_hms(2026, 4, 1, 0, 0, 0).unwrap(),
    }
}

fn task(id: &str, title: &str) -> Task {
    Task {
        id: id.to_string(),
        title: title.to_string(),
        description: None,
        category: "work".to_string(),
        priority: Priority::Medium,
        due_date: None,
        is_completed: false,
        completed_date: None,
        created_date: Utc.with_ymd_and_hms(2026, 4, 1, 0, 0, 0).unwrap(),
    }
}
