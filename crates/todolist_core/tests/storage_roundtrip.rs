use chrono::{DateTime, TimeZone, Utc};
use todolist_core::{
    generate_id_seeded, FileMedium, MemoryMedium, StoreError, Todo, TodoStorage,
    STORAGE_FORMAT_VERSION, TODO_STORAGE_KEY,
};

fn fixed_time(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 123_456_789).unwrap()
}

fn sample_todos() -> Vec<Todo> {
    let mut second = Todo::with_id(generate_id_seeded(2), "review notes", fixed_time(1_700_000_100));
    second.completed = true;
    second.updated_at = fixed_time(1_700_000_200);
    vec![
        Todo::with_id(generate_id_seeded(1), "buy milk", fixed_time(1_700_000_000)),
        second,
    ]
}

#[test]
fn file_medium_save_then_load_roundtrips_all_fields() {
    let dir = tempfile::tempdir().unwrap();
    let mut storage = TodoStorage::new(FileMedium::new(dir.path()));

    let todos = sample_todos();
    storage.save(&todos, fixed_time(1_700_000_300)).unwrap();

    let loaded = storage.load().unwrap().unwrap();
    assert_eq!(loaded, todos);
}

#[test]
fn load_of_absent_key_returns_none() {
    let dir = tempfile::tempdir().unwrap();
    let storage = TodoStorage::new(FileMedium::new(dir.path()));
    assert!(storage.load().unwrap().is_none());
}

#[test]
fn custom_keys_are_isolated() {
    let dir = tempfile::tempdir().unwrap();
    let mut first = TodoStorage::with_key(FileMedium::new(dir.path()), "list-a");
    let second = TodoStorage::with_key(FileMedium::new(dir.path()), "list-b");

    first.save(&sample_todos(), fixed_time(1_700_000_300)).unwrap();

    assert_eq!(first.load().unwrap().unwrap().len(), 2);
    assert!(second.load().unwrap().is_none());
}

#[test]
fn remove_deletes_the_stored_list() {
    let dir = tempfile::tempdir().unwrap();
    let mut storage = TodoStorage::new(FileMedium::new(dir.path()));

    storage.save(&sample_todos(), fixed_time(1_700_000_300)).unwrap();
    storage.remove().unwrap();

    assert!(storage.load().unwrap().is_none());
}

#[test]
fn probe_reports_usable_file_medium() {
    let dir = tempfile::tempdir().unwrap();
    let mut storage = TodoStorage::new(FileMedium::new(dir.path()));
    assert!(storage.probe());
    // The throwaway probe key must not linger as a stored list.
    assert!(storage.load().unwrap().is_none());
}

#[test]
fn detached_storage_is_a_silent_no_op() {
    let mut storage = TodoStorage::<MemoryMedium>::detached();
    assert!(!storage.probe());
    assert!(storage.load().unwrap().is_none());
    storage.save(&sample_todos(), fixed_time(0)).unwrap();
    storage.remove().unwrap();
}

#[test]
fn probe_is_false_on_disabled_medium() {
    let medium = MemoryMedium::new();
    medium.set_disabled(true);
    let mut storage = TodoStorage::new(medium);
    assert!(!storage.probe());
}

#[test]
fn envelope_wire_format_uses_camel_case_and_version_tag() {
    let medium = MemoryMedium::new();
    let mut storage = TodoStorage::new(medium.clone());
    storage.save(&sample_todos(), fixed_time(1_700_000_300)).unwrap();

    let raw = medium.item(TODO_STORAGE_KEY).unwrap();
    assert!(raw.contains(&format!("\"version\":\"{STORAGE_FORMAT_VERSION}\"")));
    assert!(raw.contains("\"lastModified\""));
    assert!(raw.contains("\"createdAt\""));
    assert!(raw.contains("\"updatedAt\""));
    assert!(!raw.contains("\"created_at\""));
}

#[test]
fn version_mismatch_is_tolerated_on_load() {
    let medium = MemoryMedium::new();
    let id = generate_id_seeded(7);
    medium.seed_item(
        TODO_STORAGE_KEY,
        &format!(
            r#"{{"version":"0.9.0","data":[{{"id":"{id}","text":"old format","completed":false,"createdAt":"2023-11-14T22:13:20+00:00","updatedAt":"2023-11-14T22:13:20+00:00"}}],"lastModified":"2023-11-14T22:13:20+00:00"}}"#
        ),
    );

    let storage = TodoStorage::new(medium);
    let loaded = storage.load().unwrap().unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].text, "old format");
}

#[test]
fn corrupt_envelope_json_is_a_read_error() {
    let medium = MemoryMedium::new();
    medium.seed_item(TODO_STORAGE_KEY, "{not json");

    let storage = TodoStorage::new(medium);
    assert!(matches!(storage.load(), Err(StoreError::Read(_))));
}

#[test]
fn unparsable_timestamp_is_a_read_error_naming_the_field() {
    let medium = MemoryMedium::new();
    let id = generate_id_seeded(9);
    medium.seed_item(
        TODO_STORAGE_KEY,
        &format!(
            r#"{{"version":"1.0.0","data":[{{"id":"{id}","text":"x","completed":false,"createdAt":"yesterday","updatedAt":"2023-11-14T22:13:20+00:00"}}],"lastModified":"2023-11-14T22:13:20+00:00"}}"#
        ),
    );

    let storage = TodoStorage::new(medium);
    match storage.load() {
        Err(StoreError::Read(detail)) => assert!(detail.contains("createdAt")),
        other => panic!("expected read error, got {other:?}"),
    }
}

#[test]
fn invalid_id_shape_is_a_read_error() {
    let medium = MemoryMedium::new();
    medium.seed_item(
        TODO_STORAGE_KEY,
        r#"{"version":"1.0.0","data":[{"id":"not-a-uuid","text":"x","completed":false,"createdAt":"2023-11-14T22:13:20+00:00","updatedAt":"2023-11-14T22:13:20+00:00"}],"lastModified":"2023-11-14T22:13:20+00:00"}"#,
    );

    let storage = TodoStorage::new(medium);
    assert!(matches!(storage.load(), Err(StoreError::Read(_))));
}

#[test]
fn empty_persisted_text_is_rejected_on_load() {
    let medium = MemoryMedium::new();
    let id = generate_id_seeded(11);
    medium.seed_item(
        TODO_STORAGE_KEY,
        &format!(
            r#"{{"version":"1.0.0","data":[{{"id":"{id}","text":"   ","completed":false,"createdAt":"2023-11-14T22:13:20+00:00","updatedAt":"2023-11-14T22:13:20+00:00"}}],"lastModified":"2023-11-14T22:13:20+00:00"}}"#
        ),
    );

    let storage = TodoStorage::new(medium);
    assert!(matches!(storage.load(), Err(StoreError::Read(_))));
}

#[test]
fn quota_exhaustion_maps_to_quota_error() {
    let medium = MemoryMedium::new();
    medium.set_quota_exceeded(true);
    let mut storage = TodoStorage::new(medium);

    let err = storage
        .save(&sample_todos(), fixed_time(1_700_000_300))
        .unwrap_err();
    assert!(matches!(err, StoreError::Quota(_)));
    assert!(err.to_string().contains("quota"));
}

#[test]
fn disabled_medium_write_is_a_write_error() {
    let medium = MemoryMedium::new();
    medium.set_disabled(true);
    let mut storage = TodoStorage::new(medium);

    assert!(matches!(
        storage.save(&sample_todos(), fixed_time(0)),
        Err(StoreError::Write(_))
    ));
}
