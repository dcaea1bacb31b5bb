use folio_core::db::open_db_in_memory;
use folio_core::{
    AchievementDraft, ContentStore, ImportError, ProjectDraft, ProjectStatus, ResetConfirmation,
    SqliteKvStore, StoreError,
};

#[test]
fn export_then_import_round_trips_both_collections() {
    let conn = open_db_in_memory().unwrap();
    let mut store = ContentStore::open(SqliteKvStore::new(&conn)).unwrap();
    store.set_admin_mode(true).unwrap();
    store
        .add_project(ProjectDraft::new("X", "Y", ProjectStatus::Planned))
        .unwrap();
    store
        .add_achievement(AchievementDraft::new("Award", "Won it"))
        .unwrap();
    store.move_project("3", 0).unwrap();

    let projects_before = store.projects();
    let achievements_before = store.achievements();
    let payload = store.export_snapshot().unwrap();

    let summary = store.import_snapshot(&payload).unwrap();
    assert_eq!(summary.projects, Some(4));
    assert_eq!(summary.achievements, Some(4));
    assert!(summary.admin_mode);

    assert_eq!(store.projects(), projects_before);
    assert_eq!(store.achievements(), achievements_before);
}

#[test]
fn import_without_achievements_keeps_them_and_replaces_projects() {
    let conn = open_db_in_memory().unwrap();
    let mut store = ContentStore::open(SqliteKvStore::new(&conn)).unwrap();
    store.set_admin_mode(true).unwrap();
    store
        .add_achievement(AchievementDraft::new("Kept", "stays"))
        .unwrap();
    let achievements_before = store.achievements();

    let payload = r#"{
        "projects": [{
            "id": "only",
            "title": "Solo",
            "description": "Imported",
            "tags": ["Rust"],
            "status": "in-progress",
            "order": 1,
            "createdAt": "2024-03-01T12:00:00Z"
        }]
    }"#;
    let summary = store.import_snapshot(payload).unwrap();

    assert_eq!(summary.projects, Some(1));
    assert_eq!(summary.achievements, None);
    let projects = store.projects();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].title, "Solo");
    assert_eq!(projects[0].status, ProjectStatus::InProgress);
    assert_eq!(store.achievements(), achievements_before);
}

#[test]
fn invalid_import_fails_without_changing_anything() {
    let conn = open_db_in_memory().unwrap();
    let mut store = ContentStore::open(SqliteKvStore::new(&conn)).unwrap();
    store
        .add_project(ProjectDraft::new("X", "Y", ProjectStatus::Planned))
        .unwrap();
    store.set_admin_mode(true).unwrap();
    let projects_before = store.projects();
    let achievements_before = store.achievements();

    for payload in [
        "{ not json",
        "42",
        "{}",
        r#"{"projects": "nope"}"#,
        r#"{"projects": [], "achievements": [{"id": "1"}]}"#,
    ] {
        let err = store.import_snapshot(payload).unwrap_err();
        assert!(matches!(err, StoreError::Import(_)), "payload {payload}");
    }

    assert_eq!(store.projects(), projects_before);
    assert_eq!(store.achievements(), achievements_before);
    assert!(store.is_admin_mode());
}

#[test]
fn import_with_duplicate_ids_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let mut store = ContentStore::open(SqliteKvStore::new(&conn)).unwrap();
    let mut projects = store.projects();
    projects[2].id = "1".to_string();
    let payload = serde_json::json!({ "projects": projects }).to_string();

    let err = store.import_snapshot(&payload).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Import(ImportError::DuplicateId { kind: "project", .. })
    ));
    assert_eq!(store.projects().len(), 3);
}

#[test]
fn reset_then_import_restores_added_project() {
    let conn = open_db_in_memory().unwrap();
    let mut store = ContentStore::open(SqliteKvStore::new(&conn)).unwrap();
    let created = store
        .add_project(ProjectDraft::new("X", "Y", ProjectStatus::Planned))
        .unwrap();
    assert_eq!(created.order, 4);
    let payload = store.export_snapshot().unwrap();

    store
        .reset_to_default(ResetConfirmation::confirmed())
        .unwrap();
    assert!(!store.is_admin_mode());
    assert_eq!(store.projects().len(), 3);
    assert_eq!(store.managed_projects().len(), 3);

    let summary = store.import_snapshot(&payload).unwrap();
    assert!(!summary.admin_mode);
    let managed = store.managed_projects();
    assert_eq!(managed.len(), 4);
    assert!(managed
        .iter()
        .any(|project| project.id == created.id && project.title == "X"));

    store.set_admin_mode(true).unwrap();
    assert_eq!(store.projects(), managed);
}

#[test]
fn legacy_payload_without_admin_mode_switches_admin_mode_on() {
    let conn = open_db_in_memory().unwrap();
    let mut store = ContentStore::open(SqliteKvStore::new(&conn)).unwrap();
    store.set_admin_mode(false).unwrap();

    let summary = store
        .import_snapshot(r#"{"achievements": []}"#)
        .unwrap();

    assert!(summary.admin_mode);
    assert!(store.is_admin_mode());
    assert!(store.achievements().is_empty());
}

#[test]
fn export_with_admin_mode_off_round_trips_presented_view() {
    let conn = open_db_in_memory().unwrap();
    let mut store = ContentStore::open(SqliteKvStore::new(&conn)).unwrap();
    store
        .add_project(ProjectDraft::new("hidden", "admin only", ProjectStatus::Planned))
        .unwrap();
    store.set_admin_mode(false).unwrap();
    let presented_before = store.projects();

    let payload = store.export_snapshot().unwrap();
    store.import_snapshot(&payload).unwrap();

    assert!(!store.is_admin_mode());
    assert_eq!(store.projects(), presented_before);
    assert_eq!(store.managed_projects().len(), 4);
}
