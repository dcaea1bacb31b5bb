use folio_core::db::open_db_in_memory;
use folio_core::{
    AchievementDraft, AchievementPatch, ContentStore, KvStore, ProjectDraft, ProjectPatch,
    ProjectStatus, SqliteKvStore,
};
use rusqlite::Connection;
use std::collections::HashSet;

fn project_ids(store: &ContentStore<SqliteKvStore<'_>>) -> Vec<String> {
    store.projects().into_iter().map(|p| p.id).collect()
}

fn open_admin_store(conn: &Connection) -> ContentStore<SqliteKvStore<'_>> {
    let mut store = ContentStore::open(SqliteKvStore::new(conn)).unwrap();
    store.set_admin_mode(true).unwrap();
    store
}

#[test]
fn fresh_store_presents_defaults_with_admin_mode_off() {
    let conn = open_db_in_memory().unwrap();
    let store = ContentStore::open(SqliteKvStore::new(&conn)).unwrap();

    assert!(!store.is_admin_mode());
    assert_eq!(project_ids(&store), vec!["1", "2", "3"]);
    assert_eq!(store.achievements().len(), 3);
}

#[test]
fn add_from_defaults_grows_managed_collection() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_admin_store(&conn);

    let created = store
        .add_project(ProjectDraft::new("X", "Y", ProjectStatus::Planned))
        .unwrap();

    assert_eq!(created.order, 4);
    let managed = store.managed_projects();
    assert_eq!(managed.len(), 4);
    assert_eq!(managed[3].id, created.id);
    assert_eq!(store.projects().len(), 3);
}

#[test]
fn add_assigns_fresh_unique_ids_and_next_order() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_admin_store(&conn);

    let created = store
        .add_project(ProjectDraft::new("X", "Y", ProjectStatus::Planned))
        .unwrap();
    assert_eq!(created.order, 4);
    assert_eq!(store.projects().len(), 4);

    for index in 0..20 {
        store
            .add_project(ProjectDraft::new(
                format!("p{index}"),
                "d",
                ProjectStatus::InProgress,
            ))
            .unwrap();
    }
    let ids: HashSet<String> = project_ids(&store).into_iter().collect();
    assert_eq!(ids.len(), 24);
}

#[test]
fn add_writes_through_to_storage() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_admin_store(&conn);

    let created = store
        .add_achievement(AchievementDraft::new("Rust Cert", "Passed"))
        .unwrap();

    let raw = SqliteKvStore::new(&conn)
        .get("portfolio_achievements")
        .unwrap()
        .unwrap();
    assert!(raw.contains(&created.id));
    assert!(raw.contains("Rust Cert"));
}

#[test]
fn update_changes_only_patched_fields() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_admin_store(&conn);
    let before = store.project("2").unwrap();

    let applied = store
        .update_project(
            "2",
            ProjectPatch {
                status: Some(ProjectStatus::InProgress),
                ..ProjectPatch::default()
            },
        )
        .unwrap();
    assert!(applied);

    let after = store.project("2").unwrap();
    assert_eq!(after.status, ProjectStatus::InProgress);
    assert_eq!(after.title, before.title);
    assert_eq!(after.description, before.description);
    assert_eq!(after.tags, before.tags);
    assert_eq!(after.live_url, before.live_url);
    assert_eq!(after.order, before.order);
    assert_eq!(after.created_at, before.created_at);
}

#[test]
fn update_on_absent_id_leaves_storage_byte_for_byte_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_admin_store(&conn);
    store
        .add_project(ProjectDraft::new("seed", "persist once", ProjectStatus::Planned))
        .unwrap();
    let kv = SqliteKvStore::new(&conn);
    let raw_before = kv.get("portfolio_projects").unwrap();

    let applied = store
        .update_project(
            "missing",
            ProjectPatch {
                title: Some("ghost".to_string()),
                ..ProjectPatch::default()
            },
        )
        .unwrap();
    assert!(!applied);
    assert!(!store
        .update_achievement("missing", AchievementPatch::default())
        .unwrap());

    assert_eq!(kv.get("portfolio_projects").unwrap(), raw_before);
    assert!(kv.get("portfolio_achievements").unwrap().is_none());
}

#[test]
fn delete_removes_exactly_one_and_keeps_order() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_admin_store(&conn);

    assert!(store.delete_project("2").unwrap());
    assert_eq!(project_ids(&store), vec!["1", "3"]);

    assert!(!store.delete_project("2").unwrap());
    assert_eq!(project_ids(&store), vec!["1", "3"]);
}

#[test]
fn reorder_replaces_collection_and_display_sort_is_stable() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_admin_store(&conn);

    let mut projects = store.projects();
    for project in &mut projects {
        project.order = 7;
    }
    projects.reverse();
    store.reorder_projects(projects).unwrap();

    assert_eq!(project_ids(&store), vec!["3", "2", "1"]);
    assert_eq!(project_ids(&store), vec!["3", "2", "1"]);
}

#[test]
fn equal_orders_keep_insertion_order_after_update() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_admin_store(&conn);

    store
        .update_project(
            "3",
            ProjectPatch {
                order: Some(1),
                ..ProjectPatch::default()
            },
        )
        .unwrap();

    assert_eq!(project_ids(&store), vec!["1", "3", "2"]);
}

#[test]
fn move_renumbers_display_orders() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_admin_store(&conn);

    assert!(store.move_achievement("1", 2).unwrap());
    let achievements = store.achievements();
    let ids: Vec<&str> = achievements.iter().map(|a| a.id.as_str()).collect();
    let orders: Vec<i64> = achievements.iter().map(|a| a.order).collect();
    assert_eq!(ids, vec!["2", "3", "1"]);
    assert_eq!(orders, vec![1, 2, 3]);

    assert!(!store.move_achievement("missing", 0).unwrap());
}

#[test]
fn stats_count_managed_collections() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_admin_store(&conn);
    store.delete_achievement("1").unwrap();

    let stats = store.stats();
    assert_eq!(stats.projects, 3);
    assert_eq!(stats.achievements, 2);
    assert!(stats.admin_mode);
}
