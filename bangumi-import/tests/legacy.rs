use std::path::Path;

use bangumi_core::{BangumiItem, Classified, ErrorKind};
use bangumi_db::Store;
use bangumi_import::*;
use rusqlite::Connection;

const SNAPSHOT: &str = r#"[
    {"name": "Mushishi", "nameCN": "虫师", "summary": "", "cover": "a.jpg",
     "url": null, "labels": [{"label": "year", "value": "2005"}]},
    {"name": "Haibane Renmei", "labels": null}
]"#;

fn names(items: &[BangumiItem]) -> Vec<&str> {
    items.iter().map(|i| i.name.as_str()).collect()
}

fn write_snapshot(dir: &Path, json: &str) -> std::path::PathBuf {
    let path = dir.join("bangumi-other.json");
    std::fs::write(&path, json).unwrap();
    path
}

#[test]
fn migrates_into_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = write_snapshot(dir.path(), SNAPSHOT);
    let mut store = Store::new(dir.path().join("bangumi.db"));

    let outcome = migrate_legacy_snapshot(&mut store, &snapshot).unwrap();
    assert_eq!(outcome, MigrationOutcome::Imported { rows: 2 });

    let items = store.get_all().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].name_cn, "虫师");
    assert_eq!(items[0].url, "");
    assert_eq!(items[0].labels[0].value, "2005");
    assert!(items[1].labels.is_empty());
    assert!(items.iter().all(|i| i.id.is_some()));
}

#[test]
fn migration_skips_populated_store() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = write_snapshot(dir.path(), SNAPSHOT);
    let mut store = Store::in_memory();
    store.insert_one(&BangumiItem::new("Already here")).unwrap();

    let outcome = migrate_legacy_snapshot(&mut store, &snapshot).unwrap();
    assert_eq!(outcome, MigrationOutcome::AlreadyPopulated { rows: 1 });
    assert_eq!(store.count().unwrap(), 1);
}

#[test]
fn migration_without_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = Store::in_memory();
    let outcome = migrate_legacy_snapshot(&mut store, &dir.path().join("missing.json")).unwrap();
    assert_eq!(outcome, MigrationOutcome::NoSnapshot);
}

#[test]
fn malformed_snapshot_is_serialization_error() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = write_snapshot(dir.path(), "{\"not\": \"a list\"}");
    let mut store = Store::in_memory();

    let err = migrate_legacy_snapshot(&mut store, &snapshot).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Serialization);
    assert_eq!(store.count().unwrap(), 0);
}

#[test]
fn load_reads_store_when_healthy() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = write_snapshot(dir.path(), SNAPSHOT);
    let mut store = Store::in_memory();
    store.insert_one(&BangumiItem::new("Kept")).unwrap();

    let items = load_or_migrate(&mut store, &snapshot).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "Kept");
}

fn corrupt_store(db_path: &Path) {
    {
        let mut store = Store::new(db_path);
        store.insert_one(&BangumiItem::new("Broken")).unwrap();
    }
    let conn = Connection::open(db_path).unwrap();
    conn.execute("UPDATE bangumi SET labels = 'not json'", []).unwrap();
}

#[test]
fn load_serves_snapshot_when_store_is_unreadable() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("bangumi.db");
    let snapshot = write_snapshot(dir.path(), SNAPSHOT);
    corrupt_store(&db_path);

    let mut store = Store::new(&db_path);
    assert!(store.get_all().is_err());

    for _ in 0..3 {
        let items = load_or_migrate(&mut store, &snapshot).unwrap();
        assert_eq!(names(&items), vec!["Mushishi", "Haibane Renmei"]);
        // The unreadable row stays, nothing is appended next to it.
        assert_eq!(store.count().unwrap(), 1);
    }
}

#[test]
fn load_serves_snapshot_when_store_cannot_open() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = write_snapshot(dir.path(), SNAPSHOT);
    let blocked = dir.path().join("not-a-db");
    std::fs::create_dir(&blocked).unwrap();

    let mut store = Store::new(&blocked);
    let items = load_or_migrate(&mut store, &snapshot).unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].labels[0].value, "2005");
}

#[test]
fn load_without_snapshot_is_empty_success() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("bangumi.db");
    corrupt_store(&db_path);

    let mut store = Store::new(&db_path);
    let items = load_or_migrate(&mut store, &dir.path().join("missing.json")).unwrap();
    assert!(items.is_empty());
}
