use serde::{Deserialize, Serialize};
use storage::repository::{SnapshotRepository, Storage, StorageError};
use storage::snapshot::SnapshotKey;
use storage::sqlite::SqliteSnapshotStore;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubjectRow {
    name: String,
    exam_date: String,
}

#[tokio::test]
async fn sqlite_snapshot_roundtrip_and_overwrite() {
    let repo = SqliteSnapshotStore::connect("sqlite:file:memdb_snapshot_roundtrip?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let key = SnapshotKey::subjects();
    assert!(repo.read(&key).await.unwrap().is_none());

    repo.write(&key, "[]").await.unwrap();
    repo.write(&key, r#"[{"name":"Math"}]"#).await.unwrap();

    let stored = repo.read(&key).await.unwrap();
    assert_eq!(stored.as_deref(), Some(r#"[{"name":"Math"}]"#));

    repo.write(&SnapshotKey::user(), "{}").await.unwrap();
    assert_eq!(
        repo.stored_keys().await.unwrap(),
        vec!["plania_subjects".to_owned(), "plania_user".to_owned()]
    );
}

#[tokio::test]
async fn sqlite_remove_and_migrate_twice() {
    let repo = SqliteSnapshotStore::connect("sqlite:file:memdb_snapshot_remove?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");
    repo.migrate().await.expect("migrations are idempotent");

    let key = SnapshotKey::user();
    repo.write(&key, r#"{"email":"demo@plania.com"}"#).await.unwrap();
    repo.remove(&key).await.unwrap();
    repo.remove(&key).await.unwrap();
    assert!(repo.read(&key).await.unwrap().is_none());
    assert!(repo.stored_keys().await.unwrap().is_empty());
}

#[tokio::test]
async fn storage_sqlite_typed_snapshots() {
    let storage = Storage::sqlite("sqlite:file:memdb_snapshot_typed?mode=memory&cache=shared")
        .await
        .expect("connect sqlite");
    let typed = storage.typed();

    let alice = SnapshotKey::subjects_for("alice@example.com");
    let bob = SnapshotKey::subjects_for("bob@example.com");
    let rows = vec![SubjectRow {
        name: "Chemistry".into(),
        exam_date: "2026-01-15".into(),
    }];
    typed.save(&alice, &rows).await.unwrap();

    let loaded: Option<Vec<SubjectRow>> = typed.load(&alice).await.unwrap();
    assert_eq!(loaded, Some(rows));
    let missing: Option<Vec<SubjectRow>> = typed.load(&bob).await.unwrap();
    assert!(missing.is_none());

    storage.snapshots.write(&bob, "oops").await.unwrap();
    let err = typed.load::<Vec<SubjectRow>>(&bob).await.unwrap_err();
    assert!(matches!(err, StorageError::Serialization(_)));
}
