//! Favorites reconciliation against a real catalog directory and SQLite store.
//!
//! Tests verify:
//! - Idempotent add and add/remove round trip
//! - Stale ids are hidden on read and dropped on the next write
//! - The t1/t2/t3 walkthrough for a single account
//! - Concurrent toggles for one account do not lose updates

use std::path::Path;
use std::sync::Arc;

use dictation_core::{FavoritesRepository, FavoritesService, TargetCatalog, TargetId};
use dictation_db::Database;
use tempfile::TempDir;

struct Fixture {
    root: TempDir,
    db: Database,
    service: FavoritesService,
}

async fn setup(targets: &[&str]) -> Fixture {
    let root = tempfile::tempdir().expect("Failed to create temp dir");
    let targets_dir = root.path().join("targets");
    std::fs::create_dir_all(&targets_dir).unwrap();
    for t in targets {
        write_target(root.path(), t);
    }

    let url = format!("sqlite://{}", root.path().join("data.db").display());
    let db = Database::connect(&url).await.unwrap();
    db.migrate().await.unwrap();

    let service = FavoritesService::new(
        TargetCatalog::new(root.path()),
        Arc::new(db.favorites.clone()),
    );
    Fixture { root, db, service }
}

fn write_target(root: &Path, id: &str) {
    std::fs::write(root.join("targets").join(format!("{}.md", id)), "text").unwrap();
}

fn ids(list: &[&str]) -> Vec<TargetId> {
    list.iter().map(|s| TargetId::new(*s).unwrap()).collect()
}

#[tokio::test]
async fn test_walkthrough_t1_t2_t3() {
    let f = setup(&["t1", "t2", "t3"]).await;

    f.service.set_favorite("alice", "t1", true).await.unwrap();
    assert_eq!(f.service.favorites("alice").await, ids(&["t1"]));

    f.service.set_favorite("alice", "t2", true).await.unwrap();
    assert_eq!(f.service.favorites("alice").await, ids(&["t1", "t2"]));

    f.service.set_favorite("alice", "t1", false).await.unwrap();
    assert_eq!(f.service.favorites("alice").await, ids(&["t2"]));
}

#[tokio::test]
async fn test_add_twice_equals_add_once() {
    let f = setup(&["t1", "t2"]).await;

    f.service.set_favorite("alice", "t1", true).await.unwrap();
    let once = f.db.favorites.get("alice").await;
    f.service.set_favorite("alice", "t1", true).await.unwrap();
    let twice = f.db.favorites.get("alice").await;

    assert_eq!(once, twice);
    assert_eq!(twice, ids(&["t1"]));
}

#[tokio::test]
async fn test_add_then_remove_restores_previous_state() {
    let f = setup(&["t1", "t2", "t3"]).await;
    f.service.set_favorite("alice", "t2", true).await.unwrap();
    f.service.set_favorite("alice", "t3", true).await.unwrap();
    let before = f.service.favorites("alice").await;

    f.service.set_favorite("alice", "t1", true).await.unwrap();
    f.service.set_favorite("alice", "t1", false).await.unwrap();

    let after = f.service.favorites("alice").await;
    assert!(!after.contains(&TargetId::new("t1").unwrap()));
    assert_eq!(after, before);
}

#[tokio::test]
async fn test_remove_on_empty_account_stores_empty_list() {
    let f = setup(&["t1"]).await;
    f.service.set_favorite("bob", "t1", false).await.unwrap();
    assert!(f.service.favorites("bob").await.is_empty());
    assert_eq!(
        f.db.favorites.fetch_raw("bob").await.unwrap().as_deref(),
        Some("[]")
    );
}

#[tokio::test]
async fn test_stale_target_filtered_then_healed() {
    let f = setup(&["t1", "t2", "other"]).await;
    f.service.set_favorite("alice", "t1", true).await.unwrap();
    f.service.set_favorite("alice", "t2", true).await.unwrap();

    std::fs::remove_file(f.root.path().join("targets").join("t1.md")).unwrap();

    assert_eq!(f.service.favorites("alice").await, ids(&["t2"]));
    assert_eq!(f.db.favorites.get("alice").await, ids(&["t1", "t2"]));

    f.service.set_favorite("alice", "other", true).await.unwrap();
    assert_eq!(f.db.favorites.get("alice").await, ids(&["t2", "other"]));
}

#[tokio::test]
async fn test_stale_legacy_row_healed_on_write() {
    let f = setup(&["t2", "t3"]).await;
    sqlx::query("INSERT INTO favorite (account, targets) VALUES ('alice', 'gone,t2')")
        .execute(f.db.pool())
        .await
        .unwrap();

    assert_eq!(f.service.favorites("alice").await, ids(&["t2"]));

    f.service.set_favorite("alice", "t3", true).await.unwrap();
    assert_eq!(
        f.db.favorites.fetch_raw("alice").await.unwrap().as_deref(),
        Some(r#"["t2","t3"]"#)
    );
}

#[tokio::test]
async fn test_legacy_bracketed_ids_survive_next_write() {
    let f = setup(&["[draft]", "t2", "t3"]).await;
    sqlx::query("INSERT INTO favorite (account, targets) VALUES ('alice', '[draft],t2')")
        .execute(f.db.pool())
        .await
        .unwrap();

    assert_eq!(f.service.favorites("alice").await, ids(&["[draft]", "t2"]));

    f.service.set_favorite("alice", "t3", true).await.unwrap();
    assert_eq!(
        f.db.favorites.fetch_raw("alice").await.unwrap().as_deref(),
        Some(r#"["[draft]","t2","t3"]"#)
    );
    assert_eq!(
        f.service.favorites("alice").await,
        ids(&["[draft]", "t2", "t3"])
    );
}

#[tokio::test]
async fn test_favorite_reappears_when_target_restored() {
    let f = setup(&["t1"]).await;
    f.service.set_favorite("alice", "draft", true).await.unwrap();
    assert!(f.service.favorites("alice").await.is_empty());

    write_target(f.root.path(), "draft");
    assert_eq!(f.service.favorites("alice").await, ids(&["draft"]));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_adds_for_one_account() {
    let names: Vec<String> = (0..12).map(|i| format!("t{}", i)).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let f = setup(&refs).await;

    let tasks: Vec<_> = names
        .iter()
        .map(|name| {
            let service = f.service.clone();
            let name = name.clone();
            tokio::spawn(async move { service.set_favorite("alice", &name, true).await })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let mut stored = f.db.favorites.get("alice").await;
    stored.sort();
    let mut expected = ids(&refs);
    expected.sort();
    assert_eq!(stored, expected);
}
