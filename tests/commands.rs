use std::time::Duration;

use ilre::commands::entry::{create_entry, delete_entry, get_entries, get_entry, update_entry, EntryPatch};
use ilre::commands::storage::get_storage_stats;
use ilre::commands::sync::{push_to_cloud, restore_from_cloud, test_connection};
use ilre::commands::AppContext;
use ilre::database::RecordStore;
use ilre::models::{Settings, SyncStatus};
use ilre::services::remote::{InMemoryRemote, RemoteOp};
use ilre::utils::config;

fn context(dir: &std::path::Path, remote: InMemoryRemote) -> AppContext<InMemoryRemote> {
    let store = RecordStore::open(&config::database_path(dir)).expect("open store");
    AppContext::with_remote(dir, Settings::default(), store, remote)
}

#[tokio::test]
async fn entries_survive_reopening_the_database() {
    let dir = tempfile::tempdir().expect("tempdir");
    let id = {
        let ctx = context(dir.path(), InMemoryRemote::new());
        let patch = EntryPatch {
            tags: Some("portrait, film，grain".to_string()),
            primary_media_ref: Some("data:video/mp4;base64,AAAA".to_string()),
            ..EntryPatch::default()
        };
        create_entry(&ctx, "Portrait".into(), "soft light".into(), "txt2img".into(), patch)
            .expect("create")
            .id
    };

    let ctx = context(dir.path(), InMemoryRemote::new());
    let entry = get_entry(&ctx, &id).expect("get");
    assert_eq!(entry.tags, vec!["portrait", "film", "grain"]);
    assert!(entry.dirty);
    assert!(ilre::utils::media::is_video(&entry));
}

#[tokio::test]
async fn edits_keep_created_at_and_clear_optionals() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = context(dir.path(), InMemoryRemote::new());
    let created = create_entry(
        &ctx,
        "Title".into(),
        "Body".into(),
        "general".into(),
        EntryPatch {
            negative_body: Some("noise".into()),
            ..EntryPatch::default()
        },
    )
    .expect("create");

    let updated = update_entry(
        &ctx,
        &created.id,
        EntryPatch {
            title: Some("Renamed".into()),
            negative_body: Some(String::new()),
            ..EntryPatch::default()
        },
    )
    .expect("update");

    assert_eq!(updated.title, "Renamed");
    assert_eq!(updated.negative_body, None);
    assert_eq!(updated.created_at, created.created_at);
}

#[tokio::test]
async fn blank_titles_are_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = context(dir.path(), InMemoryRemote::new());
    let result = create_entry(&ctx, " ".into(), "Body".into(), "general".into(), EntryPatch::default());
    assert!(result.is_err());
    assert!(get_entries(&ctx, None, None).expect("list").is_empty());
}

#[tokio::test]
async fn media_categories_need_an_output_reference() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = context(dir.path(), InMemoryRemote::new());

    let result = create_entry(&ctx, "Clip".into(), "pan left".into(), "img2vid".into(), EntryPatch::default());
    assert!(result.is_err());
    assert!(get_entries(&ctx, None, None).expect("list").is_empty());

    let entry = create_entry(&ctx, "Agent".into(), "you review code".into(), "general".into(), EntryPatch::default())
        .expect("general needs no media");
    let moved = update_entry(
        &ctx,
        &entry.id,
        EntryPatch {
            category: Some("txt2img".into()),
            ..EntryPatch::default()
        },
    );
    assert!(moved.is_err());
    assert_eq!(get_entry(&ctx, &entry.id).expect("get").category, "general");
}

#[tokio::test(start_paused = true)]
async fn push_updates_the_status_indicator() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = context(dir.path(), InMemoryRemote::new());
    create_entry(&ctx, "A".into(), "B".into(), "general".into(), EntryPatch::default()).expect("create");

    let report = push_to_cloud(&ctx).await.expect("push");
    assert_eq!(report.uploaded, 1);
    assert_eq!(
        ctx.status.current(),
        SyncStatus::Succeeded("sync succeeded: 1 uploaded, 0 deleted".into())
    );

    tokio::time::sleep(Duration::from_secs(4)).await;
    assert_eq!(ctx.status.current(), SyncStatus::Idle);
}

#[tokio::test(start_paused = true)]
async fn failed_restore_shows_failure_then_clears() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = context(dir.path(), InMemoryRemote::new());
    ctx.engine.remote().fail(RemoteOp::Fetch);

    assert!(restore_from_cloud(&ctx).await.is_err());
    assert_eq!(ctx.status.current(), SyncStatus::Failed("restore failed".into()));

    tokio::time::sleep(Duration::from_secs(4)).await;
    assert_eq!(ctx.status.current(), SyncStatus::Idle);
}

#[tokio::test]
async fn storage_report_tracks_pending_work() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = context(dir.path(), InMemoryRemote::new());
    let entry = create_entry(&ctx, "A".into(), "B".into(), "general".into(), EntryPatch::default()).expect("create");
    create_entry(&ctx, "C".into(), "D".into(), "general".into(), EntryPatch::default()).expect("create");
    delete_entry(&ctx, &entry.id).expect("delete");

    let report = get_storage_stats(&ctx).expect("stats");
    assert_eq!(report.stats.entries_count, 1);
    assert_eq!(report.stats.dirty_count, 1);
    assert_eq!(report.stats.pending_deletes, 1);
    assert!(report.connected);

    test_connection(&ctx).await.expect("ping");
    push_to_cloud(&ctx).await.expect("push");

    let report = get_storage_stats(&ctx).expect("stats");
    assert_eq!(report.stats.dirty_count, 0);
    assert_eq!(report.stats.pending_deletes, 0);
}

#[tokio::test]
async fn listing_filters_by_category_and_search() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = context(dir.path(), InMemoryRemote::new());
    let media = EntryPatch {
        primary_media_ref: Some("https://cdn.example/forest.png".into()),
        ..EntryPatch::default()
    };
    create_entry(&ctx, "Forest".into(), "misty pines".into(), "txt2img".into(), media).expect("create");
    create_entry(&ctx, "Coder".into(), "you are a reviewer".into(), "general".into(), EntryPatch::default()).expect("create");

    let found = get_entries(&ctx, Some("txt2img".into()), Some("PINES".into())).expect("list");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].title, "Forest");
    assert!(get_entries(&ctx, Some("general".into()), Some("pines".into())).expect("list").is_empty());
}

#[test]
fn config_edits_do_not_create_the_database() {
    let dir = tempfile::tempdir().expect("tempdir");
    ilre::commands::settings::update_remote_settings(
        dir.path(),
        Some("https://example.supabase.co".into()),
        Some("anon".into()),
        None,
    )
    .expect("write settings");

    assert!(config::settings_path(dir.path()).exists());
    assert!(!config::database_path(dir.path()).exists());
}
