//! End-to-end editing workflow: load, unlock, edit, export, "redeploy",
//! reload. The persistence loop is manual and human-closed: the export lands
//! in a download directory, and copying it into the site's data directory
//! stands in for the operator's commit + redeploy.

use serde_json::json;
use std::sync::Arc;
use tempfile::tempdir;
use test_log::test;

use folio_core::{
    auth::{AdminSession, Credential, FileSessionStore, DEFAULT_CHORD},
    commands::EditOp,
    document::{Domain, FieldPath},
    export::DownloadDirTarget,
    loader::{ContentLoader, FileContentSource},
    paths::PathResolver,
    store::{ContentStore, EditorSession, FileWorkingCache},
    FolioError,
};

mod common;

const BASE: &str = "/MadhuPortfolio/";
const PASSWORD: &str = "letmein";

fn loader_for(site_root: std::path::PathBuf) -> ContentLoader {
    ContentLoader::new(
        Arc::new(FileContentSource::new(site_root, BASE)),
        PathResolver::new(BASE),
    )
}

fn admin_for(session_file: std::path::PathBuf) -> AdminSession {
    let credential = Credential::generate_with_iterations(PASSWORD, 10).unwrap();
    AdminSession::new(
        DEFAULT_CHORD,
        Arc::new(credential),
        Arc::new(FileSessionStore::new(session_file)),
    )
}

#[test(tokio::test)]
async fn test_full_edit_export_redeploy_cycle() {
    common::init_logging();
    let temp_dir = tempdir().unwrap();
    let site_root = common::create_site_fixture(&temp_dir);
    let loader = loader_for(site_root.clone());

    // Seed an editing session from the loaded site.
    let mut session = EditorSession::new(admin_for(temp_dir.path().join("session")));
    for (domain, doc) in loader.load_all_page_contents().await {
        session.seed_domain(ContentStore::seed(domain, doc));
    }

    // Mutations are refused while locked.
    assert_eq!(
        session.store_mut(Domain::Portfolio).err(),
        Some(FolioError::PermissionDenied)
    );

    // Chord + password unlocks the editor.
    session.admin_mut().on_key(true, true, 'e');
    session.admin_mut().submit(PASSWORD).await.unwrap();

    let projects: FieldPath = "projects".parse().unwrap();
    let store = session.store_mut(Domain::Portfolio).unwrap();
    assert!(store.apply(EditOp::AppendItem(
        projects.clone(),
        json!({ "title": "New", "image": "" })
    )));
    assert!(store.apply(EditOp::SetItemField(
        projects.clone(),
        1,
        "description".to_string(),
        json!("Fresh out of the editor")
    )));
    assert_eq!(session.dirty_domains(), vec![Domain::Portfolio]);

    // Export: the entire write path is a file download.
    let downloads = temp_dir.path().join("downloads");
    let file_name = session
        .export(Domain::Portfolio, &DownloadDirTarget::new(downloads.clone()))
        .unwrap();
    let exported = std::fs::read_to_string(downloads.join(&file_name)).unwrap();
    let reparsed: serde_json::Value = serde_json::from_str(&exported).unwrap();
    assert_eq!(
        &reparsed,
        session.store(Domain::Portfolio).unwrap().working(),
        "the downloaded file must round-trip the working copy"
    );

    // The operator moves the download into the site tree and redeploys.
    std::fs::copy(
        downloads.join(&file_name),
        site_root.join("data").join(&file_name),
    )
    .unwrap();

    // Next load picks up the edit as its new seed.
    let reloaded = loader.try_load(Domain::Portfolio).await.unwrap();
    assert_eq!(reloaded["projects"][1]["title"], json!("New"));
    let reseeded = ContentStore::seed(Domain::Portfolio, reloaded);
    assert!(!reseeded.is_dirty(), "the redeployed content is the new baseline");
}

#[test(tokio::test)]
async fn test_unlocked_flag_survives_a_reload_within_the_session() {
    common::init_logging();
    let temp_dir = tempdir().unwrap();
    let session_file = temp_dir.path().join("session");

    let mut first = admin_for(session_file.clone());
    first.on_key(true, true, 'e');
    first.submit(PASSWORD).await.unwrap();
    assert!(first.is_unlocked());

    // A new session object over the same store resumes unlocked, the way a
    // page refresh inside one browser session does.
    let second = admin_for(session_file.clone());
    assert!(second.is_unlocked());

    // Logout ends it for both worlds.
    let mut second = second;
    second.logout();
    let third = admin_for(session_file);
    assert!(!third.is_unlocked());
}

#[test(tokio::test)]
async fn test_working_cache_survives_a_refresh_but_not_a_fresh_seed() {
    common::init_logging();
    let temp_dir = tempdir().unwrap();
    let site_root = common::create_site_fixture(&temp_dir);
    let loader = loader_for(site_root);
    let cache = Arc::new(FileWorkingCache::new(temp_dir.path().join("cache")));

    // First editing pass mirrors its mutation into the cache.
    let seed = loader.try_load(Domain::Portfolio).await.unwrap();
    let mut store = ContentStore::seed(Domain::Portfolio, seed.clone()).with_cache(cache.clone());
    store.update_field(&"heading".parse().unwrap(), json!("Mid-edit"));

    // "Refresh": reseed from the network, then explicitly resume the cache.
    let mut refreshed =
        ContentStore::seed(Domain::Portfolio, seed.clone()).with_cache(cache.clone());
    assert_eq!(
        refreshed.working()["heading"],
        json!("Selected Work"),
        "the network seed always wins before an explicit resume"
    );
    assert!(refreshed.resume_cached());
    assert_eq!(refreshed.working()["heading"], json!("Mid-edit"));
    assert!(refreshed.is_dirty());

    // Discarding the cache makes the next refresh a clean start.
    refreshed.discard_cached();
    let mut clean = ContentStore::seed(Domain::Portfolio, seed).with_cache(cache);
    assert!(!clean.resume_cached());
    assert!(!clean.is_dirty());
}
