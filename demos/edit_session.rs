//! Editing session example for folio-core
//!
//! This example demonstrates:
//! - Seeding an editor session from a local site tree
//! - Unlocking the admin session with the chord + password
//! - Applying structured edit operations
//! - Exporting the edited document
//!
//! Run with: cargo run --example edit_session

use folio_core::{
    auth::{AdminSession, Credential, MemorySessionStore, DEFAULT_CHORD},
    commands::EditOp,
    document::{Domain, FieldPath},
    export::DownloadDirTarget,
    loader::{ContentLoader, FileContentSource},
    paths::PathResolver,
    store::{ContentStore, EditorSession},
    FolioError,
};
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), FolioError> {
    // Set up logging to see what's happening
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    println!("=== folio-core Editing Session Example ===\n");

    // Create a throwaway site tree to edit
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let site_root = temp_dir.path().join("site");
    create_example_site(&site_root)?;

    // 1. Load the site's content
    println!("1. Loading content from {site_root:?}...");
    let base = "/MadhuPortfolio/";
    let loader = ContentLoader::new(
        Arc::new(FileContentSource::new(site_root, base)),
        PathResolver::new(base),
    );

    let password = "demo-password";
    let admin = AdminSession::new(
        DEFAULT_CHORD,
        Arc::new(Credential::generate(password)?),
        Arc::new(MemorySessionStore::default()),
    );
    let mut session = EditorSession::new(admin);
    for (domain, doc) in loader.load_all_page_contents().await {
        session.seed_domain(ContentStore::seed(domain, doc));
    }
    println!("   ✓ Seeded {} domains\n", Domain::PAGES.len());

    // 2. Unlock the editor
    println!("2. Unlocking (chord + password)...");
    session.admin_mut().on_key(true, true, 'e');
    session.admin_mut().submit(password).await?;
    println!("   ✓ Session state: {}\n", session.admin().state());

    // 3. Edit the portfolio
    println!("3. Appending a project and renaming it...");
    let projects: FieldPath = "projects".parse()?;
    let store = session.store_mut(Domain::Portfolio)?;
    store.apply(EditOp::AppendDefaultItem(projects.clone()));
    store.apply(EditOp::SetItemField(
        projects,
        1,
        "title".to_string(),
        json!("Shiny New Thing"),
    ));
    println!("   ✓ Dirty domains: {:?}\n", session.dirty_domains());

    // 4. Export the working copy. The whole write path is a file download
    println!("4. Exporting...");
    let downloads = temp_dir.path().join("downloads");
    let file_name = session.export(Domain::Portfolio, &DownloadDirTarget::new(downloads.clone()))?;
    println!(
        "   ✓ Wrote {:?}; commit it to the site repo and redeploy\n",
        downloads.join(file_name)
    );

    Ok(())
}

fn create_example_site(site_root: &std::path::Path) -> Result<(), FolioError> {
    let data_dir = site_root.join("data");
    std::fs::create_dir_all(&data_dir)?;
    let portfolio = serde_json::to_string_pretty(&json!({
        "heading": "Selected Work",
        "projects": [
            { "title": "First Project", "image": "images/first.png" }
        ]
    }))?;
    std::fs::write(data_dir.join("portfolio_content.json"), portfolio)?;
    Ok(())
}
