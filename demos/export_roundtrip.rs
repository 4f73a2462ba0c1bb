//! Export round-trip example for folio-core
//!
//! Shows that exporting a working copy and re-parsing the downloaded file
//! yields the same document: the manual "download, commit, redeploy"
//! persistence loop preserves content exactly.
//!
//! Run with: cargo run --example export_roundtrip

use folio_core::{
    document::Domain,
    export::{export_document, DownloadDirTarget},
    store::ContentStore,
    FolioError,
};
use serde_json::json;
use tempfile::TempDir;

fn main() -> Result<(), FolioError> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let mut store = ContentStore::seed(
        Domain::Blog,
        json!({ "posts": [ { "title": "Hello", "summary": "First post" } ] }),
    );
    store.update_item_field(&"posts".parse()?, 0, "summary", json!("Edited post"));

    let target = DownloadDirTarget::new(temp_dir.path().to_path_buf());
    let file_name = export_document(store.working(), Domain::Blog, &target)?;

    let text = std::fs::read_to_string(temp_dir.path().join(&file_name))?;
    let reparsed: serde_json::Value = serde_json::from_str(&text)?;
    assert_eq!(&reparsed, store.working());
    println!("round-trip OK: {file_name} matches the working copy");

    Ok(())
}
