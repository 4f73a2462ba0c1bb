use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::tempdir;
use test_log::test;

use folio_core::{
    document::Domain,
    loader::{ContentLoader, FileContentSource},
    paths::PathResolver,
};

mod common;

const BASE: &str = "/MadhuPortfolio/";

fn fixture_loader(site_root: std::path::PathBuf) -> ContentLoader {
    ContentLoader::new(
        Arc::new(FileContentSource::new(site_root, BASE)),
        PathResolver::new(BASE),
    )
}

#[test(tokio::test)]
async fn test_load_resolves_asset_paths() {
    let temp_dir = tempdir().unwrap();
    let loader = fixture_loader(common::create_site_fixture(&temp_dir));

    let portfolio = loader.try_load(Domain::Portfolio).await.unwrap();
    assert_eq!(
        portfolio["projects"][0]["image"],
        json!("/MadhuPortfolio/images/x.png"),
        "relative asset paths must be rewritten against the deployment base"
    );

    let home = loader.try_load(Domain::Home).await.unwrap();
    assert_eq!(home["profileImage"], json!("/MadhuPortfolio/images/profile.jpg"));
    assert_eq!(
        home["banner"]["banners"][0]["image"],
        json!("/MadhuPortfolio/images/banner1.jpg")
    );
}

#[test(tokio::test)]
async fn test_missing_content_substitutes_empty_object() {
    let temp_dir = tempdir().unwrap();
    let loader = fixture_loader(common::create_site_fixture(&temp_dir));

    // No blog_content.json in the fixture.
    assert!(loader.try_load(Domain::Blog).await.is_err());
    let blog = loader.load_page_content(Domain::Blog).await;
    assert_eq!(blog, json!({}), "missing content degrades to empty");
}

#[test(tokio::test)]
async fn test_malformed_content_substitutes_empty_object() {
    let temp_dir = tempdir().unwrap();
    let loader = fixture_loader(common::create_site_fixture(&temp_dir));

    assert!(loader.try_load(Domain::Contact).await.is_err());
    let contact = loader.load_page_content(Domain::Contact).await;
    assert_eq!(contact, json!({}), "unparseable content degrades to empty");
}

#[test(tokio::test)]
async fn test_load_all_page_contents_fails_independently() {
    let temp_dir = tempdir().unwrap();
    let loader = fixture_loader(common::create_site_fixture(&temp_dir));

    let contents = loader.load_all_page_contents().await;
    assert_eq!(contents.len(), Domain::PAGES.len());

    // Broken domains come back empty...
    assert_eq!(contents[&Domain::Blog], json!({}));
    assert_eq!(contents[&Domain::Contact], json!({}));

    // ...without affecting healthy ones.
    assert_eq!(contents[&Domain::Portfolio]["heading"], json!("Selected Work"));
    assert_eq!(contents[&Domain::About]["bio"], json!("About me"));
    assert_eq!(
        contents[&Domain::Footer]["links"][0]["url"],
        json!("https://github.com/example"),
        "absolute URLs survive the path rewrite"
    );
}

#[test(tokio::test)]
async fn test_load_global_settings() {
    let temp_dir = tempdir().unwrap();
    let loader = fixture_loader(common::create_site_fixture(&temp_dir));

    let settings = loader.load_global_settings().await;
    assert_eq!(settings["siteTitle"], json!("Folio"));
    assert_eq!(
        settings["logo"],
        json!("/MadhuPortfolio/images/logo.png"),
        "global settings get the same path treatment as page content"
    );
}

#[test(tokio::test)]
async fn test_loader_output_is_plain_json() {
    let temp_dir = tempdir().unwrap();
    let loader = fixture_loader(common::create_site_fixture(&temp_dir));

    let portfolio = loader.try_load(Domain::Portfolio).await.unwrap();
    assert!(matches!(portfolio, Value::Object(_)));
}
