//! Shared test utilities for integration tests.
//!
//! Import from integration test files as:
//! ```ignore
//! mod common;
//! ```

use std::path::PathBuf;
use tempfile::TempDir;

/// Initialize tracing for tests, respecting RUST_LOG env var.
///
/// Safe to call multiple times; subsequent calls are no-ops.
#[allow(dead_code)]
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

/// Lay out a local copy of a deployed site's data directory.
///
/// Returns the site root (e.g. `<temp_dir>/site/`). The data files follow the
/// conventional per-domain shapes: a portfolio with one project, a home page
/// with a banner carousel, and a global settings document with a logo path.
/// Blog content is intentionally absent and contact content is intentionally
/// malformed, for the degradation tests.
#[allow(dead_code)]
pub fn create_site_fixture(temp_dir: &TempDir) -> PathBuf {
    let site_root = temp_dir.path().join("site");
    let data_dir = site_root.join("data");
    std::fs::create_dir_all(&data_dir).unwrap();

    let portfolio = r#"{
  "heading": "Selected Work",
  "projects": [
    {
      "title": "X",
      "description": "First project",
      "image": "images/x.png",
      "technologies": ["rust"]
    }
  ]
}
"#;
    std::fs::write(data_dir.join("portfolio_content.json"), portfolio).unwrap();

    let home = r#"{
  "profileImage": "/images/profile.jpg",
  "banner": {
    "banners": [
      { "title": "Hello", "image": "images/banner1.jpg" }
    ]
  }
}
"#;
    std::fs::write(data_dir.join("home_content.json"), home).unwrap();

    let about = r#"{ "bio": "About me", "workExperience": [] }
"#;
    std::fs::write(data_dir.join("about_content.json"), about).unwrap();

    let footer = r#"{ "links": [ { "label": "GitHub", "url": "https://github.com/example" } ] }
"#;
    std::fs::write(data_dir.join("footer_content.json"), footer).unwrap();

    let settings = r#"{ "siteTitle": "Folio", "logo": "images/logo.png" }
"#;
    std::fs::write(data_dir.join("global_settings.json"), settings).unwrap();

    // Deliberately malformed: the loader must degrade, not crash.
    std::fs::write(data_dir.join("contact_content.json"), "{ not json").unwrap();

    site_root
}
