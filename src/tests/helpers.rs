//! Shared test utilities for content-store and session testing

use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{
    auth::{AdminSession, Credential, MemorySessionStore, SessionStore, DEFAULT_CHORD},
    document::Domain,
    error::FolioError,
    export::ExportTarget,
    store::ContentStore,
};

/// Initialize logging for tests
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

/// A portfolio document with one project, matching the conventional shape.
pub fn portfolio_doc() -> Value {
    json!({
        "heading": "Selected Work",
        "projects": [
            {
                "title": "X",
                "description": "First project",
                "image": "images/x.png",
                "technologies": ["rust"]
            }
        ]
    })
}

/// A home document with a banner carousel and a profile image.
pub fn home_doc() -> Value {
    json!({
        "profileImage": "/images/profile.jpg",
        "banner": {
            "banners": [
                { "title": "Hello", "image": "images/banner1.jpg" },
                { "title": "Welcome", "image": "https://cdn.example.com/banner2.jpg" }
            ]
        },
        "intro": { "headline": "Hi, I build things" }
    })
}

pub fn seeded_portfolio_store() -> ContentStore {
    init_logging();
    ContentStore::seed(Domain::Portfolio, portfolio_doc())
}

/// Fast credential for tests; production iteration counts would dominate the
/// suite's runtime.
pub fn test_credential(password: &str) -> Credential {
    Credential::generate_with_iterations(password, 10).unwrap()
}

pub fn test_session(password: &str) -> AdminSession {
    test_session_with_store(password, Arc::new(MemorySessionStore::default()))
}

pub fn test_session_with_store(password: &str, store: Arc<dyn SessionStore>) -> AdminSession {
    init_logging();
    AdminSession::new(DEFAULT_CHORD, Arc::new(test_credential(password)), store)
}

/// Export target that captures persisted text in memory.
#[derive(Default)]
pub struct CaptureTarget {
    pub persisted: Mutex<Vec<(String, String)>>,
}

impl ExportTarget for CaptureTarget {
    fn persist(&self, file_name: &str, text: &str) -> Result<(), FolioError> {
        self.persisted
            .lock()
            .push((file_name.to_string(), text.to_string()));
        Ok(())
    }
}

/// Verifier that always fails internally, for the error-path tests.
pub struct BrokenVerifier;

impl crate::auth::CredentialVerifier for BrokenVerifier {
    fn verify(&self, _candidate: &str) -> Result<bool, FolioError> {
        Err(FolioError::Credential("stored hash is malformed".to_string()))
    }
}
