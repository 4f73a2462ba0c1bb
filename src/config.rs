use serde::{Deserialize, Serialize};
use std::{
    env,
    fs::read_to_string,
    path::{Path, PathBuf},
    str::FromStr,
};

use crate::{
    auth::{Chord, Credential, DEFAULT_CHORD},
    error::FolioError,
    paths::PathResolver,
};

/// Environment override for the encoded admin credential.
pub const ADMIN_CREDENTIAL_ENV: &str = "FOLIO_ADMIN_HASH";
/// Environment override for the deployment base prefix.
pub const BASE_PATH_ENV: &str = "FOLIO_BASE_PATH";

/// Fallback credential used when neither the config file nor the environment
/// provides one. A deployment that never sets its own hash ships with this
/// well-known default, which any reader of the deployed bundle can see.
pub const DEFAULT_ADMIN_CREDENTIAL: &str =
    "pbkdf2-sha256$100000$c2l0ZS1kZWZhdWx0LXNhbHQ=$5fYmhnUxV0dBJmkn9qP3X1sCkT8aZ2wLqNvF0RrE7dI=";

/// Site-wide configuration for the content engine.
///
/// Loaded from a TOML file with environment-variable overrides on top;
/// every field has a workable default so a missing config file still yields
/// a functioning (if default-credentialed) engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Deployment base prefix prepended to every asset and content URL.
    pub base_path: String,
    /// Origin the HTTP content source fetches from.
    pub origin: String,
    /// Encoded admin credential (`pbkdf2-sha256$...`).
    pub admin_credential: String,
    /// Keyboard chord toggling the admin prompt.
    pub chord: Chord,
    /// Where exported content files land.
    pub download_dir: PathBuf,
    /// Where working copies are mirrored between mutations.
    pub cache_dir: PathBuf,
    /// Marker file carrying the unlocked-session flag.
    pub session_file: PathBuf,
}

impl Default for SiteConfig {
    fn default() -> SiteConfig {
        SiteConfig {
            base_path: "/".to_string(),
            origin: "http://localhost:8080".to_string(),
            admin_credential: DEFAULT_ADMIN_CREDENTIAL.to_string(),
            chord: DEFAULT_CHORD,
            download_dir: PathBuf::from("downloads"),
            cache_dir: PathBuf::from(".folio/cache"),
            session_file: PathBuf::from(".folio/session"),
        }
    }
}

impl SiteConfig {
    /// Read configuration from a TOML file, then apply environment
    /// overrides. A missing file is not an error; defaults apply.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<SiteConfig, FolioError> {
        tracing::debug!("Attempting to read site config from: {:?}", path.as_ref());
        let mut config = if path.as_ref().exists() {
            toml::from_str(&read_to_string(path)?)?
        } else {
            tracing::debug!("Config file not found, using defaults.");
            SiteConfig::default()
        };
        config.apply_env();
        Ok(config)
    }

    /// Environment overrides: `FOLIO_ADMIN_HASH`, `FOLIO_BASE_PATH`.
    pub fn apply_env(&mut self) {
        if let Ok(credential) = env::var(ADMIN_CREDENTIAL_ENV) {
            if !credential.is_empty() {
                self.admin_credential = credential;
            }
        }
        if let Ok(base) = env::var(BASE_PATH_ENV) {
            if !base.is_empty() {
                self.base_path = base;
            }
        }
    }

    pub fn resolver(&self) -> PathResolver {
        PathResolver::new(self.base_path.clone())
    }

    /// Parse the configured credential. A malformed value falls back to the
    /// shipped default with a warning; a malformed hash must never take the
    /// prompt down.
    pub fn credential(&self) -> Result<Credential, FolioError> {
        match Credential::from_str(&self.admin_credential) {
            Ok(credential) => Ok(credential),
            Err(err) => {
                tracing::warn!("configured admin credential is malformed ({err}); using default");
                Credential::from_str(DEFAULT_ADMIN_CREDENTIAL)
            }
        }
    }
}
