//! The write path: serialize a working copy and hand it to an export target.
//!
//! There is no network write anywhere in this system. "Saving" means
//! producing a pretty-printed JSON file that a human moves into the site's
//! static data directory and redeploys. [`ExportTarget`] isolates that
//! mechanism so a real persistence backend could be swapped in without
//! touching any store logic.

use serde_json::Value;
use std::{fs, path::PathBuf};

use crate::{document::Domain, error::FolioError};

/// Where an exported document lands. One method, deliberately.
pub trait ExportTarget: Send + Sync {
    fn persist(&self, file_name: &str, text: &str) -> Result<(), FolioError>;
}

/// Writes exports into a download directory, overwriting any previous export
/// of the same domain. Last download wins; there is no conflict detection.
#[derive(Debug, Clone)]
pub struct DownloadDirTarget {
    dir: PathBuf,
}

impl DownloadDirTarget {
    pub fn new(dir: PathBuf) -> DownloadDirTarget {
        DownloadDirTarget { dir }
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }
}

impl ExportTarget for DownloadDirTarget {
    fn persist(&self, file_name: &str, text: &str) -> Result<(), FolioError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file_name);
        tracing::debug!("Writing export to {:?}", path);
        fs::write(path, text)?;
        Ok(())
    }
}

/// Serialize `doc` as indented JSON and persist it under the domain's
/// conventional file name. Returns the file name used.
///
/// Serialization failure surfaces as [`FolioError::Export`] and leaves the
/// caller's working copy untouched; with JSON-safe documents it should not
/// occur, but the bridge is the one place a malformed value would otherwise
/// take the whole save action down.
pub fn export_document(
    doc: &Value,
    domain: Domain,
    target: &dyn ExportTarget,
) -> Result<String, FolioError> {
    let text = serde_json::to_string_pretty(doc)
        .map_err(|err| FolioError::Export(format!("could not serialize {domain}: {err}")))?;
    let file_name = domain.file_name();
    target.persist(&file_name, &format!("{text}\n"))?;
    tracing::debug!("exported {domain} as {file_name}");
    Ok(file_name)
}
