//! Editable content stores: one mutable working copy per content domain.
//!
//! A [`ContentStore`] is seeded once from the loader's output and mutated
//! through structured operations. The seed is never touched again; it is the
//! dirty-check baseline and the reset target. Every mutation may mirror the
//! working copy into a [`WorkingCache`] so an accidental reload inside the
//! same editing session can resume, but a fresh seed from the network always
//! wins. The cache is best-effort, never authoritative.
//!
//! List items have positional identity only: removing or reordering an item
//! shifts the identity of everything after it. All item operations go through
//! this module's API so a keyed identity scheme could replace the positions
//! without touching callers.

use parking_lot::Mutex;
use serde_json::Value;
use std::{collections::BTreeMap, fs, path::PathBuf, sync::Arc};

use crate::{
    auth::AdminSession,
    document::{self, Domain, FieldPath, PathSeg},
    error::FolioError,
    export::{export_document, ExportTarget},
};

/// Best-effort persistence for in-flight working copies, keyed by domain.
pub trait WorkingCache: Send + Sync {
    fn load(&self, domain: Domain) -> Result<Option<Value>, FolioError>;
    fn store(&self, domain: Domain, doc: &Value) -> Result<(), FolioError>;
    fn clear(&self, domain: Domain) -> Result<(), FolioError>;
}

/// In-memory cache, mainly for embedders that keep their own persistence and
/// for tests.
#[derive(Debug, Default)]
pub struct MemoryWorkingCache {
    entries: Mutex<BTreeMap<Domain, Value>>,
}

impl WorkingCache for MemoryWorkingCache {
    fn load(&self, domain: Domain) -> Result<Option<Value>, FolioError> {
        Ok(self.entries.lock().get(&domain).cloned())
    }

    fn store(&self, domain: Domain, doc: &Value) -> Result<(), FolioError> {
        self.entries.lock().insert(domain, doc.clone());
        Ok(())
    }

    fn clear(&self, domain: Domain) -> Result<(), FolioError> {
        self.entries.lock().remove(&domain);
        Ok(())
    }
}

/// File-backed cache writing `<dir>/<domain>_working.json` per domain.
#[derive(Debug, Clone)]
pub struct FileWorkingCache {
    dir: PathBuf,
}

impl FileWorkingCache {
    pub fn new(dir: PathBuf) -> FileWorkingCache {
        FileWorkingCache { dir }
    }

    fn entry_path(&self, domain: Domain) -> PathBuf {
        self.dir.join(format!("{domain}_working.json"))
    }
}

impl WorkingCache for FileWorkingCache {
    fn load(&self, domain: Domain) -> Result<Option<Value>, FolioError> {
        let path = self.entry_path(domain);
        if !path.exists() {
            return Ok(None);
        }
        tracing::debug!("Reading cached working copy from {:?}", path);
        let text = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&text)?))
    }

    fn store(&self, domain: Domain, doc: &Value) -> Result<(), FolioError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.entry_path(domain);
        tracing::debug!("Mirroring working copy to {:?}", path);
        fs::write(path, serde_json::to_string(doc)?)?;
        Ok(())
    }

    fn clear(&self, domain: Domain) -> Result<(), FolioError> {
        let path = self.entry_path(domain);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// Mutable working copy of one domain's content document.
#[derive(Clone)]
pub struct ContentStore {
    domain: Domain,
    seed: Value,
    working: Value,
    cache: Option<Arc<dyn WorkingCache>>,
}

impl ContentStore {
    /// Seed a store from a freshly loaded document. The seed is cloned into
    /// the working copy; the two never alias.
    pub fn seed(domain: Domain, doc: Value) -> ContentStore {
        ContentStore {
            domain,
            working: doc.clone(),
            seed: doc,
            cache: None,
        }
    }

    pub fn with_cache(mut self, cache: Arc<dyn WorkingCache>) -> ContentStore {
        self.cache = Some(cache);
        self
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// The originally loaded document, untouched by any mutation.
    pub fn seed_value(&self) -> &Value {
        &self.seed
    }

    pub fn working(&self) -> &Value {
        &self.working
    }

    /// Independent copy of the current working document.
    pub fn snapshot(&self) -> Value {
        self.working.clone()
    }

    /// True whenever the working copy differs from the seed, by deep
    /// equality. Derived on demand, never cached.
    pub fn is_dirty(&self) -> bool {
        self.working != self.seed
    }

    /// Replace the value at a field path. Missing intermediates make this a
    /// silent no-op; the return value reports whether the write applied.
    pub fn update_field(&mut self, path: &FieldPath, value: Value) -> bool {
        let applied = document::set_path(&mut self.working, path, value);
        if applied {
            self.mirror();
        }
        applied
    }

    /// Append a record to the list at `list_path`, creating the list (and any
    /// missing intermediate objects) when the document doesn't carry it yet.
    pub fn append_item(&mut self, list_path: &FieldPath, record: Value) -> bool {
        if !document::ensure_list(&mut self.working, list_path) {
            tracing::debug!("append_item: '{list_path}' is not a list, skipping");
            return false;
        }
        match document::get_path_mut(&mut self.working, list_path).and_then(Value::as_array_mut) {
            Some(items) => {
                items.push(record);
                self.mirror();
                true
            }
            None => false,
        }
    }

    /// Append the domain's default record for `list_path`'s final segment.
    pub fn append_default_item(&mut self, list_path: &FieldPath) -> bool {
        let list_name = match list_path.segments().last() {
            Some(PathSeg::Key(name)) => name.clone(),
            _ => String::new(),
        };
        let record = self.domain.default_list_item(&list_name);
        self.append_item(list_path, record)
    }

    /// Remove the record at `index`. Out-of-range indices leave the list
    /// unchanged: same length, same elements, same order.
    pub fn remove_item(&mut self, list_path: &FieldPath, index: usize) -> bool {
        let items = match document::get_path_mut(&mut self.working, list_path)
            .and_then(Value::as_array_mut)
        {
            Some(items) => items,
            None => return false,
        };
        if index >= items.len() {
            tracing::debug!(
                "remove_item: index {index} out of range for '{list_path}' (len {}), skipping",
                items.len()
            );
            return false;
        }
        items.remove(index);
        self.mirror();
        true
    }

    /// Update one field of one record, addressed by position.
    pub fn update_item_field(
        &mut self,
        list_path: &FieldPath,
        index: usize,
        field: &str,
        value: Value,
    ) -> bool {
        let path = list_path.child(index).child(field);
        self.update_field(&path, value)
    }

    /// Discard every working-copy mutation, restoring the seed.
    pub fn reset(&mut self) {
        self.working = self.seed.clone();
        self.mirror();
    }

    /// Re-adopt a cached working copy from an interrupted editing session.
    /// Returns whether anything was restored. Never called implicitly: a
    /// fresh seed always wins until the embedder asks to resume.
    pub fn resume_cached(&mut self) -> bool {
        let cache = match &self.cache {
            Some(cache) => cache,
            None => return false,
        };
        match cache.load(self.domain) {
            Ok(Some(doc)) => {
                tracing::debug!("resumed cached working copy for {}", self.domain);
                self.working = doc;
                true
            }
            Ok(None) => false,
            Err(err) => {
                tracing::warn!("working cache unreadable for {}: {err}", self.domain);
                false
            }
        }
    }

    /// Drop this domain's cached working copy, if any.
    pub fn discard_cached(&mut self) {
        if let Some(cache) = &self.cache {
            if let Err(err) = cache.clear(self.domain) {
                tracing::warn!("could not clear working cache for {}: {err}", self.domain);
            }
        }
    }

    fn mirror(&self) {
        if let Some(cache) = &self.cache {
            if let Err(err) = cache.store(self.domain, &self.working) {
                tracing::warn!("could not mirror working copy for {}: {err}", self.domain);
            }
        }
    }
}

impl std::fmt::Debug for ContentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("ContentStore")
            .field("domain", &self.domain)
            .field("dirty", &self.is_dirty())
            .field("cached", &self.cache.is_some())
            .finish()
    }
}

/// One editing session over every content domain, gated by the admin state
/// machine. Mutation and export calls are refused while the session is not
/// `Unlocked`; reads are always allowed.
pub struct EditorSession {
    admin: AdminSession,
    stores: BTreeMap<Domain, ContentStore>,
}

impl EditorSession {
    pub fn new(admin: AdminSession) -> EditorSession {
        EditorSession {
            admin,
            stores: BTreeMap::new(),
        }
    }

    pub fn admin(&self) -> &AdminSession {
        &self.admin
    }

    pub fn admin_mut(&mut self) -> &mut AdminSession {
        &mut self.admin
    }

    /// Seed (or reseed) a domain's store. A reseed replaces both seed and
    /// working copy, so loader output wins over whatever was in flight.
    pub fn seed_domain(&mut self, store: ContentStore) {
        self.stores.insert(store.domain(), store);
    }

    pub fn store(&self, domain: Domain) -> Option<&ContentStore> {
        self.stores.get(&domain)
    }

    /// Mutable access to a domain's store, only while unlocked.
    pub fn store_mut(&mut self, domain: Domain) -> Result<&mut ContentStore, FolioError> {
        if !self.admin.is_unlocked() {
            return Err(FolioError::PermissionDenied);
        }
        self.stores
            .get_mut(&domain)
            .ok_or_else(|| FolioError::NotFound(format!("no content loaded for '{domain}'")))
    }

    /// Export a domain's current working copy through `target`. The working
    /// copy is left untouched either way.
    pub fn export(
        &self,
        domain: Domain,
        target: &dyn ExportTarget,
    ) -> Result<String, FolioError> {
        if !self.admin.is_unlocked() {
            return Err(FolioError::PermissionDenied);
        }
        let store = self
            .stores
            .get(&domain)
            .ok_or_else(|| FolioError::NotFound(format!("no content loaded for '{domain}'")))?;
        export_document(store.working(), domain, target)
    }

    /// Domains whose working copy currently differs from its seed.
    pub fn dirty_domains(&self) -> Vec<Domain> {
        self.stores
            .values()
            .filter(|s| s.is_dirty())
            .map(|s| s.domain())
            .collect()
    }
}

