//! Content loading: fetch a domain's JSON document, parse it, and rewrite
//! its asset paths against the deployment base.
//!
//! ## Failure policy
//!
//! The convenience loaders never fail. A fetch or parse error for a domain is
//! caught, logged, and replaced with an empty object; the page degrades to
//! missing sections and placeholder text instead of crashing. Callers that
//! want the error use the `try_*` variants.
//!
//! All page domains load concurrently and settle independently; one slow or
//! broken domain neither delays nor corrupts another's result.
//!
//! ## Sources
//!
//! [`ContentSource`] abstracts the byte transport. [`FileContentSource`]
//! reads from a local site tree (dev builds, tests, the CLI);
//! [`HttpContentSource`] (feature `http`) fetches from a deployed site.

use async_trait::async_trait;
use futures::future::join_all;
use serde_json::{Map, Value};
use std::{collections::BTreeMap, path::PathBuf, sync::Arc};

use crate::{
    document::Domain,
    error::FolioError,
    paths::{PathResolver, PATH_FIELDS},
};

#[cfg(feature = "http")]
use url::Url;

/// Byte transport for content documents. `path` is site-absolute, already
/// carrying the deployment base prefix.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch(&self, path: &str) -> Result<String, FolioError>;
}

/// Reads content from a local copy of the deployed site tree.
#[derive(Debug, Clone)]
pub struct FileContentSource {
    root: PathBuf,
    base: String,
}

impl FileContentSource {
    /// `root` is the directory serving as the site root; `base` is the
    /// deployment base prefix to strip from incoming site-absolute paths.
    pub fn new<S: Into<String>>(root: PathBuf, base: S) -> FileContentSource {
        FileContentSource {
            root,
            base: base.into(),
        }
    }
}

#[async_trait]
impl ContentSource for FileContentSource {
    async fn fetch(&self, path: &str) -> Result<String, FolioError> {
        let base = self.base.trim_end_matches('/');
        let rel = path
            .strip_prefix(base)
            .unwrap_or(path)
            .trim_start_matches('/');
        let full = self.root.join(rel);
        tracing::debug!("Reading {:?}", full);
        Ok(tokio::fs::read_to_string(full).await?)
    }
}

/// Fetches content over HTTP(S) from the deployed site's origin.
#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct HttpContentSource {
    client: reqwest::Client,
    origin: Url,
}

#[cfg(feature = "http")]
impl HttpContentSource {
    pub fn new(origin: Url) -> HttpContentSource {
        HttpContentSource {
            client: reqwest::Client::new(),
            origin,
        }
    }
}

#[cfg(feature = "http")]
#[async_trait]
impl ContentSource for HttpContentSource {
    async fn fetch(&self, path: &str) -> Result<String, FolioError> {
        let url = self.origin.join(path.trim_start_matches('/'))?;
        tracing::debug!("GET {url}");
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FolioError::Service(format!(
                "content fetch for {url} returned {status}"
            )));
        }
        Ok(response.text().await?)
    }
}

/// Loads and path-resolves content documents for every domain.
#[derive(Clone)]
pub struct ContentLoader {
    source: Arc<dyn ContentSource>,
    resolver: PathResolver,
}

impl ContentLoader {
    pub fn new(source: Arc<dyn ContentSource>, resolver: PathResolver) -> ContentLoader {
        ContentLoader { source, resolver }
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    /// Fetch, parse and path-resolve one domain's document, propagating
    /// failures to the caller.
    pub async fn try_load(&self, domain: Domain) -> Result<Value, FolioError> {
        let path = self.resolver.resolve(&domain.content_path());
        let body = self.source.fetch(&path).await?;
        let mut doc: Value = serde_json::from_str(&body)?;
        self.resolver.resolve_tree(&mut doc, PATH_FIELDS);
        Ok(doc)
    }

    /// Load one page domain, substituting an empty object on any failure.
    pub async fn load_page_content(&self, domain: Domain) -> Value {
        match self.try_load(domain).await {
            Ok(doc) => doc,
            Err(err) => {
                tracing::warn!("could not load {domain} content, substituting empty: {err}");
                Value::Object(Map::new())
            }
        }
    }

    /// Load the global settings document, substituting an empty object on
    /// any failure.
    pub async fn load_global_settings(&self) -> Value {
        self.load_page_content(Domain::GlobalSettings).await
    }

    /// Load every page domain concurrently. Each domain settles on its own;
    /// a failing fetch yields that domain's empty-object substitute without
    /// blocking the rest.
    pub async fn load_all_page_contents(&self) -> BTreeMap<Domain, Value> {
        let results = join_all(Domain::PAGES.iter().map(|d| self.load_page_content(*d))).await;
        Domain::PAGES.iter().copied().zip(results).collect()
    }
}

impl std::fmt::Debug for ContentLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("ContentLoader")
            .field("base", &self.resolver.base())
            .finish()
    }
}
