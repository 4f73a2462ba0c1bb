//! # folio-core
//!
//! A headless content engine for a statically-deployed portfolio site: JSON content loading,
//! credential-gated structured editing, and export-based persistence.
//!
//! ## Overview
//!
//! folio-core is the machinery behind an in-browser content editor for a site with **no server-side
//! persistence**. Content lives in static JSON files served next to the site; editing happens
//! against an in-memory working copy; "saving" produces a pretty-printed JSON file that a human
//! commits back to the site's source tree and redeploys. The loop is manual and human-closed by
//! design:
//!
//! ```text
//! ContentLoader ──seed──▶ ContentStore ──edits──▶ export_document ──▶ downloaded file
//!        ▲                                                                 │
//!        └───────────── (manual commit + redeploy) ◀──────────────────────┘
//! ```
//!
//! ### Key Features
//!
//! - **Structured editing**: field-path mutations (set field, append/remove/update list items)
//!   over schemaless JSON documents, with deep-equality dirty tracking and one-call reset
//! - **Admin gating**: a three-state session machine (chord toggle, password prompt, unlocked
//!   editor) backed by a salted, timing-safe credential check
//! - **Deployment-base path resolution**: every content-relative asset path is rewritten against
//!   the configured base prefix at load time
//! - **Graceful degradation**: a failing fetch or parse never crashes a page; the domain loads as
//!   an empty document and the presentation layer shows its defaults
//! - **Swappable seams**: content transport, session persistence, working-copy cache, credential
//!   verification and export destination are all traits
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use folio_core::{
//!     auth::{AdminSession, Credential, MemorySessionStore, DEFAULT_CHORD},
//!     document::{Domain, FieldPath},
//!     export::DownloadDirTarget,
//!     loader::{ContentLoader, FileContentSource},
//!     paths::PathResolver,
//!     store::{ContentStore, EditorSession},
//! };
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), folio_core::FolioError> {
//!     let resolver = PathResolver::new("/MadhuPortfolio/");
//!     let source = Arc::new(FileContentSource::new("./site".into(), "/MadhuPortfolio/"));
//!     let loader = ContentLoader::new(source, resolver);
//!
//!     // Seed an editing session from the loaded documents.
//!     let admin = AdminSession::new(
//!         DEFAULT_CHORD,
//!         Arc::new("pbkdf2-sha256$100000$...$...".parse::<Credential>()?),
//!         Arc::new(MemorySessionStore::default()),
//!     );
//!     let mut session = EditorSession::new(admin);
//!     for (domain, doc) in loader.load_all_page_contents().await {
//!         session.seed_domain(ContentStore::seed(domain, doc));
//!     }
//!
//!     // Unlock (chord + password) before editing.
//!     session.admin_mut().on_key(true, true, 'e');
//!     session.admin_mut().submit("the password").await?;
//!
//!     let store = session.store_mut(Domain::Portfolio)?;
//!     store.append_default_item(&"projects".parse::<FieldPath>()?);
//!
//!     // The entire write path: a file download the operator redeploys.
//!     session.export(Domain::Portfolio, &DownloadDirTarget::new("downloads".into()))?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **[`paths`]**: deployment-base path resolution ([`paths::PathResolver`]), applied to single
//!   paths and recursively over whole documents
//! - **[`loader`]**: content fetch + parse + path rewrite ([`loader::ContentLoader`]), with
//!   filesystem and (feature `http`) HTTP sources
//! - **[`document`]**: content domains, field paths and JSON tree helpers
//! - **[`store`]**: per-domain editable working copies ([`store::ContentStore`]), the working-copy
//!   cache, and the [`store::EditorSession`] façade
//! - **[`commands`]**: the serializable [`commands::EditOp`] mutation interface
//! - **[`auth`]**: the admin session state machine and credential verification
//! - **[`export`]**: the download-file write path
//! - **[`config`]**: TOML + environment site configuration
//!
//! ## What this is not
//!
//! Not a CMS, not multi-user, and not a security boundary: the credential hash ships inside the
//! deployed bundle and the comparison runs on the client. Two concurrent editing sessions get no
//! conflict detection; the last exported file wins.

pub mod auth;
pub mod commands;
pub mod config;
pub mod document;
pub mod error;
pub mod export;
pub mod loader;
pub mod paths;
pub mod store;
#[cfg(test)]
mod tests;

pub use error::*;
