//! Content documents, the domains that own them, and field-path addressing.
//!
//! A content document is an arbitrary JSON tree ([`serde_json::Value`]); no
//! schema is enforced beyond being valid JSON. Missing fields are the
//! presentation layer's problem, not ours. Every mutation addresses a
//! location in the tree through a [`FieldPath`], a dotted path whose numeric
//! segments index into arrays (`banner.banners.0.title`).

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use crate::error::FolioError;

/// One named content area, each backed by one JSON document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Domain {
    Home,
    About,
    Portfolio,
    Blog,
    Contact,
    Footer,
    GlobalSettings,
}

impl Domain {
    pub const ALL: [Domain; 7] = [
        Domain::Home,
        Domain::About,
        Domain::Portfolio,
        Domain::Blog,
        Domain::Contact,
        Domain::Footer,
        Domain::GlobalSettings,
    ];

    /// Page domains, i.e. everything except the global settings document.
    pub const PAGES: [Domain; 6] = [
        Domain::Home,
        Domain::About,
        Domain::Portfolio,
        Domain::Blog,
        Domain::Contact,
        Domain::Footer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Home => "home",
            Domain::About => "about",
            Domain::Portfolio => "portfolio",
            Domain::Blog => "blog",
            Domain::Contact => "contact",
            Domain::Footer => "footer",
            Domain::GlobalSettings => "global_settings",
        }
    }

    /// Name of the JSON file backing this domain, both on the deployed site
    /// and in the export download.
    pub fn file_name(&self) -> String {
        match self {
            Domain::GlobalSettings => "global_settings.json".to_string(),
            _ => format!("{}_content.json", self.as_str()),
        }
    }

    /// Site-relative fetch path for this domain's document.
    pub fn content_path(&self) -> String {
        format!("data/{}", self.file_name())
    }

    /// Default record appended when the editor adds a new item to `list`.
    ///
    /// The shapes follow the conventional per-domain schemas; unknown lists
    /// get an empty object so the append still succeeds.
    pub fn default_list_item(&self, list: &str) -> Value {
        match (self, list) {
            (Domain::Portfolio, "projects") => json!({
                "title": "New Project",
                "description": "",
                "image": "",
                "technologies": [],
                "liveUrl": "",
                "sourceUrl": ""
            }),
            (Domain::Blog, "posts") => json!({
                "title": "New Post",
                "summary": "",
                "date": "",
                "image": "",
                "link": ""
            }),
            (Domain::About, "workExperience") => json!({
                "company": "",
                "role": "",
                "period": "",
                "description": ""
            }),
            (Domain::About, "skills") => json!({
                "name": "",
                "level": ""
            }),
            (Domain::Home, "banners") => json!({
                "title": "",
                "subtitle": "",
                "image": ""
            }),
            (Domain::Footer, "links") | (Domain::GlobalSettings, "navLinks") => json!({
                "label": "",
                "url": ""
            }),
            (Domain::Contact, "channels") => json!({
                "label": "",
                "value": "",
                "icon": ""
            }),
            _ => Value::Object(Map::new()),
        }
    }
}

impl Display for Domain {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Domain {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "home" => Ok(Domain::Home),
            "about" => Ok(Domain::About),
            "portfolio" => Ok(Domain::Portfolio),
            "blog" => Ok(Domain::Blog),
            "contact" => Ok(Domain::Contact),
            "footer" => Ok(Domain::Footer),
            "global_settings" | "global" | "settings" => Ok(Domain::GlobalSettings),
            other => Err(FolioError::NotFound(format!("unknown domain '{other}'"))),
        }
    }
}

/// One step into a JSON tree: an object key or an array index.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PathSeg {
    Key(String),
    Index(usize),
}

impl Display for PathSeg {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            PathSeg::Key(k) => write!(f, "{k}"),
            PathSeg::Index(i) => write!(f, "{i}"),
        }
    }
}

/// Dotted field path addressing a location in a content document.
///
/// Purely-numeric segments index into arrays; everything else is an object
/// key. The empty path addresses the document root.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FieldPath(Vec<PathSeg>);

impl FieldPath {
    pub fn root() -> FieldPath {
        FieldPath(Vec::new())
    }

    pub fn from_segments<I, S>(segments: I) -> FieldPath
    where
        I: IntoIterator<Item = S>,
        S: Into<PathSeg>,
    {
        FieldPath(segments.into_iter().map(Into::into).collect())
    }

    pub fn segments(&self) -> &[PathSeg] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Child path formed by appending one segment.
    pub fn child<S: Into<PathSeg>>(&self, seg: S) -> FieldPath {
        let mut segments = self.0.clone();
        segments.push(seg.into());
        FieldPath(segments)
    }
}

impl From<&str> for PathSeg {
    fn from(s: &str) -> PathSeg {
        match s.parse::<usize>() {
            Ok(idx) => PathSeg::Index(idx),
            Err(_) => PathSeg::Key(s.to_string()),
        }
    }
}

impl From<String> for PathSeg {
    fn from(s: String) -> PathSeg {
        PathSeg::from(s.as_str())
    }
}

impl From<usize> for PathSeg {
    fn from(idx: usize) -> PathSeg {
        PathSeg::Index(idx)
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|seg| seg.to_string())
            .collect::<Vec<String>>()
            .join(".");
        write!(f, "{joined}")
    }
}

impl FromStr for FieldPath {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(FieldPath::root());
        }
        if trimmed.split('.').any(|seg| seg.is_empty()) {
            return Err(FolioError::Edit(format!(
                "field path '{s}' contains an empty segment"
            )));
        }
        Ok(FieldPath(trimmed.split('.').map(PathSeg::from).collect()))
    }
}

/// Borrow the value at `path`, if the whole path exists.
pub fn get_path<'a>(doc: &'a Value, path: &FieldPath) -> Option<&'a Value> {
    let mut cursor = doc;
    for seg in path.segments() {
        cursor = match seg {
            PathSeg::Key(key) => cursor.as_object()?.get(key)?,
            PathSeg::Index(idx) => cursor.as_array()?.get(*idx)?,
        };
    }
    Some(cursor)
}

pub fn get_path_mut<'a>(doc: &'a mut Value, path: &FieldPath) -> Option<&'a mut Value> {
    let mut cursor = doc;
    for seg in path.segments() {
        cursor = match seg {
            PathSeg::Key(key) => cursor.as_object_mut()?.get_mut(key)?,
            PathSeg::Index(idx) => cursor.as_array_mut()?.get_mut(*idx)?,
        };
    }
    Some(cursor)
}

/// Replace the value at `path`, returning whether the write applied.
///
/// Missing or mistyped intermediate segments make this a silent no-op; the
/// leaf key itself is inserted into an existing parent object if absent.
/// An out-of-range leaf index is also a no-op.
pub fn set_path(doc: &mut Value, path: &FieldPath, value: Value) -> bool {
    if path.is_root() {
        *doc = value;
        return true;
    }
    let (leaf, parents) = match path.segments().split_last() {
        Some(split) => split,
        None => return false,
    };
    let parent = match get_path_mut(doc, &FieldPath(parents.to_vec())) {
        Some(parent) => parent,
        None => {
            tracing::debug!("set_path: missing intermediate in '{path}', skipping");
            return false;
        }
    };
    match (leaf, parent) {
        (PathSeg::Key(key), Value::Object(map)) => {
            map.insert(key.clone(), value);
            true
        }
        (PathSeg::Index(idx), Value::Array(items)) if *idx < items.len() => {
            items[*idx] = value;
            true
        }
        _ => {
            tracing::debug!("set_path: '{path}' does not address a writable slot, skipping");
            false
        }
    }
}

/// Make sure an object exists at `path`, creating empty objects for missing
/// key segments along the way. Index segments are never fabricated. Returns
/// false when an existing value of another type is in the way.
pub fn ensure_object(doc: &mut Value, path: &FieldPath) -> bool {
    ensure_container(doc, path, || Value::Object(Map::new()), Value::is_object)
}

/// Array twin of [`ensure_object`].
pub fn ensure_list(doc: &mut Value, path: &FieldPath) -> bool {
    ensure_container(doc, path, || Value::Array(Vec::new()), Value::is_array)
}

fn ensure_container(
    doc: &mut Value,
    path: &FieldPath,
    empty: impl Fn() -> Value,
    matches: impl Fn(&Value) -> bool,
) -> bool {
    let mut cursor = doc;
    let last = path.segments().len().saturating_sub(1);
    for (depth, seg) in path.segments().iter().enumerate() {
        cursor = match seg {
            PathSeg::Key(key) => {
                let map = match cursor.as_object_mut() {
                    Some(map) => map,
                    None => return false,
                };
                // Intermediates are always objects; only the leaf takes the
                // requested container shape.
                if depth == last {
                    map.entry(key.clone()).or_insert_with(&empty)
                } else {
                    map.entry(key.clone())
                        .or_insert_with(|| Value::Object(Map::new()))
                }
            }
            PathSeg::Index(idx) => match cursor.as_array_mut().and_then(|a| a.get_mut(*idx)) {
                Some(item) => item,
                None => return false,
            },
        };
    }
    matches(cursor)
}
