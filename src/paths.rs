use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field names whose string values carry content-relative asset paths and
/// therefore get rewritten by [`PathResolver::resolve_tree`].
pub const PATH_FIELDS: &[&str] = &[
    "image",
    "logo",
    "icon",
    "profileImage",
    "backgroundImage",
    "thumbnail",
    "resumeFile",
    "favicon",
];

/// Rewrites content-relative asset paths against a deployment base prefix.
///
/// A site served from a sub-path (e.g. `/MadhuPortfolio/`) stores asset
/// references relative to its own root; every reference must be prefixed with
/// the deployment base before it is usable as a URL path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathResolver {
    base: String,
}

impl PathResolver {
    pub fn new<S: Into<String>>(base: S) -> PathResolver {
        PathResolver { base: base.into() }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Resolve a single path against the deployment base.
    ///
    /// - An empty path stays empty.
    /// - Absolute `http://` / `https://` URLs pass through unchanged.
    /// - Anything else is joined to the base with exactly one `/` between
    ///   them, regardless of trailing/leading separators on either side.
    ///
    /// ```
    /// use folio_core::paths::PathResolver;
    ///
    /// let resolver = PathResolver::new("/MadhuPortfolio/");
    /// assert_eq!(
    ///     resolver.resolve("/images/logo.png"),
    ///     "/MadhuPortfolio/images/logo.png"
    /// );
    /// assert_eq!(
    ///     resolver.resolve("images/logo.png"),
    ///     "/MadhuPortfolio/images/logo.png"
    /// );
    /// assert_eq!(resolver.resolve("https://cdn.example.com/a.png"), "https://cdn.example.com/a.png");
    /// ```
    pub fn resolve(&self, path: &str) -> String {
        if path.is_empty() {
            return String::new();
        }
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        let base = self.base.trim_end_matches('/');
        let cleaned = path.strip_prefix('/').unwrap_or(path);
        format!("{base}/{cleaned}")
    }

    /// Walk a JSON tree and resolve every string value whose key is one of
    /// `fields`. Arrays are walked element-wise, nested objects recursively,
    /// everything else passes through untouched.
    pub fn resolve_tree(&self, value: &mut Value, fields: &[&str]) {
        match value {
            Value::Object(map) => {
                for (key, entry) in map.iter_mut() {
                    match entry {
                        Value::String(s) if fields.contains(&key.as_str()) => {
                            let resolved = self.resolve(s);
                            tracing::debug!("resolve_tree: {key}: {s} -> {resolved}");
                            *entry = Value::String(resolved);
                        }
                        _ => self.resolve_tree(entry, fields),
                    }
                }
            }
            Value::Array(items) => {
                for item in items.iter_mut() {
                    self.resolve_tree(item, fields);
                }
            }
            _ => {}
        }
    }
}
