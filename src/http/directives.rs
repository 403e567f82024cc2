//! `cache-control` directive-set parsing.
//!
//! A `cache-control` header value is a comma-separated list of directives,
//! each optionally carrying a value (`max-age=60`, `private`, `no-store`).
//! The engine never rejects a malformed directive outright — a cache must
//! fail toward "not fresh", so unparsable values degrade to `0` and unknown
//! directives are simply carried along.

use std::collections::HashMap;

/// A parsed `cache-control` header: directive name → optional value.
///
/// Names are lowercased; when a directive occurs more than once the last
/// occurrence wins.
///
/// # Examples
///
/// ```
/// use freshet::http::DirectiveSet;
///
/// let d = DirectiveSet::parse("Private, max-age=60, no-transform");
/// assert!(d.contains("private"));
/// assert_eq!(d.seconds("max-age"), Some(60));
/// assert_eq!(d.seconds("s-maxage"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectiveSet {
    directives: HashMap<String, Option<String>>,
}

impl DirectiveSet {
    /// Parses a raw `cache-control` header value.
    pub fn parse(raw: &str) -> Self {
        let mut directives = HashMap::new();
        for part in raw.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            match part.split_once('=') {
                Some((name, value)) => directives.insert(
                    name.trim().to_ascii_lowercase(),
                    Some(value.trim().trim_matches('"').to_owned()),
                ),
                None => directives.insert(part.to_ascii_lowercase(), None),
            };
        }
        Self { directives }
    }

    /// Returns `true` if the directive is present, with or without a value.
    pub fn contains(&self, name: &str) -> bool {
        self.directives.contains_key(name)
    }

    /// Returns the directive's raw value, or `None` if the directive is
    /// absent or valueless.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.directives.get(name)?.as_deref()
    }

    /// Returns the directive's value parsed as whole seconds.
    ///
    /// `None` means the directive is absent. A present directive with a
    /// missing or malformed value parses as `Some(0)` — the lenient reading
    /// required for directives like `max-age` where an untrusted value must
    /// count as already-stale.
    pub fn seconds(&self, name: &str) -> Option<i64> {
        self.directives
            .get(name)
            .map(|v| v.as_deref().and_then(|s| s.parse().ok()).unwrap_or(0))
    }

    /// Number of distinct directives.
    pub fn len(&self) -> usize {
        self.directives.len()
    }

    /// Returns `true` if no directives were parsed.
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }
}
