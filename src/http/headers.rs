//! HTTP header map with case-insensitive name lookup.
//!
//! HTTP headers are order-preserving and case-insensitive per [RFC 9110 §5].

use std::fmt;

/// A case-insensitive, order-preserving HTTP header map.
///
/// Multiple values per header name are allowed, matching the semantics of
/// HTTP/1.1 header fields (RFC 9110 §5.3). The caching engine additionally
/// relies on [`set`](Self::set) for headers that must hold exactly one value,
/// such as `cache-control` forced on bypass responses and the
/// `x-cache-status` diagnostic stamp.
///
/// # Examples
///
/// ```
/// use freshet::http::Headers;
///
/// let mut headers = Headers::new();
/// headers.insert("Cache-Control", "max-age=60");
/// assert_eq!(headers.get("cache-control"), Some("max-age=60"));
///
/// headers.set("Cache-Control", "no-cache, must-revalidate");
/// assert_eq!(headers.get("cache-control"), Some("no-cache, must-revalidate"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    inner: Vec<(String, String)>,
}

impl Headers {
    /// Creates an empty header map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a header map with pre-allocated capacity for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Vec::with_capacity(capacity),
        }
    }

    /// Appends a header entry. Multiple values for the same name are preserved.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.inner.push((name.into(), value.into()));
    }

    /// Replaces every entry with the given name (case-insensitive) by a single
    /// entry carrying `value`.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.remove(&name);
        self.inner.push((name, value.into()));
    }

    /// Returns the first value for the given header name (case-insensitive), or `None`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns an iterator over all values for the given header name (case-insensitive).
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.inner
            .iter()
            .filter(move |(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Removes all entries with the given header name (case-insensitive).
    ///
    /// Returns `true` if any entries were removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.inner.len();
        self.inner.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.inner.len() < before
    }

    /// Returns `true` if the map contains at least one entry with the given name.
    pub fn contains(&self, name: &str) -> bool {
        self.inner.iter().any(|(k, _)| k.eq_ignore_ascii_case(name))
    }

    /// Returns the total number of header entries (not unique names).
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if there are no header entries.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns an iterator over all `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.inner {
            write!(f, "{name}: {value}\r\n")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_insensitive_get() {
        let mut h = Headers::new();
        h.insert("Cache-Control", "private");
        assert_eq!(h.get("cache-control"), Some("private"));
        assert_eq!(h.get("CACHE-CONTROL"), Some("private"));
        assert_eq!(h.get("Cache-Control"), Some("private"));
    }

    #[test]
    fn multi_value() {
        let mut h = Headers::new();
        h.insert("Warning", "110 - \"Response is Stale\"");
        h.insert("Warning", "112 - \"Disconnected Operation\"");
        let vals: Vec<_> = h.get_all("warning").collect();
        assert_eq!(vals.len(), 2);
    }

    #[test]
    fn set_replaces_all_entries() {
        let mut h = Headers::new();
        h.insert("X-Cache-Status", "MISS");
        h.insert("x-cache-status", "MISS");
        h.set("X-Cache-Status", "HIT");
        let vals: Vec<_> = h.get_all("x-cache-status").collect();
        assert_eq!(vals, vec!["HIT"]);
    }

    #[test]
    fn remove() {
        let mut h = Headers::new();
        h.insert("Age", "10");
        h.insert("Age", "20");
        assert!(h.remove("age"));
        assert!(h.is_empty());
        assert!(!h.remove("age")); // already gone
    }

    #[test]
    fn preserves_insertion_order() {
        let mut h = Headers::new();
        h.insert("A", "1");
        h.insert("B", "2");
        h.insert("C", "3");
        let names: Vec<_> = h.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }
}
