//! Header list and lookup
//!
//! Headers keep arrival order and repeated keys stay separate entries.
//! Lookups are read-only; a miss is `None` or an empty `Vec`.

use smallvec::SmallVec;

/// A single header field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub key: String,
    pub value: String,
}

/// How a query key is compared with stored keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Full-length, case-sensitive equality
    #[default]
    Exact,
    /// Compare over the stored key's length only: a stored key matches every
    /// query it is a prefix of (stored `Ho` matches query `Host`).
    /// Kept for callers relying on the old lookup behavior.
    StoredPrefix,
    /// Full-length ASCII case-insensitive equality
    IgnoreAsciiCase,
}

impl MatchMode {
    #[inline]
    pub fn matches(self, stored: &str, query: &str) -> bool {
        match self {
            MatchMode::Exact => stored == query,
            MatchMode::StoredPrefix => query.as_bytes().starts_with(stored.as_bytes()),
            MatchMode::IgnoreAsciiCase => stored.eq_ignore_ascii_case(query),
        }
    }
}

/// Ordered header list (stack-allocated for small header counts)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: SmallVec<[Header; 16]>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Header> {
        self.entries.iter()
    }

    /// Append a complete header
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push(Header {
            key: key.into(),
            value: value.into(),
        });
    }

    /// Append a header whose value has not arrived yet
    pub(crate) fn push_key(&mut self, key: String) {
        self.push(key, String::new());
    }

    /// Set the value of the most recent header. Returns `false` when empty.
    pub(crate) fn set_last_value(&mut self, value: String) -> bool {
        match self.entries.last_mut() {
            Some(header) => {
                header.value = value;
                true
            }
            None => false,
        }
    }

    /// First value whose key equals `key`
    pub fn first(&self, key: &str) -> Option<&str> {
        self.first_by(key, MatchMode::Exact)
    }

    /// Every value whose key equals `key`, in arrival order
    pub fn all(&self, key: &str) -> Vec<&str> {
        self.all_by(key, MatchMode::Exact)
    }

    pub fn first_by(&self, key: &str, mode: MatchMode) -> Option<&str> {
        self.entries
            .iter()
            .find(|h| mode.matches(&h.key, key))
            .map(|h| h.value.as_str())
    }

    pub fn all_by(&self, key: &str, mode: MatchMode) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|h| mode.matches(&h.key, key))
            .map(|h| h.value.as_str())
            .collect()
    }
}

impl<'a> IntoIterator for &'a Headers {
    type Item = &'a Header;
    type IntoIter = std::slice::Iter<'a, Header>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Headers {
        let mut headers = Headers::new();
        headers.push("Host", "google.com");
        headers.push("Accept", "*/*");
        headers.push("Host", "example.com");
        headers
    }

    #[test]
    fn test_first_and_all_keep_order() {
        let headers = sample();
        assert_eq!(headers.first("Host"), Some("google.com"));
        assert_eq!(headers.all("Host"), vec!["google.com", "example.com"]);
        assert_eq!(headers.len(), 3);
    }

    #[test]
    fn test_miss_is_empty() {
        let headers = sample();
        assert_eq!(headers.first("Cookie"), None);
        let all = headers.all("Cookie");
        assert!(all.is_empty());
        assert_eq!(all.capacity(), 0);
    }

    #[test]
    fn test_exact_is_case_sensitive() {
        let headers = sample();
        assert_eq!(headers.first("host"), None);
        assert_eq!(headers.first("Ho"), None);
        assert_eq!(headers.first("Hostname"), None);
    }

    #[test]
    fn test_ignore_ascii_case() {
        let headers = sample();
        assert_eq!(
            headers.all_by("HOST", MatchMode::IgnoreAsciiCase),
            vec!["google.com", "example.com"]
        );
    }

    #[test]
    fn test_stored_prefix_matching() {
        let mut headers = Headers::new();
        headers.push("Ho", "short");
        headers.push("Host", "long");

        // Stored key compared over its own length only
        assert_eq!(
            headers.all_by("Host", MatchMode::StoredPrefix),
            vec!["short", "long"]
        );
        assert_eq!(headers.all_by("Ho", MatchMode::StoredPrefix), vec!["short"]);
        assert_eq!(headers.first_by("H", MatchMode::StoredPrefix), None);
    }

    #[test]
    fn test_set_last_value() {
        let mut headers = Headers::new();
        assert!(!headers.set_last_value("x".to_string()));
        headers.push_key("A".to_string());
        assert!(headers.set_last_value("1".to_string()));
        assert_eq!(headers.first("A"), Some("1"));
    }
}
