use std::fmt::Display;

use indexmap::IndexMap;

/// An ordered collection of HTTP headers.
///
/// `CallHeaders` is used both for the client's default headers and for
/// per-call overrides. Header names are normalized to lowercase so that the
/// overlay semantics are case-insensitive, like HTTP itself.
///
/// # Examples
///
/// ```rust
/// use opcat_core::CallHeaders;
///
/// let headers = CallHeaders::new()
///     .add_header("X-Request-Id", "abc-123")
///     .add_header("X-Retry-Budget", 3);
/// assert_eq!(headers.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallHeaders {
    headers: IndexMap<String, String>,
}

impl CallHeaders {
    /// Creates a new empty `CallHeaders` instance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a header, replacing any previous value under the same
    /// (case-insensitive) name.
    #[must_use]
    pub fn add_header(mut self, name: impl Into<String>, value: impl Display) -> Self {
        self.insert(name, value.to_string());
        self
    }

    pub(in crate::client) fn insert(&mut self, name: impl Into<String>, value: String) {
        self.headers.insert(name.into().to_ascii_lowercase(), value);
    }

    /// Merges another `CallHeaders` instance into this one, producing a new
    /// collection.
    ///
    /// Headers from `other` win on name collision; entries keep the order in
    /// which they were first inserted.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        for (name, value) in other.headers {
            self.headers.insert(name, value);
        }
        self
    }

    /// Checks if the headers collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Returns the number of headers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    /// Returns the value stored under a (case-insensitive) name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub(in crate::client) fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}
