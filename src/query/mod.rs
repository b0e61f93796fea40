//! Query-string representation shared by routers and the synchroniser.
//!
//! A [`QueryMap`] models the query component of a URL as an insertion-ordered
//! mapping from keys to either a single value or a repeated sequence of
//! values. Ordering matters: two maps are equal only when their entries
//! appear in the same order, which is what decides whether a projection
//! results in a navigation.

use std::fmt;

use indexmap::IndexMap;
use url::{Url, form_urlencoded};

/// Query key carrying the active sort column.
pub const SORT_BY_KEY: &str = "sortBy";
/// Query key carrying the active sort order token.
pub const SORT_ORDER_KEY: &str = "sortOrder";
/// Query key carrying the current page.
pub const PAGE_KEY: &str = "page";
/// Query key carrying the page size.
pub const ITEMS_PER_PAGE_KEY: &str = "itemsPerPage";
/// Query key carrying the active tab identifier.
pub const TAB_KEY: &str = "tab";

/// Builds the query key for a declared filter, e.g. `filters[status]`.
#[must_use]
pub fn filter_query_key(key: &str) -> String {
    format!("filters[{key}]")
}

/// A single query parameter value.
///
/// Equality follows the encoded form, so `Single("a")` equals
/// `Multiple(["a"])`.
#[derive(Debug, Clone)]
pub enum QueryValue {
    /// The key appeared once.
    Single(String),
    /// The key appeared more than once, or was written from a sequence.
    Multiple(Vec<String>),
}

impl QueryValue {
    /// Returns the value as a scalar, taking the first entry of a sequence.
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        match self {
            Self::Single(value) => Some(value.as_str()),
            Self::Multiple(values) => values.first().map(String::as_str),
        }
    }

    /// Returns every value in order.
    #[must_use]
    pub fn values(&self) -> Vec<&str> {
        match self {
            Self::Single(value) => vec![value.as_str()],
            Self::Multiple(values) => values.iter().map(String::as_str).collect(),
        }
    }

    fn append(&mut self, value: String) {
        match self {
            Self::Single(existing) => {
                let first = std::mem::take(existing);
                *self = Self::Multiple(vec![first, value]);
            }
            Self::Multiple(values) => values.push(value),
        }
    }
}

impl PartialEq for QueryValue {
    fn eq(&self, other: &Self) -> bool {
        self.values() == other.values()
    }
}

impl Eq for QueryValue {}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_owned())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(values: Vec<String>) -> Self {
        Self::Multiple(values)
    }
}

/// Insertion-ordered query parameters.
///
/// Inserting an existing key keeps its position; removing a key preserves
/// the order of the remaining entries.
#[derive(Debug, Clone, Default)]
pub struct QueryMap {
    entries: IndexMap<String, QueryValue>,
}

impl QueryMap {
    /// Creates an empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a form-urlencoded query string, with or without a leading `?`.
    ///
    /// Repeated keys collapse into [`QueryValue::Multiple`] at the position
    /// of their first occurrence. Pairs with an empty key are dropped.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let trimmed = input.strip_prefix('?').unwrap_or(input);
        let mut query = Self::new();
        for (key, value) in form_urlencoded::parse(trimmed.as_bytes()) {
            if key.is_empty() {
                continue;
            }
            query.append(key.into_owned(), value.into_owned());
        }
        query
    }

    /// Reads the query component of a URL.
    #[must_use]
    pub fn from_url(url: &Url) -> Self {
        url.query().map(Self::parse).unwrap_or_default()
    }

    /// Writes this query into a URL, clearing the query component when empty.
    pub fn apply_to_url(&self, url: &mut Url) {
        if self.is_empty() {
            url.set_query(None);
        } else {
            url.set_query(Some(&self.to_query_string()));
        }
    }

    /// Encodes the query, writing sequences as repeated pairs.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.entries {
            for item in value.values() {
                serializer.append_pair(key, item);
            }
        }
        serializer.finish()
    }

    /// Looks up a raw value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.entries.get(key)
    }

    /// Returns a value only when it is present and non-empty.
    ///
    /// Sequences contribute their first entry.
    #[must_use]
    pub fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key)
            .and_then(QueryValue::first)
            .filter(|value| !value.is_empty())
    }

    /// Returns true when the key is present, even with an empty value.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Inserts or overwrites a value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Removes a key, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<QueryValue> {
        self.entries.shift_remove(key)
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no keys are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    fn append(&mut self, key: String, value: String) {
        match self.entries.get_mut(&key) {
            Some(existing) => existing.append(value),
            None => {
                self.entries.insert(key, QueryValue::Single(value));
            }
        }
    }
}

impl PartialEq for QueryMap {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len() && self.entries.iter().eq(other.entries.iter())
    }
}

impl Eq for QueryMap {}

impl fmt::Display for QueryMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

impl<K, V> FromIterator<(K, V)> for QueryMap
where
    K: Into<String>,
    V: Into<QueryValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut query = Self::new();
        for (key, value) in iter {
            query.insert(key, value);
        }
        query
    }
}
