//! Sort specification for table views.

/// Interpreted direction of a sort order token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Smallest first.
    Ascending,
    /// Largest first.
    Descending,
}

/// A sort order token, kept verbatim so it round-trips through the query.
///
/// Unrecognised tokens are stored and written back unchanged;
/// [`SortOrder::direction`] returns `None` for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOrder(String);

impl SortOrder {
    /// Wraps a raw order token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The `asc` token.
    #[must_use]
    pub fn ascending() -> Self {
        Self::new("asc")
    }

    /// The `desc` token.
    #[must_use]
    pub fn descending() -> Self {
        Self::new("desc")
    }

    /// Borrow the raw token.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Interprets the token, accepting short and long spellings.
    #[must_use]
    pub fn direction(&self) -> Option<SortDirection> {
        match self.0.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(SortDirection::Ascending),
            "desc" | "descending" => Some(SortDirection::Descending),
            _ => None,
        }
    }
}

/// One sorted column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    /// Column identifier.
    pub key: String,
    /// Order token for the column.
    pub order: SortOrder,
}

impl SortKey {
    /// Creates a sort key.
    #[must_use]
    pub fn new(key: impl Into<String>, order: SortOrder) -> Self {
        Self {
            key: key.into(),
            order,
        }
    }
}

/// Ordered sort keys. Only the first entry is written to the query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SortSpec(Vec<SortKey>);

impl SortSpec {
    /// Creates an empty specification.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Creates a specification holding exactly one key.
    #[must_use]
    pub fn single(key: impl Into<String>, order: SortOrder) -> Self {
        Self(vec![SortKey::new(key, order)])
    }

    /// The key that round-trips through the query.
    #[must_use]
    pub fn first(&self) -> Option<&SortKey> {
        self.0.first()
    }

    /// Appends a secondary key. Secondary keys are never persisted.
    pub fn push(&mut self, key: SortKey) {
        self.0.push(key);
    }

    /// Removes every key.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Returns true when nothing is sorted.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of keys, including secondary ones.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates keys in priority order.
    pub fn iter(&self) -> impl Iterator<Item = &SortKey> {
        self.0.iter()
    }
}

impl From<Vec<SortKey>> for SortSpec {
    fn from(keys: Vec<SortKey>) -> Self {
        Self(keys)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::short_ascending("asc", Some(SortDirection::Ascending))]
    #[case::long_descending("descending", Some(SortDirection::Descending))]
    #[case::mixed_case("DESC", Some(SortDirection::Descending))]
    #[case::unknown("sideways", None)]
    fn direction_interprets_known_tokens(
        #[case] token: &str,
        #[case] expected: Option<SortDirection>,
    ) {
        assert_eq!(SortOrder::new(token).direction(), expected);
    }

    #[rstest]
    fn unknown_tokens_are_kept_verbatim() {
        assert_eq!(SortOrder::new("sideways").as_str(), "sideways");
    }

    #[rstest]
    fn first_ignores_secondary_keys() {
        let mut spec = SortSpec::single("name", SortOrder::ascending());
        spec.push(SortKey::new("created", SortOrder::descending()));

        assert_eq!(spec.len(), 2);
        assert_eq!(spec.first().map(|key| key.key.as_str()), Some("name"));
    }
}
