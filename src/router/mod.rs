//! Routing seam for reading and replacing the current query.
//!
//! The synchroniser never reaches for an ambient router. It is handed a
//! [`QueryRouter`] that can report the current query and accept a
//! replacement. [`MemoryRouter`] backs that trait with a `url::Url` and a
//! simple history so navigation can be driven without a browser.

use url::Url;

use crate::error::QuerySyncError;
use crate::query::QueryMap;

/// Routing capability consumed by the synchroniser.
#[cfg_attr(test, mockall::automock)]
pub trait QueryRouter {
    /// Returns the current query.
    fn query(&self) -> QueryMap;

    /// Replaces the query of the current history entry.
    fn replace_query(&mut self, query: QueryMap);
}

impl<R: QueryRouter + ?Sized> QueryRouter for &mut R {
    fn query(&self) -> QueryMap {
        (**self).query()
    }

    fn replace_query(&mut self, query: QueryMap) {
        (**self).replace_query(query);
    }
}

/// In-memory router over a single URL with push/back history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryRouter {
    current: Url,
    history: Vec<Url>,
    replacements: usize,
}

impl MemoryRouter {
    /// Creates a router positioned at `url`.
    #[must_use]
    pub const fn new(url: Url) -> Self {
        Self {
            current: url,
            history: Vec::new(),
            replacements: 0,
        }
    }

    /// Parses `input` and positions the router there.
    ///
    /// # Errors
    ///
    /// Returns [`QuerySyncError::InvalidUrl`] when `input` is not a valid
    /// absolute URL.
    pub fn parse(input: &str) -> Result<Self, QuerySyncError> {
        let url = Url::parse(input).map_err(|error| QuerySyncError::InvalidUrl(error.to_string()))?;
        Ok(Self::new(url))
    }

    /// The URL of the current history entry.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.current
    }

    /// Navigates to a new query, keeping the current entry in history.
    pub fn push_query(&mut self, query: &QueryMap) {
        self.history.push(self.current.clone());
        query.apply_to_url(&mut self.current);
        tracing::trace!("pushed query '{query}'");
    }

    /// Returns to the previous history entry.
    ///
    /// Returns `false` when there is nothing to go back to.
    pub fn back(&mut self) -> bool {
        let Some(previous) = self.history.pop() else {
            return false;
        };
        self.current = previous;
        true
    }

    /// Number of entries behind the current one.
    #[must_use]
    pub const fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Number of replace navigations performed.
    #[must_use]
    pub const fn replacements(&self) -> usize {
        self.replacements
    }
}

impl QueryRouter for MemoryRouter {
    fn query(&self) -> QueryMap {
        QueryMap::from_url(&self.current)
    }

    fn replace_query(&mut self, query: QueryMap) {
        query.apply_to_url(&mut self.current);
        self.replacements = self.replacements.saturating_add(1);
    }
}
