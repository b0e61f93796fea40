//! View state kept in step with the query string.
//!
//! [`TableState`] groups the four pieces a list or table view exposes to its
//! controls: filters, sort specification, pagination and the active tab.

mod filters;
mod pagination;
mod sort;
pub mod syntax;

pub use filters::{FilterKind, FilterState, FilterTemplate, FilterValue};
pub use pagination::{PageParam, Pagination};
pub use sort::{SortDirection, SortKey, SortOrder, SortSpec};

/// The state bound to a table view's controls.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableState {
    /// Filter values, keyed as the template declared them.
    pub filters: FilterState,
    /// Sort specification; only the first key is persisted.
    pub sort_by: SortSpec,
    /// Current page and page size.
    pub pagination: Pagination,
    /// Selected tab, if any.
    pub active_tab: Option<String>,
}
