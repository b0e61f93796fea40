//! Querysync library crate keeping table view state in step with a URL.
//!
//! The library binds filters, a sort specification, pagination and an active
//! tab to a URL query string in both directions. State is restored from the
//! query when a view activates or the URL changes externally, and projected
//! back with a replace navigation whenever local state changes the query.

pub mod config;
pub mod error;
pub mod query;
pub mod router;
pub mod state;
pub mod sync;
pub mod telemetry;

pub use config::{ConfigOverrides, QuerySyncConfig};
pub use error::QuerySyncError;
pub use query::{QueryMap, QueryValue};
pub use router::{MemoryRouter, QueryRouter};
pub use state::{
    FilterKind, FilterState, FilterTemplate, FilterValue, PageParam, Pagination, SortKey,
    SortOrder, SortSpec, TableState,
};
pub use sync::{Navigation, Reconciliation, SyncOptions, TableQuerySync};
