//! Bidirectional synchronisation between table state and the URL query.
//!
//! [`TableQuerySync`] owns the view state and an injected [`QueryRouter`].
//! Instead of two independent watchers it exposes a single explicit
//! [`TableQuerySync::reconcile`] step:
//!
//! 1. If the router's query differs from the last query this synchroniser
//!    observed, the state is restored from it. The query wins for every key
//!    it carries, including when local state was mutated in the same step.
//! 2. If local state was mutated, or restoration changed it, the state is
//!    projected back. A replace navigation is issued only when the projected
//!    query differs from the current one, which is what stops the two
//!    directions from feeding each other forever.
//!
//! Activation restores once and then projects once, so a URL that already
//! carries parameters seeds the state before it is echoed back.

mod project;
mod restore;

use std::sync::Arc;

use tracing::debug;

use crate::query::QueryMap;
use crate::router::QueryRouter;
use crate::state::{FilterState, FilterTemplate, Pagination, SortSpec, TableState};
use crate::telemetry::{NoopTelemetrySink, TelemetryEvent, TelemetrySink};

/// Initial values supplied when a view activates the synchroniser.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncOptions {
    /// Filter template; its value shapes fix how each key is restored.
    pub initial_filters: FilterTemplate,
    /// Initial sort specification.
    pub initial_sort_by: SortSpec,
    /// Initial page and page size.
    pub initial_pagination: Pagination,
    /// Initially selected tab.
    pub initial_tab: Option<String>,
}

impl SyncOptions {
    /// Sets the filter template.
    #[must_use]
    pub fn with_filters(mut self, filters: FilterTemplate) -> Self {
        self.initial_filters = filters;
        self
    }

    /// Sets the initial sort specification.
    #[must_use]
    pub fn with_sort_by(mut self, sort_by: SortSpec) -> Self {
        self.initial_sort_by = sort_by;
        self
    }

    /// Sets the initial pagination.
    #[must_use]
    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.initial_pagination = pagination;
        self
    }

    /// Sets the initially selected tab.
    #[must_use]
    pub fn with_tab(mut self, tab: impl Into<String>) -> Self {
        self.initial_tab = Some(tab.into());
        self
    }

    fn into_state(self) -> TableState {
        TableState {
            filters: FilterState::from_template(&self.initial_filters),
            sort_by: self.initial_sort_by,
            pagination: self.initial_pagination,
            active_tab: self.initial_tab,
        }
    }
}

/// What a projection did with the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// The projected query matched the current one.
    Skipped,
    /// A replace navigation was requested with this query.
    Replaced(QueryMap),
}

impl Navigation {
    /// Returns true when a navigation was requested.
    #[must_use]
    pub const fn is_replaced(&self) -> bool {
        matches!(self, Self::Replaced(_))
    }
}

/// Result of a reconciliation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// Whether the state changed because of an external query change.
    pub restored: bool,
    /// What projection did, if it ran.
    pub navigation: Option<Navigation>,
}

impl Reconciliation {
    const IDLE: Self = Self {
        restored: false,
        navigation: None,
    };

    /// Returns true when nothing changed on either side.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        !self.restored && self.navigation.is_none()
    }

    /// Returns true when a replace navigation was requested.
    #[must_use]
    pub const fn replaced(&self) -> bool {
        matches!(self.navigation, Some(Navigation::Replaced(_)))
    }
}

/// Keeps a [`TableState`] and a router's query consistent.
pub struct TableQuerySync<R> {
    router: R,
    state: TableState,
    observed: QueryMap,
    dirty: bool,
    telemetry: Arc<dyn TelemetrySink>,
}

impl<R: QueryRouter> TableQuerySync<R> {
    /// Activates the synchroniser against `router`.
    ///
    /// Restores state from the router's current query and then projects it
    /// back once.
    pub fn initialize(options: SyncOptions, router: R) -> Self {
        Self::with_telemetry(options, router, Arc::new(NoopTelemetrySink))
    }

    /// Activates the synchroniser, reporting events to `telemetry`.
    pub fn with_telemetry(
        options: SyncOptions,
        router: R,
        telemetry: Arc<dyn TelemetrySink>,
    ) -> Self {
        let mut sync = Self {
            router,
            state: options.into_state(),
            observed: QueryMap::new(),
            dirty: false,
            telemetry,
        };
        let current = sync.router.query();
        sync.restore(&current);
        sync.observed = current;
        sync.update_query();
        sync
    }

    /// Current filter values.
    #[must_use]
    pub const fn filters(&self) -> &FilterState {
        &self.state.filters
    }

    /// Current sort specification.
    #[must_use]
    pub const fn sort_by(&self) -> &SortSpec {
        &self.state.sort_by
    }

    /// Current pagination.
    #[must_use]
    pub const fn pagination(&self) -> &Pagination {
        &self.state.pagination
    }

    /// Currently selected tab.
    #[must_use]
    pub fn active_tab(&self) -> Option<&str> {
        self.state.active_tab.as_deref()
    }

    /// The whole view state.
    #[must_use]
    pub const fn state(&self) -> &TableState {
        &self.state
    }

    /// Mutable access to the view state.
    ///
    /// The state is marked changed; the next [`Self::reconcile`] projects it.
    pub const fn state_mut(&mut self) -> &mut TableState {
        self.dirty = true;
        &mut self.state
    }

    /// Mutates the view state and reconciles immediately.
    pub fn update(&mut self, mutate: impl FnOnce(&mut TableState)) -> Reconciliation {
        mutate(self.state_mut());
        self.reconcile()
    }

    /// The injected router.
    #[must_use]
    pub const fn router(&self) -> &R {
        &self.router
    }

    /// Mutable access to the router, for external navigation.
    ///
    /// Changes made here are picked up by the next [`Self::reconcile`].
    pub const fn router_mut(&mut self) -> &mut R {
        &mut self.router
    }

    /// Consumes the synchroniser, returning the state and the router.
    #[must_use]
    pub fn into_parts(self) -> (TableState, R) {
        (self.state, self.router)
    }

    /// Brings state and query back in step.
    pub fn reconcile(&mut self) -> Reconciliation {
        let current = self.router.query();
        let restored = if current == self.observed {
            false
        } else {
            let changed = self.restore(&current);
            self.observed = current;
            changed
        };

        if !(self.dirty || restored) {
            return Reconciliation::IDLE;
        }

        Reconciliation {
            restored,
            navigation: Some(self.update_query()),
        }
    }

    /// Projects the state into the query, replacing it when it differs.
    ///
    /// This is the manual trigger; it runs regardless of whether the state
    /// is marked changed.
    pub fn update_query(&mut self) -> Navigation {
        let current = self.router.query();
        let proposed = project::project_to_query(&self.state, &current);
        self.dirty = false;

        if proposed == current {
            debug!("projected query matches current query; skipping navigation");
            self.telemetry.record(TelemetryEvent::ProjectionSkipped);
            return Navigation::Skipped;
        }

        debug!("replacing query with '{proposed}'");
        self.telemetry.record(TelemetryEvent::QueryReplaced {
            query: proposed.to_query_string(),
        });
        self.router.replace_query(proposed.clone());
        self.observed = self.router.query();
        Navigation::Replaced(proposed)
    }

    fn restore(&mut self, query: &QueryMap) -> bool {
        let before = self.state.clone();
        restore::restore_from_query(&mut self.state, query);
        let changed = self.state != before;
        if changed {
            debug!("restored view state from query '{query}'");
            self.telemetry.record(TelemetryEvent::StateRestored {
                query: query.to_query_string(),
            });
        }
        changed
    }
}

impl<R> std::fmt::Debug for TableQuerySync<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableQuerySync")
            .field("state", &self.state)
            .field("observed", &self.observed)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
