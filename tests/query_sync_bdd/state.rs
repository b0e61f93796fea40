//! Scenario state for query synchronisation BDD tests.

use querysync::state::syntax::parse_template;
use querysync::{MemoryRouter, Pagination, SyncOptions, TableQuerySync};
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;

/// State shared across steps in a query synchronisation scenario.
#[derive(ScenarioState, Default)]
pub(crate) struct SyncScenario {
    /// URL the router starts at.
    pub(crate) url: Slot<String>,
    /// Filter template in text syntax.
    pub(crate) template: Slot<String>,
    /// Initial pagination, if the scenario sets one.
    pub(crate) pagination: Slot<Pagination>,
    /// The activated synchroniser under test.
    pub(crate) sync: Slot<TableQuerySync<MemoryRouter>>,
}

impl SyncScenario {
    /// Builds activation options from the configured template and pagination.
    ///
    /// # Panics
    ///
    /// Panics if the template does not parse.
    pub(crate) fn options(&self) -> SyncOptions {
        let template = self.template.get().unwrap_or_default();
        let filters = parse_template(&template)
            .unwrap_or_else(|error| panic!("invalid filter template '{template}': {error}"));
        let options = SyncOptions::default().with_filters(filters);
        match self.pagination.get() {
            Some(pagination) => options.with_pagination(pagination),
            None => options,
        }
    }
}
