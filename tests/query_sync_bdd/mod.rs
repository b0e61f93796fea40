//! Support modules for query synchronisation BDD tests.

pub(crate) mod state;

pub(crate) use state::SyncScenario;
