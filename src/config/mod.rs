//! Command-line configuration loaded from CLI, environment, and files.
//!
//! This module provides the configuration struct behind the `querysync`
//! binary, merged with ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in defaults
//! 2. **Configuration file** – `.querysync.toml` in the current directory,
//!    home directory, or XDG config directory
//! 3. **Environment variables** – `QUERYSYNC_URL`, `QUERYSYNC_FILTERS`, ...
//! 4. **Command-line arguments** – `--url`/`-u`, `--filters`/`-f`, ...
//!
//! # Configuration File
//!
//! ```toml
//! url = "https://example.test/issues?filters[status]=open"
//! filters = "status=all,archived?,tags[]"
//! items_per_page = 25
//! ```

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::error::QuerySyncError;
use crate::state::syntax::{parse_assignments, parse_template};
use crate::state::{
    FilterState, FilterValue, PageParam, Pagination, SortOrder, SortSpec, TableState,
};
use crate::sync::SyncOptions;

/// Configuration for a single synchronisation run.
///
/// # Example
///
/// ```no_run
/// use ortho_config::OrthoConfig;
/// use querysync::QuerySyncConfig;
///
/// let config = QuerySyncConfig::load().expect("failed to load configuration");
/// let url = config.require_url().expect("URL required");
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "QUERYSYNC",
    discovery(
        dotfile_name = ".querysync.toml",
        config_file_name = "querysync.toml",
        app_name = "querysync"
    )
)]
pub struct QuerySyncConfig {
    /// URL whose query string holds the view state.
    ///
    /// Can be provided via:
    /// - CLI: `--url <URL>` or `-u <URL>`
    /// - Environment: `QUERYSYNC_URL`
    /// - Config file: `url = "..."`
    #[ortho_config(cli_short = 'u')]
    pub url: Option<String>,

    /// Filter template, e.g. `status=all,archived?,tags[]`.
    ///
    /// Can be provided via:
    /// - CLI: `--filters <SPEC>` or `-f <SPEC>`
    /// - Environment: `QUERYSYNC_FILTERS`
    /// - Config file: `filters = "..."`
    #[ortho_config(cli_short = 'f')]
    pub filters: Option<String>,

    /// Filter assignments applied after the URL is restored,
    /// e.g. `tags=a|b,status=open`.
    #[ortho_config(cli_short = 's')]
    pub set: Option<String>,

    /// Sort column. Requires `sort_order`; wins over the URL's `sortBy`.
    #[ortho_config()]
    pub sort_by: Option<String>,

    /// Sort order token. Requires `sort_by`; wins over the URL's `sortOrder`.
    #[ortho_config()]
    pub sort_order: Option<String>,

    /// Page; wins over the URL's `page`.
    #[ortho_config(cli_short = 'p')]
    pub page: Option<u64>,

    /// Page size; wins over the URL's `itemsPerPage`.
    #[ortho_config()]
    pub items_per_page: Option<u64>,

    /// Selected tab; wins over the URL's `tab`.
    #[ortho_config(cli_short = 't')]
    pub tab: Option<String>,

    /// Writes synchronisation telemetry to stderr as JSON lines.
    ///
    /// Note: environment variable `QUERYSYNC_TELEMETRY` is not supported
    /// because `ortho_config` does not load boolean values from the
    /// environment.
    #[ortho_config()]
    pub telemetry: bool,
}

impl QuerySyncConfig {
    /// Returns the URL or an error if missing.
    ///
    /// # Errors
    ///
    /// Returns [`QuerySyncError::MissingUrl`] when no URL is configured.
    pub fn require_url(&self) -> Result<&str, QuerySyncError> {
        self.url.as_deref().ok_or(QuerySyncError::MissingUrl)
    }

    /// Returns the configured sort pair, or an empty specification.
    ///
    /// # Errors
    ///
    /// Returns [`QuerySyncError::IncompleteSort`] when only one half of the
    /// pair is configured.
    pub fn sort_spec(&self) -> Result<SortSpec, QuerySyncError> {
        match (&self.sort_by, &self.sort_order) {
            (Some(key), Some(order)) => Ok(SortSpec::single(
                key.as_str(),
                SortOrder::new(order.as_str()),
            )),
            (None, None) => Ok(SortSpec::new()),
            _ => Err(QuerySyncError::IncompleteSort),
        }
    }

    /// Returns the configured pagination.
    #[must_use]
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page.map(PageParam::from),
            items_per_page: self.items_per_page.map(PageParam::from),
        }
    }

    /// Builds the activation options.
    ///
    /// # Errors
    ///
    /// Returns [`QuerySyncError::InvalidFilterSpec`] for a malformed filter
    /// template and [`QuerySyncError::IncompleteSort`] for half a sort pair.
    pub fn sync_options(&self) -> Result<SyncOptions, QuerySyncError> {
        let template = parse_template(self.filters.as_deref().unwrap_or_default())?;
        Ok(SyncOptions {
            initial_filters: template,
            initial_sort_by: self.sort_spec()?,
            initial_pagination: self.pagination(),
            initial_tab: self.tab.clone(),
        })
    }

    /// Collects every value that must win over the restored URL.
    ///
    /// Assignments are parsed against the live filters, so they are checked
    /// against the template the synchroniser was activated with.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`parse_assignments`] and
    /// [`QuerySyncError::IncompleteSort`] for half a sort pair.
    pub fn overrides(&self, filters: &FilterState) -> Result<ConfigOverrides, QuerySyncError> {
        let sort_by = self.sort_spec()?;
        let pagination = self.pagination();
        Ok(ConfigOverrides {
            assignments: parse_assignments(self.set.as_deref().unwrap_or_default(), filters)?,
            sort_by: (!sort_by.is_empty()).then_some(sort_by),
            page: pagination.page,
            items_per_page: pagination.items_per_page,
            tab: self.tab.clone(),
        })
    }
}

/// Configured edits applied after activation has restored the URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    assignments: Vec<(String, FilterValue)>,
    sort_by: Option<SortSpec>,
    page: Option<PageParam>,
    items_per_page: Option<PageParam>,
    tab: Option<String>,
}

impl ConfigOverrides {
    /// Returns true when nothing was configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
            && self.sort_by.is_none()
            && self.page.is_none()
            && self.items_per_page.is_none()
            && self.tab.is_none()
    }

    /// Writes the configured values into `state`.
    pub fn apply(self, state: &mut TableState) {
        for (key, value) in self.assignments {
            state.filters.set(&key, value);
        }
        if let Some(sort_by) = self.sort_by {
            state.sort_by = sort_by;
        }
        if let Some(page) = self.page {
            state.pagination.page = Some(page);
        }
        if let Some(items_per_page) = self.items_per_page {
            state.pagination.items_per_page = Some(items_per_page);
        }
        if self.tab.is_some() {
            state.active_tab = self.tab;
        }
    }
}
