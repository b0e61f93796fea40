//! Error types exposed at the edges of the synchroniser.
//!
//! Restoration and projection never fail. These errors only surface while
//! parsing user input (URLs, filter templates, assignments) or loading
//! configuration for the command-line front end.

use thiserror::Error;

/// Errors surfaced while parsing input or loading configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QuerySyncError {
    /// No URL was supplied to synchronise against.
    #[error("URL is required")]
    MissingUrl,

    /// The provided URL could not be parsed.
    #[error("URL is invalid: {0}")]
    InvalidUrl(String),

    /// A filter template entry did not follow the template syntax.
    #[error("filter template entry is invalid: {entry}")]
    InvalidFilterSpec {
        /// The offending template entry.
        entry: String,
    },

    /// A filter assignment was not of the form `name=value`.
    #[error("filter assignment is invalid: {entry}")]
    InvalidAssignment {
        /// The offending assignment.
        entry: String,
    },

    /// An assignment named a filter the template does not declare.
    #[error("unknown filter: {key}")]
    UnknownFilter {
        /// The undeclared filter key.
        key: String,
    },

    /// Only one half of the sort pair was configured.
    #[error("sort requires both a key and an order")]
    IncompleteSort,

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },

    /// Configuration could not be loaded.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },
}
