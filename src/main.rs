//! Querysync CLI entrypoint.
//!
//! Restores table state from a URL, applies the configured overrides,
//! reconciles and prints the resulting URL.

use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use ortho_config::OrthoConfig;
use querysync::telemetry::{NoopTelemetrySink, StderrJsonlTelemetrySink, TelemetrySink};
use querysync::{MemoryRouter, QuerySyncConfig, QuerySyncError, TableQuerySync};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), QuerySyncError> {
    let config = load_config()?;

    let router = MemoryRouter::parse(config.require_url()?)?;
    let options = config.sync_options()?;
    let telemetry: Arc<dyn TelemetrySink> = if config.telemetry {
        Arc::new(StderrJsonlTelemetrySink)
    } else {
        Arc::new(NoopTelemetrySink)
    };

    let mut sync = TableQuerySync::with_telemetry(options, router, telemetry);
    let overrides = config.overrides(sync.filters())?;
    if !overrides.is_empty() {
        sync.update(|state| overrides.apply(state));
    }

    write_url(sync.router())
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`QuerySyncError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<QuerySyncConfig, QuerySyncError> {
    QuerySyncConfig::load().map_err(|error| QuerySyncError::Configuration {
        message: error.to_string(),
    })
}

fn write_url(router: &MemoryRouter) -> Result<(), QuerySyncError> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", router.url()).map_err(|error| QuerySyncError::Io {
        message: error.to_string(),
    })
}
