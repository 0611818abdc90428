//! Utility functions exposed to Python.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use tracing_subscriber::EnvFilter;

/// Returns the crate version string (e.g., for scripting or diagnostics).
#[pyfunction]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Routes core log events to stderr.
///
/// `filter` uses `RUST_LOG` syntax (e.g. `"rvrob_core=debug"`); `None` reads `RUST_LOG`.
/// Only the first successful call installs a subscriber; later calls return `False`.
///
/// # Errors
/// Returns a `ValueError` if `filter` cannot be parsed.
#[pyfunction]
#[pyo3(signature = (filter=None))]
pub fn init_logging(filter: Option<&str>) -> PyResult<bool> {
    let filter = match filter {
        Some(directives) => {
            EnvFilter::try_new(directives).map_err(|e| PyValueError::new_err(e.to_string()))?
        }
        None => EnvFilter::from_default_env(),
    };
    Ok(tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok())
}
