//! Python bindings for the reorder buffer core.
//!
//! This crate exposes the core to Python via PyO3. It provides:
//! 1. **Reorder Buffer:** `PyRob` for configuration, cycle stepping and introspection.
//! 2. **Statistics:** `PyStats` for counters and selective section printing.
//! 3. **Utilities:** Version string, log setup and conversion helpers for Python↔Rust types.

use pyo3::prelude::*;

/// Python dict to Rust `Config` / port bundle conversion.
pub mod conversion;
/// Reorder buffer binding (`PyRob`).
pub mod rob;
/// Statistics binding (`PyStats`).
pub mod stats;
/// Utility functions (e.g., version).
pub mod utils;

/// Registers all classes and functions onto the given Python module.
///
/// Called from the `#[pymodule]` entry point to expose `PyRob`, `PyStats`, `version`
/// and `init_logging`.
///
/// # Errors
///
/// Returns a `PyErr` if registration fails.
pub fn register_rob_module(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<rob::PyRob>()?;
    m.add_class::<stats::PyStats>()?;

    m.add_function(wrap_pyfunction!(utils::version, m)?)?;
    m.add_function(wrap_pyfunction!(utils::init_logging, m)?)?;

    Ok(())
}

#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    register_rob_module(m)?;
    Ok(())
}
