//! Statistics Python binding.
//!
//! Exposes reorder buffer statistics to Python: getters for each counter, `print` /
//! `print_sections` for human-readable output, and `to_dict` for scripted experiments.

use pyo3::prelude::*;
use rvrob_core::stats::RobStats;

/// Python-exposed statistics: wraps `RobStats` for read and print from Python.
#[pyclass]
#[derive(Clone, Debug)]
pub struct PyStats {
    pub inner: RobStats,
}

#[pymethods]
impl PyStats {
    /// Print all stats (full dump).
    fn print(&self) {
        self.inner.print();
    }

    /// Print only the given sections. Options: "summary", "occupancy", "hazards".
    /// Pass an empty list for full dump.
    fn print_sections(&self, sections: Vec<String>) {
        self.inner.print_sections(&sections);
    }

    #[getter]
    fn cycles(&self) -> u64 {
        self.inner.cycles
    }
    #[getter]
    fn dispatched(&self) -> u64 {
        self.inner.dispatched
    }
    #[getter]
    fn committed(&self) -> u64 {
        self.inner.committed
    }
    #[getter]
    fn completions(&self) -> u64 {
        self.inner.completions
    }
    #[getter]
    fn stale_completions(&self) -> u64 {
        self.inner.stale_completions
    }
    #[getter]
    fn flushes(&self) -> u64 {
        self.inner.flushes
    }
    #[getter]
    fn resets(&self) -> u64 {
        self.inner.resets
    }
    #[getter]
    fn stalls_full(&self) -> u64 {
        self.inner.stalls_full
    }
    #[getter]
    fn stalls_branch(&self) -> u64 {
        self.inner.stalls_branch
    }
    #[getter]
    fn operands_forwarded(&self) -> u64 {
        self.inner.operands_forwarded
    }
    #[getter]
    fn violations(&self) -> u64 {
        self.inner.violations
    }
    #[getter]
    fn peak_occupancy(&self) -> usize {
        self.inner.peak_occupancy
    }
    #[getter]
    fn ipc(&self) -> f64 {
        self.inner.ipc()
    }
    #[getter]
    fn average_occupancy(&self) -> f64 {
        self.inner.average_occupancy()
    }

    /// Export all stats as a Python dict.
    fn to_dict(&self, py: Python<'_>) -> PyResult<Py<pyo3::types::PyDict>> {
        let d = pyo3::types::PyDict::new(py);
        let s = &self.inner;
        d.set_item("cycles", s.cycles)?;
        d.set_item("dispatched", s.dispatched)?;
        d.set_item("committed", s.committed)?;
        d.set_item("completions", s.completions)?;
        d.set_item("stale_completions", s.stale_completions)?;
        d.set_item("flushes", s.flushes)?;
        d.set_item("resets", s.resets)?;
        d.set_item("stalls_full", s.stalls_full)?;
        d.set_item("stalls_branch", s.stalls_branch)?;
        d.set_item("operands_forwarded", s.operands_forwarded)?;
        d.set_item("violations", s.violations)?;
        d.set_item("peak_occupancy", s.peak_occupancy)?;
        d.set_item("average_occupancy", s.average_occupancy())?;
        d.set_item("ipc", s.ipc())?;
        Ok(d.into())
    }
}

impl From<RobStats> for PyStats {
    fn from(inner: RobStats) -> Self {
        Self { inner }
    }
}
