//! Reorder buffer Python binding.
//!
//! Exposes the simulator to Python: create from a config dict, step one cycle with a dict
//! of port inputs, replay lists of cycles, and inspect occupancy and statistics.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyList;
use rvrob_core::Simulator;
use rvrob_core::core::pipeline::latches::RobInputs;

use crate::conversion::{py_dict_to_config, py_dict_to_inputs, to_py};
use crate::stats::PyStats;

/// Python-exposed reorder buffer: wraps the `Simulator` for stepping from Python.
#[pyclass]
#[derive(Debug)]
pub struct PyRob {
    pub inner: Simulator,
}

#[pymethods]
impl PyRob {
    /// Creates a reorder buffer from an optional config dict.
    ///
    /// # Errors
    /// Returns a `ValueError` if the dict is malformed or the geometry is rejected.
    #[new]
    #[pyo3(signature = (config_dict=None))]
    fn new(py: Python<'_>, config_dict: Option<&Bound<'_, PyAny>>) -> PyResult<Self> {
        let config = py_dict_to_config(py, config_dict)?;
        let inner = Simulator::new(&config).map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Advances one cycle and returns the outputs as a dict.
    ///
    /// Omitted input keys are inactive, so `tick()` alone is an idle cycle.
    #[pyo3(signature = (inputs=None))]
    pub fn tick(&mut self, py: Python<'_>, inputs: Option<&Bound<'_, PyAny>>) -> PyResult<PyObject> {
        let inputs = py_dict_to_inputs(py, inputs)?;
        let outputs = self.inner.tick(&inputs);
        to_py(py, &outputs)
    }

    /// Replays a list of input dicts and returns one trace dict per cycle.
    pub fn run(&mut self, py: Python<'_>, cycles: &Bound<'_, PyList>) -> PyResult<PyObject> {
        let cycles = cycles
            .iter()
            .map(|cycle| py_dict_to_inputs(py, Some(&cycle)))
            .collect::<PyResult<Vec<RobInputs>>>()?;
        let trace = self.inner.run(&cycles);
        to_py(py, &trace)
    }

    /// Discards every in-flight instruction immediately.
    pub fn flush(&mut self) {
        self.inner.rob.flush();
    }

    /// Clears all state immediately, including stored records.
    pub fn reset(&mut self) {
        self.inner.rob.reset();
    }

    /// Returns the oldest in-flight record as a dict, or `None` when empty.
    pub fn head(&self, py: Python<'_>) -> PyResult<Option<PyObject>> {
        self.inner
            .rob
            .peek_head()
            .map(|record| to_py(py, record))
            .transpose()
    }

    /// Returns every occupied slot as `(tag, record)` in ascending slot order.
    pub fn entries(&self, py: Python<'_>) -> PyResult<Vec<(usize, PyObject)>> {
        self.inner
            .rob
            .state()
            .occupied()
            .map(|(tag, slot)| Ok((tag.0, to_py(py, &slot.record)?)))
            .collect()
    }

    /// Returns the clobber table of the current state as 32 unit names (`"-"` when free).
    pub fn clobber(&self) -> Vec<String> {
        rvrob_core::core::pipeline::hazards::clobber_table(self.inner.rob.state())
            .as_array()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    /// Snapshot of the statistics.
    #[getter]
    fn stats(&self) -> PyStats {
        PyStats::from(self.inner.stats().clone())
    }

    #[getter]
    fn cycle(&self) -> u64 {
        self.inner.cycle()
    }

    #[getter]
    fn capacity(&self) -> usize {
        self.inner.rob.capacity()
    }

    #[getter]
    fn free_slots(&self) -> usize {
        self.inner.rob.free_slots()
    }

    fn is_empty(&self) -> bool {
        self.inner.rob.is_empty()
    }

    fn is_full(&self) -> bool {
        self.inner.rob.is_full()
    }

    fn __len__(&self) -> usize {
        self.inner.rob.len()
    }
}
