//! Python↔Rust conversion.
//!
//! Python dicts are serialized to JSON and deserialized into the core types, and core
//! outputs travel the other way, so the schema is the same one scenario files and the CLI use.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use rvrob_core::config::Config;
use rvrob_core::core::pipeline::latches::RobInputs;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Deserializes any Python object accepted by `json.dumps` into `T`.
fn from_py<T: DeserializeOwned>(py: Python<'_>, obj: &Bound<'_, PyAny>, what: &str) -> PyResult<T> {
    let json = py.import("json")?;
    let text: String = json.getattr("dumps")?.call1((obj,))?.extract()?;
    serde_json::from_str(&text).map_err(|e| PyValueError::new_err(format!("Invalid {what}: {e}")))
}

/// Converts a Python dict to a core `Config`.
///
/// Keys must match the Rust config structure (`general`, `rob`); omitted keys take
/// their defaults. `None` yields `Config::default()`.
///
/// # Errors
///
/// `ValueError` if the dict does not match the schema.
pub fn py_dict_to_config(py: Python<'_>, dict: Option<&Bound<'_, PyAny>>) -> PyResult<Config> {
    match dict {
        Some(dict) if !dict.is_none() => from_py(py, dict, "config"),
        _ => Ok(Config::default()),
    }
}

/// Converts a Python dict to one cycle of inputs. `None` is an idle cycle.
///
/// # Errors
///
/// `ValueError` if the dict does not match the schema.
pub fn py_dict_to_inputs(py: Python<'_>, dict: Option<&Bound<'_, PyAny>>) -> PyResult<RobInputs> {
    match dict {
        Some(dict) if !dict.is_none() => from_py(py, dict, "cycle inputs"),
        _ => Ok(RobInputs::default()),
    }
}

/// Converts a serializable core value into plain Python objects (dicts, lists, ints).
///
/// # Errors
///
/// `ValueError` if serialization fails.
pub fn to_py<T: Serialize>(py: Python<'_>, value: &T) -> PyResult<PyObject> {
    let text = serde_json::to_string(value)
        .map_err(|e| PyValueError::new_err(format!("Cannot export value: {e}")))?;
    let json = py.import("json")?;
    Ok(json.getattr("loads")?.call1((text,))?.unbind())
}
