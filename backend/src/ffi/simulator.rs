//! PyO3 wrapper for Simulator
//!
//! This module provides the Python interface to the Rust simulator.

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use super::types::{parse_simulation_config, run_summary_to_py};
use crate::boundary::ConfigForm;
use crate::orchestrator::Simulator as RustSimulator;

/// Python wrapper for Rust Simulator
///
/// # Example (from Python)
///
/// ```python
/// from er_triage_core_rs import Simulator
///
/// sim = Simulator({"num_rooms": 2})
/// sim.configure("40", "", "10")
/// sim.initialize()
/// result = sim.run()
/// print(f"{result['discharged']} discharged, {result['died']} died")
/// ```
#[pyclass(name = "Simulator")]
pub struct PySimulator {
    inner: RustSimulator,
}

#[pymethods]
impl PySimulator {
    /// Create a simulator, optionally overriding defaults from a dict
    ///
    /// # Errors
    ///
    /// Raises ValueError if the configuration is rejected.
    #[new]
    #[pyo3(signature = (config = None))]
    fn new(config: Option<&Bound<'_, PyDict>>) -> PyResult<Self> {
        let inner = match config {
            Some(dict) => {
                let rust_config = parse_simulation_config(dict)?;
                RustSimulator::new(rust_config).map_err(|e| PyValueError::new_err(e.to_string()))?
            }
            None => RustSimulator::default(),
        };
        Ok(PySimulator { inner })
    }

    /// Apply raw form text (blank or "0" keeps the current value)
    ///
    /// Valid fields are applied even when another field is rejected.
    ///
    /// # Errors
    ///
    /// Raises ValueError listing every rejected field.
    fn configure(&mut self, patients: &str, rooms: &str, arrival_interval: &str) -> PyResult<()> {
        ConfigForm::new(patients, rooms, arrival_interval)
            .apply(&mut self.inner)
            .map_err(|e| PyValueError::new_err(e.to_string()))
    }

    /// Reset and seed a fresh run
    fn initialize(&mut self) {
        self.inner.initialize();
    }

    /// Run to completion and return the outcome counters
    ///
    /// # Errors
    ///
    /// Raises RuntimeError if the engine detects an invariant violation.
    fn run(&mut self, py: Python<'_>) -> PyResult<Py<PyDict>> {
        let summary = self
            .inner
            .run()
            .map_err(|e| PyRuntimeError::new_err(format!("Simulation failed: {}", e)))?;
        run_summary_to_py(py, &summary)
    }

    /// Counters of the current run
    fn results(&self, py: Python<'_>) -> PyResult<Py<PyDict>> {
        run_summary_to_py(py, &self.inner.summary())
    }

    /// Full run report as a JSON string
    fn report_json(&self) -> PyResult<String> {
        self.inner
            .report()
            .and_then(|report| report.to_json())
            .map_err(|e| PyRuntimeError::new_err(e.to_string()))
    }

    #[getter]
    fn num_patients(&self) -> usize {
        self.inner.num_patients()
    }

    #[setter]
    fn set_num_patients(&mut self, value: usize) -> PyResult<()> {
        self.inner
            .set_num_patients(value)
            .map_err(|e| PyValueError::new_err(e.to_string()))
    }

    #[getter]
    fn num_rooms(&self) -> usize {
        self.inner.num_rooms()
    }

    #[setter]
    fn set_num_rooms(&mut self, value: usize) {
        self.inner.set_num_rooms(value);
    }

    #[getter]
    fn arrival_interval(&self) -> u64 {
        self.inner.arrival_interval_minutes()
    }

    #[setter]
    fn set_arrival_interval(&mut self, value: u64) -> PyResult<()> {
        self.inner
            .set_arrival_interval_minutes(value)
            .map_err(|e| PyValueError::new_err(e.to_string()))
    }

    #[getter]
    fn discharged(&self) -> usize {
        self.inner.discharged()
    }

    #[getter]
    fn abandoned(&self) -> usize {
        self.inner.abandoned()
    }

    #[getter]
    fn died(&self) -> usize {
        self.inner.died()
    }
}
