//! Type conversion utilities for FFI boundary
//!
//! Converts between Rust types and PyO3-compatible types (PyDict).

use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::orchestrator::{ClassMinutes, RunSummary, SimulationConfig};
use crate::SimTime;

// ========================================================================
// PyDict Extraction Helpers
// ========================================================================

/// Extract an optional field from a Python dict.
///
/// # Returns
/// `Some(value)` if field exists, `None` if missing
///
/// # Errors
/// Returns error only if type conversion fails (not if field is missing)
fn extract_optional<'py, T>(dict: &Bound<'py, PyDict>, key: &str) -> PyResult<Option<T>>
where
    T: FromPyObject<'py>,
{
    match dict.get_item(key)? {
        Some(value) => Ok(Some(value.extract()?)),
        None => Ok(None),
    }
}

/// Extract a field with a default value if missing.
fn extract_with_default<'py, T>(dict: &Bound<'py, PyDict>, key: &str, default: T) -> PyResult<T>
where
    T: FromPyObject<'py>,
{
    Ok(extract_optional(dict, key)?.unwrap_or(default))
}

// ========================================================================
// Configuration Parsers
// ========================================================================

/// Convert Python dict to SimulationConfig
///
/// Missing keys take their default value. Times are minutes since midnight.
///
/// # Errors
///
/// Returns PyErr if a type conversion fails. Range checks happen in
/// `Simulator::new`.
pub fn parse_simulation_config(py_config: &Bound<'_, PyDict>) -> PyResult<SimulationConfig> {
    let defaults = SimulationConfig::default();

    let treatment_minutes = match py_config.get_item("treatment_minutes")? {
        Some(value) => parse_class_minutes(value.downcast()?, defaults.treatment_minutes)?,
        None => defaults.treatment_minutes,
    };
    let timeout_minutes = match py_config.get_item("timeout_minutes")? {
        Some(value) => parse_class_minutes(value.downcast()?, defaults.timeout_minutes)?,
        None => defaults.timeout_minutes,
    };

    Ok(SimulationConfig {
        num_patients: extract_with_default(py_config, "num_patients", defaults.num_patients)?,
        num_rooms: extract_with_default(py_config, "num_rooms", defaults.num_rooms)?,
        arrival_interval_minutes: extract_with_default(
            py_config,
            "arrival_interval_minutes",
            defaults.arrival_interval_minutes,
        )?,
        opening_time: SimTime::from_minutes(extract_with_default(
            py_config,
            "opening_time",
            defaults.opening_time.minutes(),
        )?),
        closing_time: SimTime::from_minutes(extract_with_default(
            py_config,
            "closing_time",
            defaults.closing_time.minutes(),
        )?),
        poll_interval_minutes: extract_with_default(
            py_config,
            "poll_interval_minutes",
            defaults.poll_interval_minutes,
        )?,
        triage_minutes: extract_with_default(py_config, "triage_minutes", defaults.triage_minutes)?,
        treatment_minutes,
        timeout_minutes,
    })
}

fn parse_class_minutes(dict: &Bound<'_, PyDict>, defaults: ClassMinutes) -> PyResult<ClassMinutes> {
    Ok(ClassMinutes {
        white: extract_with_default(dict, "white", defaults.white)?,
        yellow: extract_with_default(dict, "yellow", defaults.yellow)?,
        red: extract_with_default(dict, "red", defaults.red)?,
    })
}

// ========================================================================
// Result Conversion
// ========================================================================

/// Convert RunSummary to Python dict
pub fn run_summary_to_py(py: Python<'_>, summary: &RunSummary) -> PyResult<Py<PyDict>> {
    let dict = PyDict::new_bound(py);
    dict.set_item("discharged", summary.outcomes.discharged)?;
    dict.set_item("abandoned", summary.outcomes.abandoned)?;
    dict.set_item("died", summary.outcomes.died)?;
    dict.set_item("num_patients", summary.num_patients)?;
    dict.set_item("events_processed", summary.events_processed)?;
    dict.set_item("final_time", summary.final_time.minutes())?;
    Ok(dict.unbind())
}
