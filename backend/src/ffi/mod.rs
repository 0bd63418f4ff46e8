//! Python bindings (feature `pyo3`)
//!
//! Exposes the configure / initialize / run / read-results contract to
//! Python front ends.

pub mod simulator;
pub mod types;
