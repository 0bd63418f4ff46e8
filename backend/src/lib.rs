//! Emergency Room Triage Simulator - Rust Engine
//!
//! Discrete-event simulation of an emergency department with deterministic
//! execution.
//!
//! # Architecture
//!
//! - **core**: Simulated clock values
//! - **models**: Domain types (Patient, WaitingRoom, State, EventLog)
//! - **events**: Scheduled events and the time-ordered event queue
//! - **orchestrator**: Main simulation loop and run reports
//! - **boundary**: Validation of raw parameter input from front ends
//!
//! # Critical Invariants
//!
//! 1. Simulated time only moves by popping the next event
//! 2. Equal-time events are processed in scheduling order (deterministic)
//! 3. `0 <= free_rooms <= total_rooms` at all times
//! 4. `discharged + abandoned + died` never exceeds the patient count

// Module declarations
pub mod boundary;
pub mod core;
pub mod events;
pub mod models;
pub mod orchestrator;

// Re-exports for convenience
pub use boundary::{ConfigError, ConfigErrors, ConfigForm};
pub use core::time::SimTime;
pub use events::{Event, EventKind, EventQueue};
pub use models::{
    event::{EventLog, LoggedEvent},
    patient::{Patient, PatientId, PatientState, TriageClass},
    state::{OutcomeCounters, SimulationState},
    waiting_room::WaitingRoom,
};
pub use orchestrator::{
    ClassMinutes, PatientSnapshot, RunReport, RunSummary, SimulationConfig, SimulationError,
    Simulator,
};

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn er_triage_core_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ffi::simulator::PySimulator>()?;
    Ok(())
}
