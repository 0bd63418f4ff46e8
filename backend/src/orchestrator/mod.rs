//! Orchestrator - the simulation engine and its results
//!
//! See `engine.rs` for the event loop and `report.rs` for exported results.

pub mod engine;
pub mod report;

#[cfg(test)]
mod tests;

// Re-export main types for convenience
pub use engine::{ClassMinutes, RunSummary, SimulationConfig, SimulationError, Simulator};
pub use report::{compute_config_hash, PatientSnapshot, RunReport};
