//! Domain models for the triage simulator

pub mod event;
pub mod patient;
pub mod state;
pub mod waiting_room;

// Re-exports
pub use event::{EventLog, LoggedEvent};
pub use patient::{Patient, PatientId, PatientState, TriageClass};
pub use state::{OutcomeCounters, SimulationState};
pub use waiting_room::WaitingRoom;
