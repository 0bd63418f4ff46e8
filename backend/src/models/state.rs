//! Simulation State
//!
//! Represents the world the engine acts on: every patient of the run, the
//! waiting room, the treatment rooms and the outcome counters.
//!
//! # Critical Invariants
//!
//! 1. **Room Bounds**: `0 <= free_rooms <= total_rooms` at all times
//! 2. **Waiting Consistency**: a patient is in the waiting room iff its state
//!    is `Waiting(_)`, and with the same class
//! 3. **Outcome Conservation**: `discharged + abandoned + died` equals the
//!    number of patients in a terminal state
//! 4. **Patient Retention**: patients are never removed during a run

use crate::models::patient::{Patient, PatientId};
use crate::models::waiting_room::WaitingRoom;
use serde::{Deserialize, Serialize};

/// Outcome counters for a run
///
/// Monotonically non-decreasing; reset only on re-initialization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeCounters {
    /// Patients treated and sent home
    pub discharged: usize,
    /// White patients who left before being seen
    pub abandoned: usize,
    /// Red patients who died while waiting
    pub died: usize,
}

impl OutcomeCounters {
    /// Patients who have left the system by any route
    pub fn total(&self) -> usize {
        self.discharged + self.abandoned + self.died
    }
}

/// Complete simulation state
///
/// # Example
///
/// ```rust
/// use er_triage_core_rs::SimulationState;
///
/// let mut state = SimulationState::new(2);
/// assert_eq!(state.free_rooms(), 2);
///
/// assert!(state.occupy_room());
/// assert_eq!(state.free_rooms(), 1);
/// assert!(state.release_room());
/// assert!(!state.release_room()); // already all free
/// ```
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// All patients of the run, indexed by `PatientId::index()`
    patients: Vec<Patient>,

    /// Patients waiting for a room
    waiting_room: WaitingRoom,

    /// Rooms configured for the run
    total_rooms: usize,

    /// Rooms currently idle
    free_rooms: usize,

    outcomes: OutcomeCounters,
}

impl SimulationState {
    /// Create an empty state with all rooms free
    pub fn new(total_rooms: usize) -> Self {
        Self {
            patients: Vec::new(),
            waiting_room: WaitingRoom::new(),
            total_rooms,
            free_rooms: total_rooms,
            outcomes: OutcomeCounters::default(),
        }
    }

    /// Discard everything and start over with a new patient list
    ///
    /// Patients must be numbered 1..=n in order.
    pub fn reset(&mut self, patients: Vec<Patient>, total_rooms: usize) {
        debug_assert!(patients
            .iter()
            .enumerate()
            .all(|(i, p)| p.id().index() == i));

        self.patients = patients;
        self.waiting_room.clear();
        self.total_rooms = total_rooms;
        self.free_rooms = total_rooms;
        self.outcomes = OutcomeCounters::default();
    }

    // ========================================================================
    // Patients
    // ========================================================================

    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }

    pub fn num_patients(&self) -> usize {
        self.patients.len()
    }

    pub fn patient(&self, id: PatientId) -> Option<&Patient> {
        self.patients.get(id.index()).filter(|p| p.id() == id)
    }

    pub(crate) fn patient_mut(&mut self, id: PatientId) -> Option<&mut Patient> {
        self.patients.get_mut(id.index()).filter(|p| p.id() == id)
    }

    // ========================================================================
    // Waiting room
    // ========================================================================

    pub fn waiting_room(&self) -> &WaitingRoom {
        &self.waiting_room
    }

    pub(crate) fn waiting_room_mut(&mut self) -> &mut WaitingRoom {
        &mut self.waiting_room
    }

    // ========================================================================
    // Rooms
    // ========================================================================

    pub fn total_rooms(&self) -> usize {
        self.total_rooms
    }

    pub fn free_rooms(&self) -> usize {
        self.free_rooms
    }

    /// Take a free room. Returns `false` if none is free.
    pub fn occupy_room(&mut self) -> bool {
        if self.free_rooms == 0 {
            return false;
        }
        self.free_rooms -= 1;
        true
    }

    /// Give a room back. Returns `false` if every room is already free.
    pub fn release_room(&mut self) -> bool {
        if self.free_rooms >= self.total_rooms {
            return false;
        }
        self.free_rooms += 1;
        true
    }

    // ========================================================================
    // Outcomes
    // ========================================================================

    pub fn outcomes(&self) -> OutcomeCounters {
        self.outcomes
    }

    pub(crate) fn record_discharge(&mut self) {
        self.outcomes.discharged += 1;
    }

    pub(crate) fn record_abandonment(&mut self) {
        self.outcomes.abandoned += 1;
    }

    pub(crate) fn record_death(&mut self) {
        self.outcomes.died += 1;
    }

    /// Patients not yet in a terminal state
    pub fn num_active(&self) -> usize {
        self.patients
            .iter()
            .filter(|p| !p.state().is_terminal())
            .count()
    }
}
