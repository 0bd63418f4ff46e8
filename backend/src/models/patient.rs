//! Patient model
//!
//! Represents one person arriving at the emergency room.
//! Each patient has:
//! - A sequence id (1-based, assigned at creation)
//! - An arrival time
//! - A lifecycle state (New → Waiting{class} → Treating → Out, or Black)
//! - Timeline fields filled in as the run progresses (for reporting)
//!
//! Only the engine mutates patients. The setters below are crate-private.

use crate::core::time::SimTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Triage severity class
///
/// Ordered by urgency: `White < Yellow < Red`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriageClass {
    /// Minor: abandons the waiting room on timeout
    White,
    /// Urgent: escalates to red on timeout
    Yellow,
    /// Critical: dies on timeout
    Red,
}

impl TriageClass {
    /// All classes in rotation order
    pub const ALL: [TriageClass; 3] = [TriageClass::White, TriageClass::Yellow, TriageClass::Red];

    /// Severity rank used by the waiting room (higher is treated first)
    ///
    /// # Example
    /// ```
    /// use er_triage_core_rs::TriageClass;
    ///
    /// assert!(TriageClass::Red.rank() > TriageClass::Yellow.rank());
    /// assert!(TriageClass::Yellow.rank() > TriageClass::White.rank());
    /// ```
    pub fn rank(self) -> u8 {
        match self {
            TriageClass::White => 1,
            TriageClass::Yellow => 2,
            TriageClass::Red => 3,
        }
    }

    /// Next class in the triage rotation (White → Yellow → Red → White)
    pub fn next_in_rotation(self) -> TriageClass {
        match self {
            TriageClass::White => TriageClass::Yellow,
            TriageClass::Yellow => TriageClass::Red,
            TriageClass::Red => TriageClass::White,
        }
    }

    /// Waiting state corresponding to this class
    pub fn waiting_state(self) -> PatientState {
        PatientState::Waiting(self)
    }
}

impl fmt::Display for TriageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TriageClass::White => "WHITE",
            TriageClass::Yellow => "YELLOW",
            TriageClass::Red => "RED",
        };
        f.write_str(name)
    }
}

/// Lifecycle state of a patient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "state", content = "class", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PatientState {
    /// Arrived, not yet triaged
    New,
    /// In the waiting room with the given class
    Waiting(TriageClass),
    /// Occupying a treatment room
    Treating,
    /// Left the system (discharged or abandoned)
    Out,
    /// Died while waiting
    Black,
}

impl PatientState {
    /// True for `Out` and `Black`
    pub fn is_terminal(self) -> bool {
        matches!(self, PatientState::Out | PatientState::Black)
    }

    /// Waiting class, if the patient is in the waiting room
    pub fn waiting_class(self) -> Option<TriageClass> {
        match self {
            PatientState::Waiting(class) => Some(class),
            _ => None,
        }
    }
}

impl fmt::Display for PatientState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatientState::New => f.write_str("NEW"),
            PatientState::Waiting(class) => write!(f, "WAITING_{}", class),
            PatientState::Treating => f.write_str("TREATING"),
            PatientState::Out => f.write_str("OUT"),
            PatientState::Black => f.write_str("BLACK"),
        }
    }
}

/// Patient sequence number (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatientId(u32);

impl PatientId {
    /// Wrap a raw sequence number
    pub const fn new(id: u32) -> Self {
        PatientId(id)
    }

    /// Raw sequence number
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Position of this patient in the engine's patient list
    pub(crate) fn index(self) -> usize {
        (self.0 as usize).saturating_sub(1)
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{:04}", self.0)
    }
}

/// A patient record
///
/// # Example
/// ```
/// use er_triage_core_rs::{Patient, PatientId, PatientState, SimTime};
///
/// let p = Patient::new(PatientId::new(1), SimTime::from_hm(8, 0));
/// assert_eq!(p.state(), PatientState::New);
/// assert_eq!(p.triage_class(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    id: PatientId,
    arrival_time: SimTime,
    state: PatientState,

    /// Class assigned at triage (before any escalation)
    triage_class: Option<TriageClass>,

    /// When the patient entered a treatment room
    treatment_started: Option<SimTime>,

    /// When the patient reached `Out` or `Black`
    exited_at: Option<SimTime>,
}

impl Patient {
    /// Create a freshly arrived patient in state `New`
    pub fn new(id: PatientId, arrival_time: SimTime) -> Self {
        Self {
            id,
            arrival_time,
            state: PatientState::New,
            triage_class: None,
            treatment_started: None,
            exited_at: None,
        }
    }

    pub fn id(&self) -> PatientId {
        self.id
    }

    pub fn arrival_time(&self) -> SimTime {
        self.arrival_time
    }

    pub fn state(&self) -> PatientState {
        self.state
    }

    pub fn triage_class(&self) -> Option<TriageClass> {
        self.triage_class
    }

    pub fn treatment_started(&self) -> Option<SimTime> {
        self.treatment_started
    }

    pub fn exited_at(&self) -> Option<SimTime> {
        self.exited_at
    }

    /// Minutes spent between arrival and entering treatment (or exit)
    pub fn minutes_waited(&self) -> Option<u64> {
        self.treatment_started
            .or(self.exited_at)
            .map(|t| t.minutes_since(self.arrival_time))
    }

    pub(crate) fn triage(&mut self, class: TriageClass) {
        self.triage_class = Some(class);
        self.state = PatientState::Waiting(class);
    }

    pub(crate) fn escalate(&mut self, class: TriageClass) {
        self.state = PatientState::Waiting(class);
    }

    pub(crate) fn start_treatment(&mut self, now: SimTime) {
        self.state = PatientState::Treating;
        self.treatment_started = Some(now);
    }

    pub(crate) fn exit(&mut self, state: PatientState, now: SimTime) {
        debug_assert!(state.is_terminal());
        self.state = state;
        self.exited_at = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_cycles_through_all_classes() {
        let mut class = TriageClass::White;
        let mut seen = Vec::new();
        for _ in 0..6 {
            seen.push(class);
            class = class.next_in_rotation();
        }
        assert_eq!(
            seen,
            vec![
                TriageClass::White,
                TriageClass::Yellow,
                TriageClass::Red,
                TriageClass::White,
                TriageClass::Yellow,
                TriageClass::Red,
            ]
        );
    }

    #[test]
    fn test_state_display() {
        assert_eq!(PatientState::Waiting(TriageClass::Yellow).to_string(), "WAITING_YELLOW");
        assert_eq!(PatientState::Black.to_string(), "BLACK");
    }

    #[test]
    fn test_lifecycle_timeline() {
        let mut p = Patient::new(PatientId::new(3), SimTime::from_hm(8, 30));
        p.triage(TriageClass::Red);
        assert_eq!(p.state().waiting_class(), Some(TriageClass::Red));

        p.start_treatment(SimTime::from_hm(9, 0));
        assert_eq!(p.minutes_waited(), Some(30));

        p.exit(PatientState::Out, SimTime::from_hm(9, 30));
        assert!(p.state().is_terminal());
        assert_eq!(p.exited_at(), Some(SimTime::from_hm(9, 30)));
        assert_eq!(p.triage_class(), Some(TriageClass::Red));
    }

    #[test]
    fn test_patient_id_index_is_zero_based() {
        assert_eq!(PatientId::new(1).index(), 0);
        assert_eq!(PatientId::new(42).index(), 41);
    }
}
