//! Scheduled event types
//!
//! An `Event` is a unit of work for the engine: at `time`, handle `kind`,
//! possibly for a specific patient. Events are immutable once built.
//!
//! # Design Principles
//!
//! 1. **Time is the only ordering key** the event itself carries; equal-time
//!    ordering is the queue's job (see `EventQueue`)
//! 2. **Well-formed by construction**: patient events always carry a patient,
//!    `Visit` and `Poll` never do

use crate::core::time::SimTime;
use crate::models::patient::PatientId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What an event asks the engine to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    /// Patient walks in; triage will finish later
    Arrival,
    /// Triage finished; assign a class and send to the waiting room
    Triage,
    /// Try to call the most urgent waiting patient into a room
    Visit,
    /// Treatment finished; free the room
    Treated,
    /// Patient has waited the maximum time for their class
    Timeout,
    /// Periodic supervisory check of the waiting room
    Poll,
}

impl EventKind {
    /// Whether events of this kind must name a patient
    pub fn has_patient(self) -> bool {
        matches!(
            self,
            EventKind::Arrival | EventKind::Triage | EventKind::Treated | EventKind::Timeout
        )
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::Arrival => "ARRIVAL",
            EventKind::Triage => "TRIAGE",
            EventKind::Visit => "VISIT",
            EventKind::Treated => "TREATED",
            EventKind::Timeout => "TIMEOUT",
            EventKind::Poll => "POLL",
        };
        f.write_str(name)
    }
}

/// A scheduled unit of work
///
/// # Example
/// ```
/// use er_triage_core_rs::events::{Event, EventKind};
/// use er_triage_core_rs::{PatientId, SimTime};
///
/// let ev = Event::arrival(SimTime::from_hm(8, 0), PatientId::new(1));
/// assert_eq!(ev.kind(), EventKind::Arrival);
/// assert_eq!(ev.patient(), Some(PatientId::new(1)));
///
/// let poll = Event::poll(SimTime::from_hm(8, 5));
/// assert_eq!(poll.patient(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Event {
    time: SimTime,
    kind: EventKind,
    patient: Option<PatientId>,
}

impl Event {
    fn for_patient(time: SimTime, kind: EventKind, patient: PatientId) -> Self {
        Self {
            time,
            kind,
            patient: Some(patient),
        }
    }

    pub fn arrival(time: SimTime, patient: PatientId) -> Self {
        Self::for_patient(time, EventKind::Arrival, patient)
    }

    pub fn triage(time: SimTime, patient: PatientId) -> Self {
        Self::for_patient(time, EventKind::Triage, patient)
    }

    pub fn treated(time: SimTime, patient: PatientId) -> Self {
        Self::for_patient(time, EventKind::Treated, patient)
    }

    pub fn timeout(time: SimTime, patient: PatientId) -> Self {
        Self::for_patient(time, EventKind::Timeout, patient)
    }

    pub fn visit(time: SimTime) -> Self {
        Self {
            time,
            kind: EventKind::Visit,
            patient: None,
        }
    }

    pub fn poll(time: SimTime) -> Self {
        Self {
            time,
            kind: EventKind::Poll,
            patient: None,
        }
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn patient(&self) -> Option<PatientId> {
        self.patient
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.patient {
            Some(patient) => write!(f, "{} {} {}", self.time, self.kind, patient),
            None => write!(f, "{} {}", self.time, self.kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_match_kind_patient_rule() {
        let t = SimTime::from_hm(9, 0);
        let p = PatientId::new(4);

        for ev in [
            Event::arrival(t, p),
            Event::triage(t, p),
            Event::treated(t, p),
            Event::timeout(t, p),
            Event::visit(t),
            Event::poll(t),
        ] {
            assert_eq!(ev.kind().has_patient(), ev.patient().is_some(), "{}", ev);
        }
    }

    #[test]
    fn test_display() {
        let ev = Event::timeout(SimTime::from_hm(10, 5), PatientId::new(12));
        assert_eq!(ev.to_string(), "10:05 TIMEOUT P0012");
        assert_eq!(Event::visit(SimTime::from_hm(8, 0)).to_string(), "08:00 VISIT");
    }
}
