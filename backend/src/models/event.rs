//! Event logging for simulation auditing.
//!
//! `LoggedEvent` records every state change the engine makes, in the order
//! it makes them. The log enables:
//! - Debugging (see exactly when a patient was called in or gave up)
//! - Auditing (check counters against individual outcomes)
//! - Analysis (waiting times per class, room utilisation)
//!
//! The log is distinct from the scheduled `events::Event` values that drive
//! the simulation: those are work to do, these are things that happened.
//!
//! # Example
//!
//! ```rust
//! use er_triage_core_rs::models::event::{EventLog, LoggedEvent};
//! use er_triage_core_rs::{PatientId, SimTime, TriageClass};
//!
//! let mut log = EventLog::new();
//! log.log(LoggedEvent::Triaged {
//!     time: SimTime::from_hm(8, 5),
//!     patient: PatientId::new(1),
//!     class: TriageClass::White,
//! });
//!
//! assert_eq!(log.events_of_type("Triaged").len(), 1);
//! ```

use crate::core::time::SimTime;
use crate::models::patient::{PatientId, TriageClass};
use serde::{Deserialize, Serialize};

/// Something that happened during a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LoggedEvent {
    /// Patient walked in
    Arrived { time: SimTime, patient: PatientId },

    /// Patient was assigned a class and entered the waiting room
    Triaged {
        time: SimTime,
        patient: PatientId,
        class: TriageClass,
    },

    /// Patient was called into a treatment room
    TreatmentStarted {
        time: SimTime,
        patient: PatientId,
        class: TriageClass,
        free_rooms: usize,
    },

    /// Patient finished treatment and left
    Discharged {
        time: SimTime,
        patient: PatientId,
        free_rooms: usize,
    },

    /// White patient gave up waiting
    Abandoned { time: SimTime, patient: PatientId },

    /// Yellow patient waited too long and became red
    Escalated {
        time: SimTime,
        patient: PatientId,
        from: TriageClass,
        to: TriageClass,
    },

    /// Red patient died waiting
    Died { time: SimTime, patient: PatientId },

    /// Timeout fired for a patient no longer waiting
    StaleTimeout { time: SimTime, patient: PatientId },

    /// Poll found waiting patients and a free room
    PollTriggeredVisit {
        time: SimTime,
        waiting: usize,
        free_rooms: usize,
    },

    /// Poll fired at or after closing time and did not reschedule
    PollingStopped { time: SimTime },
}

impl LoggedEvent {
    /// Simulated time of the event
    pub fn time(&self) -> SimTime {
        match self {
            LoggedEvent::Arrived { time, .. } => *time,
            LoggedEvent::Triaged { time, .. } => *time,
            LoggedEvent::TreatmentStarted { time, .. } => *time,
            LoggedEvent::Discharged { time, .. } => *time,
            LoggedEvent::Abandoned { time, .. } => *time,
            LoggedEvent::Escalated { time, .. } => *time,
            LoggedEvent::Died { time, .. } => *time,
            LoggedEvent::StaleTimeout { time, .. } => *time,
            LoggedEvent::PollTriggeredVisit { time, .. } => *time,
            LoggedEvent::PollingStopped { time } => *time,
        }
    }

    /// Short name of the event type
    pub fn event_type(&self) -> &'static str {
        match self {
            LoggedEvent::Arrived { .. } => "Arrived",
            LoggedEvent::Triaged { .. } => "Triaged",
            LoggedEvent::TreatmentStarted { .. } => "TreatmentStarted",
            LoggedEvent::Discharged { .. } => "Discharged",
            LoggedEvent::Abandoned { .. } => "Abandoned",
            LoggedEvent::Escalated { .. } => "Escalated",
            LoggedEvent::Died { .. } => "Died",
            LoggedEvent::StaleTimeout { .. } => "StaleTimeout",
            LoggedEvent::PollTriggeredVisit { .. } => "PollTriggeredVisit",
            LoggedEvent::PollingStopped { .. } => "PollingStopped",
        }
    }

    /// Patient the event concerns, if any
    pub fn patient(&self) -> Option<PatientId> {
        match self {
            LoggedEvent::Arrived { patient, .. }
            | LoggedEvent::Triaged { patient, .. }
            | LoggedEvent::TreatmentStarted { patient, .. }
            | LoggedEvent::Discharged { patient, .. }
            | LoggedEvent::Abandoned { patient, .. }
            | LoggedEvent::Escalated { patient, .. }
            | LoggedEvent::Died { patient, .. }
            | LoggedEvent::StaleTimeout { patient, .. } => Some(*patient),
            LoggedEvent::PollTriggeredVisit { .. } | LoggedEvent::PollingStopped { .. } => None,
        }
    }
}

/// Event log for storing and querying what happened in a run.
///
/// This is a simple wrapper around Vec<LoggedEvent> with convenience methods.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<LoggedEvent>,
}

impl EventLog {
    /// Create a new empty event log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Add an event to the log
    pub fn log(&mut self, event: LoggedEvent) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Get all events
    pub fn events(&self) -> &[LoggedEvent] {
        &self.events
    }

    /// Get events at a specific time
    pub fn events_at(&self, time: SimTime) -> Vec<&LoggedEvent> {
        self.events.iter().filter(|e| e.time() == time).collect()
    }

    /// Get events of a specific type
    pub fn events_of_type(&self, event_type: &str) -> Vec<&LoggedEvent> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Get events for a specific patient
    pub fn events_for_patient(&self, patient: PatientId) -> Vec<&LoggedEvent> {
        self.events
            .iter()
            .filter(|e| e.patient() == Some(patient))
            .collect()
    }

    /// Clear all events
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_time_and_patient() {
        let event = LoggedEvent::Escalated {
            time: SimTime::from_hm(10, 0),
            patient: PatientId::new(7),
            from: TriageClass::Yellow,
            to: TriageClass::Red,
        };

        assert_eq!(event.time(), SimTime::from_hm(10, 0));
        assert_eq!(event.patient(), Some(PatientId::new(7)));
        assert_eq!(event.event_type(), "Escalated");
    }

    #[test]
    fn test_queries() {
        let mut log = EventLog::new();
        let p1 = PatientId::new(1);
        let p2 = PatientId::new(2);
        let t = SimTime::from_hm(8, 0);

        log.log(LoggedEvent::Arrived { time: t, patient: p1 });
        log.log(LoggedEvent::Arrived { time: t.plus_minutes(15), patient: p2 });
        log.log(LoggedEvent::Abandoned { time: t.plus_minutes(125), patient: p1 });
        log.log(LoggedEvent::PollingStopped { time: SimTime::from_hm(20, 0) });

        assert_eq!(log.len(), 4);
        assert_eq!(log.events_for_patient(p1).len(), 2);
        assert_eq!(log.events_of_type("Arrived").len(), 2);
        assert_eq!(log.events_at(t).len(), 1);

        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn test_serializes_with_type_tag() {
        let event = LoggedEvent::Died {
            time: SimTime::from_minutes(600),
            patient: PatientId::new(3),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "Died");
        assert_eq!(json["time"], 600);
        assert_eq!(json["patient"], 3);
    }
}
