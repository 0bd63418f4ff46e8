//! Simulator Engine
//!
//! Discrete-event loop driving every patient through the emergency room:
//! - Arrivals at evenly spaced times from opening
//! - Triage with round-robin class assignment
//! - Severity-ordered waiting room
//! - Room allocation on discharge and on periodic polls
//! - Timeout escalation (WHITE abandons, YELLOW → RED, RED dies)
//!
//! # Architecture
//!
//! ```text
//! initialize():
//!   build patients, reset rooms/counters/rotation,
//!   push one ARRIVAL per patient and the first POLL
//!
//! run():
//!   while let Some(ev) = queue.pop():
//!     now = ev.time
//!     ARRIVAL  → schedule TRIAGE
//!     TRIAGE   → assign class, enter waiting room, schedule TIMEOUT
//!     VISIT    → call most urgent patient into a free room, schedule TREATED
//!     TREATED  → discharge, free room, schedule VISIT now
//!     TIMEOUT  → abandon / escalate / die
//!     POLL     → VISIT now if possible, reschedule until closing
//! ```
//!
//! # Example
//!
//! ```rust
//! use er_triage_core_rs::{SimulationConfig, Simulator};
//!
//! let config = SimulationConfig {
//!     num_patients: 10,
//!     num_rooms: 2,
//!     ..Default::default()
//! };
//!
//! let mut sim = Simulator::new(config).unwrap();
//! sim.initialize();
//! let summary = sim.run().unwrap();
//!
//! assert_eq!(summary.outcomes.total(), 10);
//! ```

use crate::core::time::SimTime;
use crate::events::{Event, EventKind, EventQueue};
use crate::models::event::{EventLog, LoggedEvent};
use crate::models::patient::{Patient, PatientId, PatientState, TriageClass};
use crate::models::state::{OutcomeCounters, SimulationState};
use crate::orchestrator::report::{compute_config_hash, RunReport};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, trace};

// ============================================================================
// Configuration Types
// ============================================================================

/// A duration in minutes for each triage class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassMinutes {
    pub white: u64,
    pub yellow: u64,
    pub red: u64,
}

impl ClassMinutes {
    /// Value for the given class
    pub fn get(&self, class: TriageClass) -> u64 {
        match class {
            TriageClass::White => self.white,
            TriageClass::Yellow => self.yellow,
            TriageClass::Red => self.red,
        }
    }
}

/// Complete simulator configuration
///
/// Every field has a default, so a JSON file only needs the fields it
/// changes.
///
/// # Fields
///
/// * `num_patients` - Patients arriving during the run
/// * `num_rooms` - Treatment rooms
/// * `arrival_interval_minutes` - Gap between consecutive arrivals
/// * `opening_time` / `closing_time` - Polling runs from opening until closing
/// * `poll_interval_minutes` - Gap between supervisory polls
/// * `triage_minutes` - Time from arrival to class assignment
/// * `treatment_minutes` - Room occupancy per class
/// * `timeout_minutes` - Maximum wait per class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub num_patients: usize,
    pub num_rooms: usize,
    pub arrival_interval_minutes: u64,
    pub opening_time: SimTime,
    pub closing_time: SimTime,
    pub poll_interval_minutes: u64,
    pub triage_minutes: u64,
    pub treatment_minutes: ClassMinutes,
    pub timeout_minutes: ClassMinutes,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_patients: 50,
            num_rooms: 3,
            arrival_interval_minutes: 15,
            opening_time: SimTime::from_hm(8, 0),
            closing_time: SimTime::from_hm(20, 0),
            poll_interval_minutes: 5,
            triage_minutes: 5,
            treatment_minutes: ClassMinutes {
                white: 10,
                yellow: 15,
                red: 30,
            },
            timeout_minutes: ClassMinutes {
                white: 120,
                yellow: 60,
                red: 90,
            },
        }
    }
}

impl SimulationConfig {
    /// Check every interval and duration is positive and the opening hours
    /// are well-formed
    ///
    /// Patient and room counts may be zero: an empty run or a department
    /// with no rooms are both valid scenarios.
    pub fn validate(&self) -> Result<(), SimulationError> {
        let positive = [
            ("arrival_interval_minutes", self.arrival_interval_minutes),
            ("poll_interval_minutes", self.poll_interval_minutes),
            ("triage_minutes", self.triage_minutes),
        ];
        for (name, value) in positive {
            if value == 0 {
                return Err(SimulationError::InvalidConfig(format!(
                    "{} must be > 0",
                    name
                )));
            }
        }

        for class in TriageClass::ALL {
            if self.treatment_minutes.get(class) == 0 {
                return Err(SimulationError::InvalidConfig(format!(
                    "treatment_minutes for {} must be > 0",
                    class
                )));
            }
            if self.timeout_minutes.get(class) == 0 {
                return Err(SimulationError::InvalidConfig(format!(
                    "timeout_minutes for {} must be > 0",
                    class
                )));
            }
        }

        if self.closing_time <= self.opening_time {
            return Err(SimulationError::InvalidConfig(format!(
                "closing_time {} must be after opening_time {}",
                self.closing_time, self.opening_time
            )));
        }

        if u32::try_from(self.num_patients).is_err() {
            return Err(SimulationError::InvalidConfig(format!(
                "num_patients {} is too large",
                self.num_patients
            )));
        }

        Ok(())
    }

    /// SHA-256 fingerprint of the canonical JSON form
    pub fn config_hash(&self) -> Result<String, SimulationError> {
        compute_config_hash(self)
    }
}

// ============================================================================
// Errors and Results
// ============================================================================

/// Simulation error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// Configuration validation error
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// The engine found itself in a state its own rules cannot produce
    #[error("Invariant violated at {time} while handling {event}: {reason}")]
    InvariantViolation {
        time: SimTime,
        event: Event,
        reason: String,
    },

    /// Report or config serialization failed
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Outcome of a completed run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub outcomes: OutcomeCounters,
    pub num_patients: usize,
    pub events_processed: usize,
    pub final_time: SimTime,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Discharged patients: {}", self.outcomes.discharged)?;
        writeln!(f, "Abandoned patients: {}", self.outcomes.abandoned)?;
        writeln!(f, "Dead patients: {}", self.outcomes.died)
    }
}

// ============================================================================
// Simulator
// ============================================================================

/// Emergency room simulator owning all run state
///
/// Nothing is shared between instances; two simulators can run side by side.
/// A run is only meaningful after `initialize()`; calling `initialize()`
/// again discards the previous run completely.
#[derive(Debug, Clone)]
pub struct Simulator {
    config: SimulationConfig,

    /// Patients, waiting room, rooms and counters
    state: SimulationState,

    /// Pending events
    queue: EventQueue,

    /// Class the next triaged patient receives
    next_triage_class: TriageClass,

    /// Everything that happened in the current run
    event_log: EventLog,

    /// Time of the last processed event
    now: SimTime,

    events_processed: usize,
}

impl Default for Simulator {
    fn default() -> Self {
        Self::build(SimulationConfig::default())
    }
}

impl Simulator {
    /// Create a simulator from a configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Simulator)` - ready for `initialize()`
    /// * `Err(SimulationError::InvalidConfig)` - configuration rejected
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: SimulationConfig) -> Self {
        Self {
            state: SimulationState::new(config.num_rooms),
            queue: EventQueue::new(),
            next_triage_class: TriageClass::White,
            event_log: EventLog::new(),
            now: config.opening_time,
            events_processed: 0,
            config,
        }
    }

    // ========================================================================
    // Parameters
    // ========================================================================

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn num_patients(&self) -> usize {
        self.config.num_patients
    }

    pub fn num_rooms(&self) -> usize {
        self.config.num_rooms
    }

    pub fn arrival_interval_minutes(&self) -> u64 {
        self.config.arrival_interval_minutes
    }

    /// Takes effect on the next `initialize()`
    pub fn set_num_patients(&mut self, num_patients: usize) -> Result<(), SimulationError> {
        if u32::try_from(num_patients).is_err() {
            return Err(SimulationError::InvalidConfig(format!(
                "num_patients {} is too large",
                num_patients
            )));
        }
        self.config.num_patients = num_patients;
        Ok(())
    }

    /// Takes effect on the next `initialize()`
    pub fn set_num_rooms(&mut self, num_rooms: usize) {
        self.config.num_rooms = num_rooms;
    }

    /// Takes effect on the next `initialize()`
    pub fn set_arrival_interval_minutes(&mut self, minutes: u64) -> Result<(), SimulationError> {
        if minutes == 0 {
            return Err(SimulationError::InvalidConfig(
                "arrival_interval_minutes must be > 0".to_string(),
            ));
        }
        self.config.arrival_interval_minutes = minutes;
        Ok(())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn event_queue(&self) -> &EventQueue {
        &self.queue
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    pub fn now(&self) -> SimTime {
        self.now
    }

    pub fn next_triage_class(&self) -> TriageClass {
        self.next_triage_class
    }

    pub fn events_processed(&self) -> usize {
        self.events_processed
    }

    pub fn outcomes(&self) -> OutcomeCounters {
        self.state.outcomes()
    }

    pub fn discharged(&self) -> usize {
        self.state.outcomes().discharged
    }

    pub fn abandoned(&self) -> usize {
        self.state.outcomes().abandoned
    }

    pub fn died(&self) -> usize {
        self.state.outcomes().died
    }

    /// True once every event has been processed
    pub fn is_finished(&self) -> bool {
        self.queue.is_empty()
    }

    /// Counters and progress as of now
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            outcomes: self.state.outcomes(),
            num_patients: self.state.num_patients(),
            events_processed: self.events_processed,
            final_time: self.now,
        }
    }

    /// Full serializable report of the current run
    pub fn report(&self) -> Result<RunReport, SimulationError> {
        RunReport::from_simulator(self)
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Reset everything and seed the queue for a fresh run
    ///
    /// Patients arrive every `arrival_interval_minutes` starting at opening.
    /// The first poll fires one `poll_interval_minutes` after opening.
    pub fn initialize(&mut self) {
        let opening = self.config.opening_time;
        let interval = self.config.arrival_interval_minutes;

        let patients: Vec<Patient> = (0..self.config.num_patients)
            .map(|i| {
                let arrival = opening.plus_minutes(interval.saturating_mul(i as u64));
                Patient::new(PatientId::new(i as u32 + 1), arrival)
            })
            .collect();

        self.queue.clear();
        for patient in &patients {
            self.queue.push(Event::arrival(patient.arrival_time(), patient.id()));
        }
        self.queue
            .push(Event::poll(opening.plus_minutes(self.config.poll_interval_minutes)));

        self.state.reset(patients, self.config.num_rooms);
        self.next_triage_class = TriageClass::White;
        self.event_log.clear();
        self.now = opening;
        self.events_processed = 0;

        debug!(
            patients = self.config.num_patients,
            rooms = self.config.num_rooms,
            queued = self.queue.len(),
            "simulation initialized"
        );
    }

    /// Process events until the queue is empty
    ///
    /// # Returns
    ///
    /// * `Ok(RunSummary)` - final counters
    /// * `Err(SimulationError::InvariantViolation)` - run aborted; state is
    ///   left as it was when the violation was detected
    #[tracing::instrument(skip(self), fields(patients = self.config.num_patients, rooms = self.config.num_rooms))]
    pub fn run(&mut self) -> Result<RunSummary, SimulationError> {
        while self.step()?.is_some() {}

        let summary = self.summary();
        info!(
            discharged = summary.outcomes.discharged,
            abandoned = summary.outcomes.abandoned,
            died = summary.outcomes.died,
            events = summary.events_processed,
            final_time = %summary.final_time,
            "simulation finished"
        );
        Ok(summary)
    }

    /// Process exactly one event
    ///
    /// Returns the event handled, or `None` if the queue was already empty.
    pub fn step(&mut self) -> Result<Option<Event>, SimulationError> {
        let Some(event) = self.queue.pop() else {
            return Ok(None);
        };

        self.now = event.time();
        trace!(event = %event, remaining = self.queue.len(), "dispatch");

        match event.kind() {
            EventKind::Arrival => self.handle_arrival(&event)?,
            EventKind::Triage => self.handle_triage(&event)?,
            EventKind::Visit => self.handle_visit(&event)?,
            EventKind::Treated => self.handle_treated(&event)?,
            EventKind::Timeout => self.handle_timeout(&event)?,
            EventKind::Poll => self.handle_poll(&event),
        }

        self.events_processed += 1;
        Ok(Some(event))
    }

    // ========================================================================
    // Event Handlers
    // ========================================================================

    fn handle_arrival(&mut self, event: &Event) -> Result<(), SimulationError> {
        let (patient, state) = self.patient_for(event)?;
        if state != PatientState::New {
            return Err(self.violation(event, format!("{} arrived in state {}", patient, state)));
        }

        self.event_log.log(LoggedEvent::Arrived {
            time: self.now,
            patient,
        });
        self.queue.push(Event::triage(
            self.now.plus_minutes(self.config.triage_minutes),
            patient,
        ));
        Ok(())
    }

    fn handle_triage(&mut self, event: &Event) -> Result<(), SimulationError> {
        let (patient, state) = self.patient_for(event)?;
        if state != PatientState::New {
            return Err(self.violation(event, format!("{} triaged in state {}", patient, state)));
        }

        let class = self.next_triage_class;
        self.next_triage_class = class.next_in_rotation();

        if !self.state.waiting_room_mut().insert(patient, class) {
            return Err(self.violation(event, format!("{} already in waiting room", patient)));
        }
        self.update_patient(event, patient, |p| p.triage(class))?;

        self.queue.push(Event::timeout(
            self.now.plus_minutes(self.config.timeout_minutes.get(class)),
            patient,
        ));
        self.event_log.log(LoggedEvent::Triaged {
            time: self.now,
            patient,
            class,
        });
        debug!(%patient, %class, time = %self.now, "triaged");
        Ok(())
    }

    fn handle_visit(&mut self, event: &Event) -> Result<(), SimulationError> {
        if self.state.free_rooms() == 0 {
            trace!(time = %self.now, "visit skipped: no free room");
            return Ok(());
        }
        let Some((patient, class)) = self.state.waiting_room_mut().pop_highest() else {
            trace!(time = %self.now, "visit skipped: waiting room empty");
            return Ok(());
        };

        let state = self.patient_state(event, patient)?;
        if state != PatientState::Waiting(class) {
            return Err(self.violation(
                event,
                format!("{} queued as {} but in state {}", patient, class, state),
            ));
        }

        if !self.state.occupy_room() {
            return Err(self.violation(event, "no room to occupy".to_string()));
        }
        let now = self.now;
        self.update_patient(event, patient, |p| p.start_treatment(now))?;

        self.queue.push(Event::treated(
            now.plus_minutes(self.config.treatment_minutes.get(class)),
            patient,
        ));
        self.event_log.log(LoggedEvent::TreatmentStarted {
            time: now,
            patient,
            class,
            free_rooms: self.state.free_rooms(),
        });
        debug!(%patient, %class, time = %now, free_rooms = self.state.free_rooms(), "treatment started");
        Ok(())
    }

    fn handle_treated(&mut self, event: &Event) -> Result<(), SimulationError> {
        let (patient, state) = self.patient_for(event)?;
        if state != PatientState::Treating {
            return Err(self.violation(
                event,
                format!("{} finished treatment in state {}", patient, state),
            ));
        }

        if !self.state.release_room() {
            return Err(self.violation(event, "released a room that was already free".to_string()));
        }
        let now = self.now;
        self.update_patient(event, patient, |p| p.exit(PatientState::Out, now))?;
        self.state.record_discharge();

        self.queue.push(Event::visit(now));
        self.event_log.log(LoggedEvent::Discharged {
            time: now,
            patient,
            free_rooms: self.state.free_rooms(),
        });
        debug!(%patient, time = %now, "discharged");
        Ok(())
    }

    fn handle_timeout(&mut self, event: &Event) -> Result<(), SimulationError> {
        let (patient, state) = self.patient_for(event)?;
        let now = self.now;

        let class = match state {
            PatientState::Waiting(class) => class,
            PatientState::Treating | PatientState::Out | PatientState::Black => {
                self.event_log.log(LoggedEvent::StaleTimeout { time: now, patient });
                trace!(%patient, %state, time = %now, "stale timeout ignored");
                return Ok(());
            }
            PatientState::New => {
                return Err(self.violation(event, format!("{} timed out before triage", patient)));
            }
        };

        if self.state.waiting_room().class_of(patient) != Some(class) {
            return Err(self.violation(
                event,
                format!("{} is {} but not waiting with that class", patient, state),
            ));
        }

        match class {
            TriageClass::White => {
                self.state.waiting_room_mut().remove(patient);
                self.update_patient(event, patient, |p| p.exit(PatientState::Out, now))?;
                self.state.record_abandonment();
                self.event_log.log(LoggedEvent::Abandoned { time: now, patient });
                debug!(%patient, time = %now, "abandoned");
            }
            TriageClass::Yellow => {
                let escalated = TriageClass::Red;
                self.state.waiting_room_mut().reprioritize(patient, escalated);
                self.update_patient(event, patient, |p| p.escalate(escalated))?;
                self.queue.push(Event::timeout(
                    now.plus_minutes(self.config.timeout_minutes.get(escalated)),
                    patient,
                ));
                self.event_log.log(LoggedEvent::Escalated {
                    time: now,
                    patient,
                    from: class,
                    to: escalated,
                });
                debug!(%patient, time = %now, "escalated to RED");
            }
            TriageClass::Red => {
                self.state.waiting_room_mut().remove(patient);
                self.update_patient(event, patient, |p| p.exit(PatientState::Black, now))?;
                self.state.record_death();
                self.event_log.log(LoggedEvent::Died { time: now, patient });
                debug!(%patient, time = %now, "died waiting");
            }
        }
        Ok(())
    }

    fn handle_poll(&mut self, _event: &Event) {
        let now = self.now;
        let waiting = self.state.waiting_room().len();
        let free_rooms = self.state.free_rooms();

        if waiting > 0 && free_rooms > 0 {
            self.queue.push(Event::visit(now));
            self.event_log.log(LoggedEvent::PollTriggeredVisit {
                time: now,
                waiting,
                free_rooms,
            });
        }

        if now < self.config.closing_time {
            self.queue
                .push(Event::poll(now.plus_minutes(self.config.poll_interval_minutes)));
        } else {
            self.event_log.log(LoggedEvent::PollingStopped { time: now });
            debug!(time = %now, "polling stopped after closing time");
        }
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    /// Push an arbitrary event, bypassing the handlers' scheduling rules
    #[cfg(test)]
    pub(crate) fn inject(&mut self, event: Event) {
        self.queue.push(event);
    }

    /// Patient named by a patient event, with its current state
    fn patient_for(&self, event: &Event) -> Result<(PatientId, PatientState), SimulationError> {
        let patient = event
            .patient()
            .ok_or_else(|| self.violation(event, "event carries no patient".to_string()))?;
        let state = self.patient_state(event, patient)?;
        Ok((patient, state))
    }

    fn patient_state(&self, event: &Event, patient: PatientId) -> Result<PatientState, SimulationError> {
        self.state
            .patient(patient)
            .map(Patient::state)
            .ok_or_else(|| self.violation(event, format!("unknown patient {}", patient)))
    }

    fn update_patient(
        &mut self,
        event: &Event,
        patient: PatientId,
        update: impl FnOnce(&mut Patient),
    ) -> Result<(), SimulationError> {
        match self.state.patient_mut(patient) {
            Some(p) => {
                update(p);
                Ok(())
            }
            None => Err(self.violation(event, format!("unknown patient {}", patient))),
        }
    }

    fn violation(&self, event: &Event, reason: String) -> SimulationError {
        SimulationError::InvariantViolation {
            time: self.now,
            event: *event,
            reason,
        }
    }
}
