//! Run Report - serializable results of a simulation run
//!
//! Captures the configuration, its fingerprint, the outcome counters and the
//! final record of every patient, so results can be exported as JSON and
//! traced back to the exact inputs that produced them.
//!
//! # Critical Invariants
//!
//! - **Config Matching**: `config_hash` is the SHA-256 of the canonical JSON
//!   form of `config`; equal configs always hash equally
//! - **Completeness**: one `PatientSnapshot` per patient, in id order

use crate::core::time::SimTime;
use crate::models::patient::{Patient, PatientId, PatientState, TriageClass};
use crate::models::state::OutcomeCounters;
use crate::orchestrator::engine::{SimulationConfig, SimulationError, Simulator};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

// ============================================================================
// Report Structures
// ============================================================================

/// Complete run report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Configuration the run used
    pub config: SimulationConfig,

    /// SHA256 hash of the configuration
    pub config_hash: String,

    pub outcomes: OutcomeCounters,

    /// Events handled so far
    pub events_processed: usize,

    /// Time of the last handled event
    pub final_time: SimTime,

    /// Whether the event queue has drained
    pub finished: bool,

    pub patients: Vec<PatientSnapshot>,
}

/// Final record of one patient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientSnapshot {
    pub id: PatientId,
    pub arrival_time: SimTime,
    pub state: PatientState,
    pub triage_class: Option<TriageClass>,
    pub treatment_started: Option<SimTime>,
    pub exited_at: Option<SimTime>,
    pub minutes_waited: Option<u64>,
}

impl From<&Patient> for PatientSnapshot {
    fn from(patient: &Patient) -> Self {
        PatientSnapshot {
            id: patient.id(),
            arrival_time: patient.arrival_time(),
            state: patient.state(),
            triage_class: patient.triage_class(),
            treatment_started: patient.treatment_started(),
            exited_at: patient.exited_at(),
            minutes_waited: patient.minutes_waited(),
        }
    }
}

impl RunReport {
    /// Build a report from the simulator's current state
    pub fn from_simulator(sim: &Simulator) -> Result<Self, SimulationError> {
        Ok(RunReport {
            config: sim.config().clone(),
            config_hash: sim.config().config_hash()?,
            outcomes: sim.outcomes(),
            events_processed: sim.events_processed(),
            final_time: sim.now(),
            finished: sim.is_finished(),
            patients: sim.state().patients().iter().map(PatientSnapshot::from).collect(),
        })
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> Result<String, SimulationError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SimulationError::SerializationError(format!("Report serialization failed: {}", e)))
    }

    /// Mean minutes from arrival to treatment for patients of a triage class
    ///
    /// Only patients who actually started treatment are counted.
    pub fn mean_wait_minutes(&self, class: TriageClass) -> Option<f64> {
        let waits: Vec<u64> = self
            .patients
            .iter()
            .filter(|p| p.triage_class == Some(class) && p.treatment_started.is_some())
            .filter_map(|p| p.minutes_waited)
            .collect();

        if waits.is_empty() {
            None
        } else {
            Some(waits.iter().sum::<u64>() as f64 / waits.len() as f64)
        }
    }
}

// ============================================================================
// Config Hashing
// ============================================================================

/// Compute SHA256 hash of a configuration
///
/// Keys are sorted before hashing so the result does not depend on field
/// or map ordering.
pub fn compute_config_hash<T: Serialize>(config: &T) -> Result<String, SimulationError> {
    use serde_json::Value;
    use std::collections::BTreeMap;

    let value = serde_json::to_value(config).map_err(|e| {
        SimulationError::SerializationError(format!("Config serialization failed: {}", e))
    })?;

    fn canonicalize(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let sorted: BTreeMap<String, Value> =
                    map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
                Value::Object(sorted.into_iter().collect())
            }
            Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
            other => other,
        }
    }

    let json = serde_json::to_string(&canonicalize(value)).map_err(|e| {
        SimulationError::SerializationError(format!("Config serialization failed: {}", e))
    })?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_hash_deterministic() {
        let a = compute_config_hash(&SimulationConfig::default()).unwrap();
        let b = compute_config_hash(&SimulationConfig::default()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_config_hash_changes_with_config() {
        let base = SimulationConfig::default();
        let more_rooms = SimulationConfig {
            num_rooms: base.num_rooms + 1,
            ..base.clone()
        };
        assert_ne!(
            compute_config_hash(&base).unwrap(),
            compute_config_hash(&more_rooms).unwrap()
        );
    }

    #[test]
    fn test_snapshot_from_new_patient() {
        let patient = Patient::new(PatientId::new(9), SimTime::from_hm(10, 0));
        let snapshot = PatientSnapshot::from(&patient);
        assert_eq!(snapshot.state, PatientState::New);
        assert_eq!(snapshot.minutes_waited, None);
    }
}
