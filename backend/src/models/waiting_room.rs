//! Waiting Room - severity-ordered patient queue
//!
//! Patients are served by severity first (RED before YELLOW before WHITE)
//! and by order of entry within a class.
//!
//! # Structure
//!
//! - `ordered`: `BTreeMap<(Reverse(rank), seq), PatientId>` - the first entry
//!   is always the next patient to call in: O(log n) insert and pop
//! - `by_patient`: `HashMap<PatientId, key>` - O(1) lookup of a patient's key,
//!   so timeouts can remove a specific patient in O(log n)
//!
//! Both maps always hold exactly the same set of patients.
//!
//! # Usage
//!
//! ```rust
//! use er_triage_core_rs::models::waiting_room::WaitingRoom;
//! use er_triage_core_rs::{PatientId, TriageClass};
//!
//! let mut room = WaitingRoom::new();
//! room.insert(PatientId::new(1), TriageClass::White);
//! room.insert(PatientId::new(2), TriageClass::Red);
//!
//! assert_eq!(room.pop_highest(), Some((PatientId::new(2), TriageClass::Red)));
//! assert_eq!(room.pop_highest(), Some((PatientId::new(1), TriageClass::White)));
//! assert!(room.is_empty());
//! ```

use crate::models::patient::{PatientId, TriageClass};
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

type SlotKey = (Reverse<u8>, u64);

/// A waiting patient's position in the queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Slot {
    key: SlotKey,
    class: TriageClass,
}

/// Severity-ordered waiting room with remove-by-identity
#[derive(Debug, Clone, Default)]
pub struct WaitingRoom {
    ordered: BTreeMap<SlotKey, PatientId>,
    by_patient: HashMap<PatientId, Slot>,
    next_seq: u64,
}

impl WaitingRoom {
    /// Create an empty waiting room
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a patient behind everyone already waiting in the same class
    ///
    /// Returns `false` (and changes nothing) if the patient is already waiting.
    pub fn insert(&mut self, patient: PatientId, class: TriageClass) -> bool {
        if self.by_patient.contains_key(&patient) {
            return false;
        }

        let key = (Reverse(class.rank()), self.next_seq);
        self.next_seq += 1;

        self.ordered.insert(key, patient);
        self.by_patient.insert(patient, Slot { key, class });
        true
    }

    /// Remove and return the next patient to treat
    pub fn pop_highest(&mut self) -> Option<(PatientId, TriageClass)> {
        let (_, patient) = self.ordered.pop_first()?;
        let slot = self.by_patient.remove(&patient)?;
        Some((patient, slot.class))
    }

    /// Next patient to treat, without removing it
    pub fn peek_highest(&self) -> Option<(PatientId, TriageClass)> {
        let (_, patient) = self.ordered.first_key_value()?;
        self.by_patient.get(patient).map(|slot| (*patient, slot.class))
    }

    /// Remove a specific patient, returning the class they were waiting with
    pub fn remove(&mut self, patient: PatientId) -> Option<TriageClass> {
        let slot = self.by_patient.remove(&patient)?;
        self.ordered.remove(&slot.key);
        Some(slot.class)
    }

    /// Move a waiting patient to a new class
    ///
    /// The patient re-enters at the back of the new class. Returns the old
    /// class, or `None` if the patient was not waiting.
    pub fn reprioritize(&mut self, patient: PatientId, class: TriageClass) -> Option<TriageClass> {
        let old = self.remove(patient)?;
        self.insert(patient, class);
        Some(old)
    }

    /// Class a patient is currently waiting with
    pub fn class_of(&self, patient: PatientId) -> Option<TriageClass> {
        self.by_patient.get(&patient).map(|slot| slot.class)
    }

    pub fn contains(&self, patient: PatientId) -> bool {
        self.by_patient.contains_key(&patient)
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Number of patients waiting with the given class
    pub fn count_of(&self, class: TriageClass) -> usize {
        self.by_patient.values().filter(|slot| slot.class == class).count()
    }

    /// Patients in service order
    pub fn iter(&self) -> impl Iterator<Item = PatientId> + '_ {
        self.ordered.values().copied()
    }

    /// Remove everyone and restart the insertion sequence
    pub fn clear(&mut self) {
        self.ordered.clear();
        self.by_patient.clear();
        self.next_seq = 0;
    }
}
