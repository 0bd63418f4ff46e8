//! Parameter boundary for front ends
//!
//! Front ends (a form, the CLI, Python) hand over raw text for the three
//! editable parameters. This module turns that text into simulator settings:
//!
//! - blank or `0` keeps the current value
//! - a positive integer replaces it
//! - anything else is rejected with a `ConfigError` and the field keeps its
//!   current value
//!
//! Each field is applied on its own, so one bad field never blocks the
//! others.
//!
//! # Example
//!
//! ```rust
//! use er_triage_core_rs::boundary::ConfigForm;
//! use er_triage_core_rs::Simulator;
//!
//! let mut sim = Simulator::default();
//! let form = ConfigForm::new("20", "", "abc");
//!
//! let result = form.apply(&mut sim);
//! assert!(result.is_err());
//! assert_eq!(sim.num_patients(), 20); // applied
//! assert_eq!(sim.num_rooms(), 3); // blank: kept
//! assert_eq!(sim.arrival_interval_minutes(), 15); // rejected: kept
//! ```

use crate::orchestrator::engine::Simulator;
use std::fmt;
use thiserror::Error;

/// Editable parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    PatientCount,
    RoomCount,
    ArrivalInterval,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::PatientCount => "patient count",
            Field::RoomCount => "room count",
            Field::ArrivalInterval => "arrival interval",
        };
        f.write_str(name)
    }
}

/// Rejected input for one field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{field}: '{input}' is not a whole number")]
    NotANumber { field: Field, input: String },

    #[error("{field}: {value} is negative")]
    Negative { field: Field, value: i64 },

    #[error("{field}: {value} is too large")]
    OutOfRange { field: Field, value: i64 },
}

impl ConfigError {
    pub fn field(&self) -> Field {
        match self {
            ConfigError::NotANumber { field, .. }
            | ConfigError::Negative { field, .. }
            | ConfigError::OutOfRange { field, .. } => *field,
        }
    }
}

/// Every field rejected by one `ConfigForm::apply`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid configuration: {}", join_errors(.0))]
pub struct ConfigErrors(pub Vec<ConfigError>);

fn join_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Parse one raw field
///
/// Returns `Ok(None)` for blank or zero (keep current value).
///
/// # Example
///
/// ```rust
/// use er_triage_core_rs::boundary::{parse_positive, Field};
///
/// assert_eq!(parse_positive(Field::RoomCount, " 4 "), Ok(Some(4)));
/// assert_eq!(parse_positive(Field::RoomCount, "0"), Ok(None));
/// assert_eq!(parse_positive(Field::RoomCount, ""), Ok(None));
/// assert!(parse_positive(Field::RoomCount, "-2").is_err());
/// assert!(parse_positive(Field::RoomCount, "2.5").is_err());
/// ```
pub fn parse_positive(field: Field, raw: &str) -> Result<Option<u64>, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let value: i64 = trimmed.parse().map_err(|_| ConfigError::NotANumber {
        field,
        input: trimmed.to_string(),
    })?;

    match value {
        v if v < 0 => Err(ConfigError::Negative { field, value: v }),
        0 => Ok(None),
        v => Ok(Some(v as u64)),
    }
}

/// Raw parameter text as entered by the user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigForm {
    pub patients: String,
    pub rooms: String,
    pub arrival_interval: String,
}

impl ConfigForm {
    pub fn new(
        patients: impl Into<String>,
        rooms: impl Into<String>,
        arrival_interval: impl Into<String>,
    ) -> Self {
        Self {
            patients: patients.into(),
            rooms: rooms.into(),
            arrival_interval: arrival_interval.into(),
        }
    }

    /// Fill the form from the simulator's current parameters
    pub fn from_simulator(sim: &Simulator) -> Self {
        Self {
            patients: sim.num_patients().to_string(),
            rooms: sim.num_rooms().to_string(),
            arrival_interval: sim.arrival_interval_minutes().to_string(),
        }
    }

    /// Apply every valid field to the simulator
    ///
    /// Changes take effect on the next `initialize()`.
    pub fn apply(&self, sim: &mut Simulator) -> Result<(), ConfigErrors> {
        let mut errors = Vec::new();

        match parse_positive(Field::PatientCount, &self.patients) {
            Ok(Some(n)) => {
                let applied = usize::try_from(n)
                    .ok()
                    .and_then(|n| sim.set_num_patients(n).ok());
                if applied.is_none() {
                    errors.push(ConfigError::OutOfRange {
                        field: Field::PatientCount,
                        value: n as i64,
                    });
                }
            }
            Ok(None) => {}
            Err(e) => errors.push(e),
        }

        match parse_positive(Field::RoomCount, &self.rooms) {
            Ok(Some(n)) => match usize::try_from(n) {
                Ok(rooms) => sim.set_num_rooms(rooms),
                Err(_) => errors.push(ConfigError::OutOfRange {
                    field: Field::RoomCount,
                    value: n as i64,
                }),
            },
            Ok(None) => {}
            Err(e) => errors.push(e),
        }

        match parse_positive(Field::ArrivalInterval, &self.arrival_interval) {
            Ok(Some(minutes)) => {
                if sim.set_arrival_interval_minutes(minutes).is_err() {
                    errors.push(ConfigError::OutOfRange {
                        field: Field::ArrivalInterval,
                        value: minutes as i64,
                    });
                }
            }
            Ok(None) => {}
            Err(e) => errors.push(e),
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigErrors(errors))
        }
    }
}
