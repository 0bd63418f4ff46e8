// Invariant checks that need crate-private access to the engine.
//
// Malformed events can only be produced by injecting them directly; the
// handlers must reject them instead of corrupting counters.

use crate::core::time::SimTime;
use crate::events::Event;
use crate::models::patient::{PatientId, PatientState};
use crate::orchestrator::engine::{SimulationConfig, SimulationError, Simulator};

fn small_sim(patients: usize, rooms: usize) -> Simulator {
    let config = SimulationConfig {
        num_patients: patients,
        num_rooms: rooms,
        ..Default::default()
    };
    let mut sim = Simulator::new(config).unwrap();
    sim.initialize();
    sim
}

fn drain_until_error(sim: &mut Simulator) -> SimulationError {
    loop {
        match sim.step() {
            Ok(Some(_)) => continue,
            Ok(None) => panic!("run finished without detecting the violation"),
            Err(e) => return e,
        }
    }
}

#[test]
fn test_treated_for_waiting_patient_is_violation() {
    let mut sim = small_sim(1, 1);
    // Patient 1 arrives at 08:00; claim it finished treatment right away.
    sim.inject(Event::treated(SimTime::from_hm(8, 0), PatientId::new(1)));

    let err = drain_until_error(&mut sim);
    assert!(matches!(err, SimulationError::InvariantViolation { .. }));
    assert!(err.to_string().contains("finished treatment in state NEW"));
    assert_eq!(sim.discharged(), 0);
    assert_eq!(sim.state().free_rooms(), 1);
}

#[test]
fn test_timeout_before_triage_is_violation() {
    let mut sim = small_sim(1, 1);
    sim.inject(Event::timeout(SimTime::from_hm(8, 1), PatientId::new(1)));

    let err = drain_until_error(&mut sim);
    assert!(err.to_string().contains("timed out before triage"));
    assert_eq!(sim.outcomes().total(), 0);
}

#[test]
fn test_second_triage_is_violation() {
    let mut sim = small_sim(1, 0);
    sim.inject(Event::triage(SimTime::from_hm(8, 6), PatientId::new(1)));

    let err = drain_until_error(&mut sim);
    match err {
        SimulationError::InvariantViolation { time, reason, .. } => {
            assert_eq!(time, SimTime::from_hm(8, 6));
            assert!(reason.contains("triaged in state WAITING_WHITE"));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_unknown_patient_is_violation() {
    let mut sim = small_sim(2, 1);
    sim.inject(Event::arrival(SimTime::from_hm(7, 0), PatientId::new(99)));

    let err = drain_until_error(&mut sim);
    assert!(err.to_string().contains("unknown patient P0099"));
}

#[test]
fn test_extra_visit_never_overdraws_rooms() {
    let mut sim = small_sim(3, 1);
    // Several visits at the same instant once patients are waiting.
    for _ in 0..5 {
        sim.inject(Event::visit(SimTime::from_hm(8, 40)));
    }

    while sim.step().unwrap().is_some() {
        assert!(sim.state().free_rooms() <= sim.state().total_rooms());
    }
    assert_eq!(sim.outcomes().total(), 3);
}

#[test]
fn test_waiting_room_matches_patient_states_throughout_run() {
    let mut sim = small_sim(40, 2);

    while sim.step().unwrap().is_some() {
        let state = sim.state();
        for patient in state.patients() {
            let in_room = state.waiting_room().class_of(patient.id());
            assert_eq!(in_room, patient.state().waiting_class(), "{}", patient.id());
        }
        let treating = state
            .patients()
            .iter()
            .filter(|p| p.state() == PatientState::Treating)
            .count();
        assert_eq!(treating + state.free_rooms(), state.total_rooms());
    }
}
