//! Timeout handling: abandonment, escalation and death

use er_triage_core_rs::{
    LoggedEvent, PatientId, PatientState, SimTime, SimulationConfig, Simulator, TriageClass,
};

fn initialized(patients: usize, rooms: usize) -> Simulator {
    let config = SimulationConfig {
        num_patients: patients,
        num_rooms: rooms,
        ..Default::default()
    };
    let mut sim = Simulator::new(config).unwrap();
    sim.initialize();
    sim
}

fn time_of(sim: &Simulator, event_type: &str, patient: PatientId) -> Option<SimTime> {
    sim.event_log()
        .events_for_patient(patient)
        .into_iter()
        .find(|e| e.event_type() == event_type)
        .map(|e| e.time())
}

#[test]
fn test_white_abandons_after_two_hours() {
    let mut sim = initialized(1, 0);
    sim.run().unwrap();

    let p1 = PatientId::new(1);
    assert_eq!(time_of(&sim, "Abandoned", p1), Some(SimTime::from_hm(10, 5)));

    let patient = sim.state().patient(p1).unwrap();
    assert_eq!(patient.state(), PatientState::Out);
    assert_eq!(patient.exited_at(), Some(SimTime::from_hm(10, 5)));
    assert_eq!(sim.abandoned(), 1);
}

#[test]
fn test_yellow_escalates_then_dies_on_red_timeout() {
    let mut sim = initialized(2, 0);
    sim.run().unwrap();

    // P2 is triaged YELLOW at 08:20, escalates after 60 minutes and dies
    // 90 minutes after that.
    let p2 = PatientId::new(2);
    assert_eq!(time_of(&sim, "Triaged", p2), Some(SimTime::from_hm(8, 20)));
    assert_eq!(time_of(&sim, "Escalated", p2), Some(SimTime::from_hm(9, 20)));
    assert_eq!(time_of(&sim, "Died", p2), Some(SimTime::from_hm(10, 50)));

    let patient = sim.state().patient(p2).unwrap();
    assert_eq!(patient.state(), PatientState::Black);
    assert_eq!(patient.triage_class(), Some(TriageClass::Yellow));
    assert_eq!(sim.died(), 1);
    assert_eq!(sim.abandoned(), 1);
}

#[test]
fn test_escalation_logs_both_classes() {
    let mut sim = initialized(2, 0);
    sim.run().unwrap();

    let escalations = sim.event_log().events_of_type("Escalated");
    assert_eq!(escalations.len(), 1);
    assert!(matches!(
        escalations[0],
        LoggedEvent::Escalated {
            from: TriageClass::Yellow,
            to: TriageClass::Red,
            ..
        }
    ));
}

#[test]
fn test_red_dies_after_ninety_minutes() {
    let mut sim = initialized(3, 0);
    sim.run().unwrap();

    let p3 = PatientId::new(3);
    assert_eq!(time_of(&sim, "Triaged", p3), Some(SimTime::from_hm(8, 35)));
    assert_eq!(time_of(&sim, "Died", p3), Some(SimTime::from_hm(10, 5)));
    assert_eq!(
        sim.state().patient(p3).unwrap().state(),
        PatientState::Black
    );
}

#[test]
fn test_escalated_patient_queues_behind_existing_red() {
    let mut sim = initialized(3, 0);

    while sim.event_log().events_of_type("Escalated").is_empty() {
        sim.step().unwrap().expect("run ended before escalation");
    }

    assert_eq!(sim.now(), SimTime::from_hm(9, 20));
    let order: Vec<PatientId> = sim.state().waiting_room().iter().collect();
    assert_eq!(
        order,
        vec![PatientId::new(3), PatientId::new(2), PatientId::new(1)]
    );
    assert_eq!(
        sim.state().patient(PatientId::new(2)).unwrap().state(),
        PatientState::Waiting(TriageClass::Red)
    );
    assert_eq!(sim.state().waiting_room().count_of(TriageClass::Red), 2);
    assert_eq!(sim.state().waiting_room().count_of(TriageClass::Yellow), 0);
}

#[test]
fn test_yellow_treated_in_time_never_escalates() {
    let mut sim = initialized(2, 1);
    sim.run().unwrap();

    let p2 = PatientId::new(2);
    assert_eq!(time_of(&sim, "TreatmentStarted", p2), Some(SimTime::from_hm(8, 20)));
    assert_eq!(time_of(&sim, "StaleTimeout", p2), Some(SimTime::from_hm(9, 20)));
    assert!(sim.event_log().events_of_type("Escalated").is_empty());
    assert_eq!(sim.discharged(), 2);
}

#[test]
fn test_patient_in_treatment_is_not_abandoned() {
    // One room, a WHITE patient occupying it far past the WHITE timeout.
    let config = SimulationConfig {
        num_patients: 1,
        num_rooms: 1,
        treatment_minutes: er_triage_core_rs::ClassMinutes {
            white: 300,
            yellow: 15,
            red: 30,
        },
        ..Default::default()
    };
    let mut sim = Simulator::new(config).unwrap();
    sim.initialize();
    sim.run().unwrap();

    assert_eq!(sim.discharged(), 1);
    assert_eq!(sim.abandoned(), 0);
    assert_eq!(sim.event_log().events_of_type("StaleTimeout").len(), 1);
}
