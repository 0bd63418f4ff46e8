//! Property tests over the parameter space

use er_triage_core_rs::{
    EventKind, LoggedEvent, PatientState, SimulationConfig, Simulator, TriageClass,
};
use proptest::prelude::*;

fn simulator(patients: usize, rooms: usize, interval: u64) -> Simulator {
    let config = SimulationConfig {
        num_patients: patients,
        num_rooms: rooms,
        arrival_interval_minutes: interval,
        ..Default::default()
    };
    let mut sim = Simulator::new(config).unwrap();
    sim.initialize();
    sim
}

proptest! {
    #[test]
    fn prop_initial_queue_holds_one_arrival_per_patient(
        patients in 0usize..40,
        rooms in 0usize..5,
        interval in 1u64..30,
    ) {
        let sim = simulator(patients, rooms, interval);
        let queued = sim.event_queue().ordered();

        let arrivals = queued.iter().filter(|e| e.kind() == EventKind::Arrival).count();
        let polls = queued.iter().filter(|e| e.kind() == EventKind::Poll).count();
        prop_assert_eq!(arrivals, patients);
        prop_assert_eq!(polls, 1);
        prop_assert_eq!(queued.len(), patients + 1);
    }

    #[test]
    fn prop_time_never_goes_backwards(
        patients in 0usize..40,
        rooms in 0usize..5,
        interval in 1u64..30,
    ) {
        let mut sim = simulator(patients, rooms, interval);
        let mut last = sim.now();

        while let Some(event) = sim.step().unwrap() {
            prop_assert!(event.time() >= last);
            last = event.time();
        }
    }

    #[test]
    fn prop_counters_bounded_and_complete(
        patients in 0usize..40,
        rooms in 0usize..5,
        interval in 1u64..30,
    ) {
        let mut sim = simulator(patients, rooms, interval);

        while sim.step().unwrap().is_some() {
            let state = sim.state();
            prop_assert!(state.free_rooms() <= state.total_rooms());
            prop_assert!(sim.outcomes().total() <= patients);
        }

        prop_assert_eq!(sim.outcomes().total(), patients);
        prop_assert_eq!(sim.state().free_rooms(), rooms);
        prop_assert!(sim.state().waiting_room().is_empty());
        prop_assert!(sim.state().patients().iter().all(|p| p.state().is_terminal()));
    }

    #[test]
    fn prop_triage_classes_rotate(
        patients in 1usize..40,
        rooms in 0usize..5,
        interval in 1u64..30,
    ) {
        let mut sim = simulator(patients, rooms, interval);
        sim.run().unwrap();

        let classes: Vec<TriageClass> = sim
            .event_log()
            .events()
            .iter()
            .filter_map(|e| match e {
                LoggedEvent::Triaged { class, .. } => Some(*class),
                _ => None,
            })
            .collect();
        let expected: Vec<TriageClass> =
            TriageClass::ALL.iter().copied().cycle().take(patients).collect();
        prop_assert_eq!(classes, expected);
    }

    #[test]
    fn prop_initialize_is_idempotent(
        patients in 0usize..40,
        rooms in 0usize..5,
        interval in 1u64..30,
    ) {
        let mut sim = simulator(patients, rooms, interval);
        let first = sim.event_queue().ordered();

        sim.run().unwrap();
        sim.initialize();

        prop_assert_eq!(sim.event_queue().ordered(), first);
        prop_assert_eq!(sim.outcomes().total(), 0);
        prop_assert_eq!(sim.next_triage_class(), TriageClass::White);
        prop_assert!(sim.state().patients().iter().all(|p| p.state() == PatientState::New));
    }

    #[test]
    fn prop_waiting_room_serves_most_urgent_first(
        patients in 1usize..40,
        rooms in 1usize..5,
        interval in 1u64..30,
    ) {
        let mut sim = simulator(patients, rooms, interval);

        while sim.step().unwrap().is_some() {
            let room = sim.state().waiting_room();
            let ranks: Vec<u8> = room
                .iter()
                .filter_map(|p| room.class_of(p))
                .map(TriageClass::rank)
                .collect();
            prop_assert!(ranks.windows(2).all(|w| w[0] >= w[1]));
        }
    }
}
