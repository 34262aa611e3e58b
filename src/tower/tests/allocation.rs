use crate::flight::FlightStatus::{Departed, RunwayAssigned, Scheduled};
use crate::runway::RunwayId;
use crate::tower::AllocationOutcome::{Assigned, FullyOccupied, NothingWaiting};
use crate::tower::tests::utils::{
    add_flight, demo_flights, minutes_after_now, now, numbers, runway_numbers, tower, tower_with_runways,
};
use chrono::TimeDelta;

#[test]
fn test_nothing_waiting() {
    let mut tower = tower();
    let report = tower.allocate_runways(now());
    assert_eq!(NothingWaiting, report.outcome);
    assert!(report.departed.is_empty());
}

#[test]
fn test_emergencies_take_all_runways() {
    let mut tower = tower();
    demo_flights(&mut tower);
    tower.schedule_flights();

    let report = tower.allocate_runways(now());
    let Assigned(assignments) = report.outcome else {
        panic!("expected assignments");
    };
    assert_eq!(
        vec![
            ("EM505", RunwayId(1)),
            ("EM606", RunwayId(2)),
            ("EM404", RunwayId(3)),
        ],
        assignments
            .iter()
            .map(|a| (&*a.number, a.runway))
            .collect::<Vec<_>>()
    );
    assert_eq!(
        vec![Some("EM505".to_string()), Some("EM606".to_string()), Some("EM404".to_string())],
        runway_numbers(&tower)
    );
    assert_eq!(vec!["BA202", "DL303", "AA101"], numbers(tower.scheduled()));

    for a in &assignments {
        let flight = tower.flight(a.flight).unwrap();
        assert_eq!(RunwayAssigned, flight.status);
        assert_eq!(Some(a.runway), flight.assigned_runway);
        assert!(flight.is_emergency);
    }
}

#[test]
fn test_fully_occupied_reports_soonest_departure() {
    let mut tower = tower();
    demo_flights(&mut tower);
    tower.schedule_flights();
    tower.allocate_runways(now());

    let report = tower.allocate_runways(now());
    // EM505 departs at 21:15, fifteen and a quarter hours from now
    assert_eq!(FullyOccupied { wait_minutes: 915.0 }, report.outcome);
    assert_eq!(3, tower.scheduled().count());
}

#[test]
fn test_fully_occupied_wins_over_empty_list() {
    let mut tower = tower_with_runways(1);
    add_flight(&mut tower, "E1", "LAX", "06:10", true);
    tower.schedule_flights();
    tower.allocate_runways(now());

    let report = tower.allocate_runways(minutes_after_now(4));
    assert_eq!(FullyOccupied { wait_minutes: 6.0 }, report.outcome);
}

#[test]
fn test_partial_allocation_keeps_order() {
    let mut tower = tower_with_runways(2);
    add_flight(&mut tower, "N1", "LAX", "09:00", false);
    add_flight(&mut tower, "N2", "LAX", "10:00", false);
    add_flight(&mut tower, "N3", "LAX", "11:00", false);
    tower.schedule_flights();

    let report = tower.allocate_runways(now());
    let Assigned(assignments) = report.outcome else {
        panic!("expected assignments");
    };
    assert_eq!(2, assignments.len());
    assert_eq!(vec!["N3"], numbers(tower.scheduled()));
    assert_eq!(Scheduled, tower.scheduled().next().unwrap().status);
}

#[test]
fn test_departed_flights_free_their_runways() {
    let mut tower = tower_with_runways(2);
    add_flight(&mut tower, "E1", "LAX", "07:00", true);
    add_flight(&mut tower, "E2", "LAX", "08:00", true);
    add_flight(&mut tower, "N1", "LAX", "09:00", false);
    tower.schedule_flights();
    tower.allocate_runways(now());
    assert_eq!(vec!["N1"], numbers(tower.scheduled()));

    // E1 is due at 07:00 exactly
    let report = tower.allocate_runways(now() + TimeDelta::hours(1));

    assert_eq!(1, report.departed.len());
    assert_eq!("E1", &*report.departed[0].number);
    assert_eq!(RunwayId(1), report.departed[0].runway);

    let e1 = tower.flight(report.departed[0].flight).unwrap();
    assert_eq!(Departed, e1.status);
    assert_eq!(Some(RunwayId(1)), e1.assigned_runway);

    let Assigned(assignments) = report.outcome else {
        panic!("expected assignments");
    };
    assert_eq!(1, assignments.len());
    assert_eq!(("N1", RunwayId(1)), (&*assignments[0].number, assignments[0].runway));
    assert_eq!(vec![Some("N1".to_string()), Some("E2".to_string())], runway_numbers(&tower));
}

#[test]
fn test_departed_flights_leave_tracking() {
    let mut tower = tower_with_runways(1);
    add_flight(&mut tower, "E1", "LAX", "07:00", true);
    tower.schedule_flights();
    tower.allocate_runways(now());

    let report = tower.allocate_runways(now() + TimeDelta::hours(2));
    assert_eq!(NothingWaiting, report.outcome);
    assert_eq!(1, tower.runways().free_count());
    assert_eq!(0, tower.scheduled().count());
    assert_eq!(0, tower.cancelled().count());
    assert_eq!(1, tower.history().len());
}

#[test]
fn test_no_preemption_of_held_runways() {
    let mut tower = tower_with_runways(1);
    add_flight(&mut tower, "N1", "LAX", "09:00", false);
    tower.schedule_flights();
    tower.allocate_runways(now());

    add_flight(&mut tower, "E1", "LAX", "07:00", true);
    tower.schedule_flights();
    let report = tower.allocate_runways(now());

    assert!(matches!(report.outcome, FullyOccupied { .. }));
    assert_eq!(vec![Some("N1".to_string())], runway_numbers(&tower));
    assert_eq!(vec!["E1"], numbers(tower.scheduled()));
}
