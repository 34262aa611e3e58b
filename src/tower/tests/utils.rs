use crate::config::TowerConfig;
use crate::flight::{Flight, FlightKey};
use crate::time::Time;
use crate::tower::Tower;
use chrono::{NaiveDate, TimeDelta};
use proptest::prelude::Strategy;
use proptest::prop_oneof;
use proptest::strategy::Just;

/// Fixed "now" for all tower tests: 14 March 2025, 06:00.
pub fn now() -> Time {
    Time::at(NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(), 6, 0).unwrap()
}

pub fn minutes_after_now(minutes: i64) -> Time {
    now() + TimeDelta::minutes(minutes)
}

pub fn tower() -> Tower {
    Tower::new(TowerConfig::default())
}

pub fn tower_with_runways(runways: u16) -> Tower {
    Tower::new(TowerConfig {
        runways,
        ..TowerConfig::default()
    })
}

pub fn add_flight(tower: &mut Tower, number: &str, destination: &str, time: &str, emergency: bool) -> FlightKey {
    tower
        .add_flight(number, destination, time, emergency, now())
        .unwrap();
    tower.history().len() - 1
}

/// The six flights of the classic demo: three normal, three emergency.
pub fn demo_flights(tower: &mut Tower) {
    add_flight(tower, "AA101", "LAX", "23:00", false);
    add_flight(tower, "BA202", "LHR", "08:00", false);
    add_flight(tower, "DL303", "SFO", "10:30", false);
    add_flight(tower, "EM404", "CDG", "22:45", true);
    add_flight(tower, "EM505", "NRT", "21:15", true);
    add_flight(tower, "EM606", "FRA", "22:00", true);
}

pub fn numbers<'a>(flights: impl Iterator<Item = &'a Flight>) -> Vec<String> {
    flights.map(|f| f.number.to_string()).collect()
}

pub fn runway_numbers(tower: &Tower) -> Vec<Option<String>> {
    tower
        .runways()
        .iter()
        .map(|r| {
            r.current_flight()
                .and_then(|k| tower.flight(k))
                .map(|f| f.number.to_string())
        })
        .collect()
}

pub fn arb_number() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("FL_1"),
        Just("FL_2"),
        Just("FL_3"),
        Just("FL_4"),
    ]
}

pub fn arb_time_of_day() -> impl Strategy<Value = String> {
    (0..24u32, 0..60u32).prop_map(|(h, m)| format!("{:02}:{:02}", h, m))
}
