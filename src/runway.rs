use crate::flight::{Flight, FlightKey};
use crate::time::Time;
use std::fmt;
use tabled::Tabled;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunwayId(pub u16);

impl fmt::Display for RunwayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single exclusive slot. Availability is derived from occupancy.
#[derive(Debug, Clone, PartialEq)]
pub struct Runway {
    pub id: RunwayId,
    current: Option<FlightKey>,
}

impl Runway {
    pub fn new(id: RunwayId) -> Self {
        Runway { id, current: None }
    }

    pub fn is_available(&self) -> bool {
        self.current.is_none()
    }

    pub fn current_flight(&self) -> Option<FlightKey> {
        self.current
    }

    fn assign(&mut self, flight: FlightKey) -> bool {
        if self.current.is_some() {
            return false;
        }
        self.current = Some(flight);
        true
    }

    fn release(&mut self) -> Option<FlightKey> {
        self.current.take()
    }
}

#[derive(Tabled)]
pub struct RunwayRow {
    #[tabled(rename = "Runway")]
    pub runway: String,
    #[tabled(rename = "Status")]
    pub status: String,
    #[tabled(rename = "Flight")]
    pub flight: String,
    #[tabled(rename = "Departure")]
    pub departure: String,
}

/// Fixed set of runways, numbered from 1.
#[derive(Debug, Clone)]
pub struct RunwayPool {
    runways: Vec<Runway>,
}

impl RunwayPool {
    pub fn new(count: u16) -> Self {
        let runways = (1..=count).map(|i| Runway::new(RunwayId(i))).collect();
        RunwayPool { runways }
    }

    pub fn len(&self) -> usize {
        self.runways.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Runway> {
        self.runways.iter()
    }

    pub fn get(&self, id: RunwayId) -> Option<&Runway> {
        self.index_of(id).map(|i| &self.runways[i])
    }

    fn index_of(&self, id: RunwayId) -> Option<usize> {
        self.runways.iter().position(|r| r.id == id)
    }

    /// Occupies runway `id` with `flight` if it is free.
    pub fn assign(&mut self, id: RunwayId, flight: FlightKey) -> bool {
        match self.index_of(id) {
            Some(i) => self.runways[i].assign(flight),
            None => false,
        }
    }

    pub fn release(&mut self, id: RunwayId) -> Option<FlightKey> {
        self.index_of(id).and_then(|i| self.runways[i].release())
    }

    pub fn first_free(&self) -> Option<RunwayId> {
        self.runways.iter().find(|r| r.is_available()).map(|r| r.id)
    }

    pub fn free_count(&self) -> usize {
        self.runways.iter().filter(|r| r.is_available()).count()
    }

    pub fn all_occupied(&self) -> bool {
        self.runways.iter().all(|r| !r.is_available())
    }

    /// Lowest-numbered runway whose flight satisfies `pred`.
    pub fn find_occupied(&self, mut pred: impl FnMut(FlightKey) -> bool) -> Option<(RunwayId, FlightKey)> {
        self.runways
            .iter()
            .filter_map(|r| r.current.map(|f| (r.id, f)))
            .find(|(_, f)| pred(*f))
    }

    /// Releases every runway whose flight was due to depart at or before `now`.
    pub fn clear_departed(&mut self, now: Time, flights: &[Flight]) -> Vec<(RunwayId, FlightKey)> {
        self.runways
            .iter_mut()
            .filter(|r| {
                r.current
                    .and_then(|f| flights.get(f))
                    .map_or(false, |f| f.departure_time <= now)
            })
            .filter_map(|r| r.release().map(|f| (r.id, f)))
            .collect()
    }

    /// Minutes until the soonest occupied runway frees up.
    pub fn next_available_in(&self, now: Time, flights: &[Flight]) -> Option<f64> {
        self.runways
            .iter()
            .filter_map(|r| r.current.and_then(|f| flights.get(f)))
            .map(|f| now.minutes_until(f.departure_time))
            .reduce(f64::min)
    }

    pub fn rows(&self, flights: &[Flight]) -> Vec<RunwayRow> {
        self.runways
            .iter()
            .map(|r| {
                let flight = r.current.and_then(|f| flights.get(f));
                RunwayRow {
                    runway: format!("Runway {}", r.id),
                    status: if flight.is_some() { "Occupied" } else { "Available" }.to_string(),
                    flight: flight.map_or_else(|| "-".to_string(), |f| f.number.to_string()),
                    departure: flight.map_or_else(
                        || "-".to_string(),
                        |f| f.departure_time.0.format("%H:%M").to_string(),
                    ),
                }
            })
            .collect()
    }
}
