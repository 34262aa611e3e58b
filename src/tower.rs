use crate::airport::{AirportId, Distance, Route, RouteGraph};
use crate::config::{Scenario, TowerConfig};
use crate::error::TowerError;
use crate::flight::FlightStatus::{Cancelled, Departed, RunwayAssigned, Scheduled, Waiting};
use crate::flight::{Flight, FlightKey, FlightNumber};
use crate::runway::{RunwayId, RunwayPool};
use crate::scheduler::PendingQueue;
use crate::time::Time;
use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleOutcome {
    /// Number of flights moved from the pending queue.
    Scheduled(usize),
    NothingToSchedule,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub flight: FlightKey,
    pub number: FlightNumber,
    pub runway: RunwayId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub flight: FlightKey,
    pub number: FlightNumber,
    pub runway: RunwayId,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AllocationOutcome {
    Assigned(Vec<Assignment>),
    /// Every runway is held; the soonest frees up in `wait_minutes`.
    FullyOccupied { wait_minutes: f64 },
    NothingWaiting,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AllocationReport {
    /// Flights whose departure time had passed, reclaimed before allocating.
    pub departed: Vec<Departure>,
    pub outcome: AllocationOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoOutcome {
    Restored(FlightKey),
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub pending: usize,
    pub scheduled: usize,
    pub cancelled: usize,
    pub free_runways: usize,
    pub total_runways: usize,
}

/// Admission, scheduling, runway allocation and cancellation for one airport.
pub struct Tower {
    config: TowerConfig,
    graph: RouteGraph,
    runways: RunwayPool,
    pending: PendingQueue,
    scheduled: Vec<FlightKey>,
    // top of the stack is the last element
    cancelled: Vec<FlightKey>,
    history: Vec<Flight>,
}

impl Tower {
    pub fn new(config: TowerConfig) -> Tower {
        let mut graph = RouteGraph::new();
        if config.sample_routes {
            for (from, to, distance) in TowerConfig::SAMPLE_ROUTES {
                if let Err(err) = graph.add_route(Arc::from(from), Arc::from(to), distance) {
                    warn!(%err, "skipping sample route");
                }
            }
        }
        Tower {
            runways: RunwayPool::new(config.runways),
            config,
            graph,
            pending: PendingQueue::new(),
            scheduled: Vec::new(),
            cancelled: Vec::new(),
            history: Vec::new(),
        }
    }

    /// Builds a tower and replays a scenario against it: routes first, then
    /// flight admissions relative to `now`.
    pub fn with_scenario(config: TowerConfig, scenario: &Scenario, now: Time) -> Result<Tower, TowerError> {
        let mut tower = Tower::new(config);
        for route in &scenario.routes {
            tower.add_route(&route.from, &route.to, route.distance)?;
        }
        for flight in &scenario.flights {
            tower.add_flight(&flight.number, &flight.destination, &flight.time, flight.emergency, now)?;
        }
        info!(
            routes = scenario.routes.len(),
            flights = scenario.flights.len(),
            "scenario loaded"
        );
        Ok(tower)
    }

    pub fn add_flight(
        &mut self,
        number: &str,
        destination: &str,
        time_of_day: &str,
        is_emergency: bool,
        now: Time,
    ) -> Result<&Flight, TowerError> {
        let departure_time = Time::departure_from(time_of_day, now).inspect_err(|err| {
            warn!(flight = number, %err, "flight rejected");
        })?;

        let destination: AirportId = Arc::from(destination);
        if !self.graph.contains(&destination) && destination != self.config.hub {
            self.graph.add_route(
                self.config.hub.clone(),
                destination.clone(),
                self.config.hub_distance,
            )?;
            debug!(hub = %self.config.hub, %destination, "synthesized default route");
        }

        let flight = Flight::new(Arc::from(number), destination, departure_time, is_emergency);
        let key = self.history.len();
        self.pending.push(flight.scheduling_key(), key);
        info!(flight = %flight.number, departure = %flight.departure_time, emergency = is_emergency, "flight admitted");
        self.history.push(flight);

        self.assert_invariants();
        Ok(&self.history[key])
    }

    /// Moves the whole pending queue, most urgent first, onto the end of the
    /// scheduled list.
    pub fn schedule_flights(&mut self) -> ScheduleOutcome {
        if self.pending.is_empty() {
            return ScheduleOutcome::NothingToSchedule;
        }

        let drained = self.pending.drain_sorted();
        for key in &drained {
            self.history[*key].status = Scheduled;
        }
        let count = drained.len();
        self.scheduled.extend(drained);
        info!(count, waiting = self.scheduled.len(), "flights scheduled");

        self.assert_invariants();
        ScheduleOutcome::Scheduled(count)
    }

    /// Reclaims runways of departed flights, then hands free runways to
    /// scheduled flights in list order, lowest runway first. Flights that
    /// find no runway keep their place.
    pub fn allocate_runways(&mut self, now: Time) -> AllocationReport {
        let departed = self
            .runways
            .clear_departed(now, &self.history)
            .into_iter()
            .map(|(runway, key)| {
                let flight = &mut self.history[key];
                flight.status = Departed;
                info!(flight = %flight.number, %runway, "flight departed, runway cleared");
                Departure {
                    flight: key,
                    number: flight.number.clone(),
                    runway,
                }
            })
            .collect::<Vec<_>>();

        let outcome = if self.runways.all_occupied() {
            let wait_minutes = self
                .runways
                .next_available_in(now, &self.history)
                .unwrap_or(0.0);
            info!(wait_minutes, "all runways occupied");
            AllocationOutcome::FullyOccupied { wait_minutes }
        } else if self.scheduled.is_empty() {
            AllocationOutcome::NothingWaiting
        } else {
            let mut assignments = vec![];
            let mut still_waiting = Vec::with_capacity(self.scheduled.len());
            for key in std::mem::take(&mut self.scheduled) {
                match self.runways.first_free() {
                    Some(runway) if self.runways.assign(runway, key) => {
                        let flight = &mut self.history[key];
                        flight.status = RunwayAssigned;
                        flight.assigned_runway = Some(runway);
                        info!(flight = %flight.number, %runway, "runway assigned");
                        assignments.push(Assignment {
                            flight: key,
                            number: flight.number.clone(),
                            runway,
                        });
                    }
                    _ => still_waiting.push(key),
                }
            }
            self.scheduled = still_waiting;
            AllocationOutcome::Assigned(assignments)
        };

        self.assert_invariants();
        AllocationReport { departed, outcome }
    }

    /// Cancels the first scheduled flight with this number, or failing that
    /// the one holding the lowest-numbered runway.
    pub fn cancel_flight(&mut self, number: &str) -> Result<&Flight, TowerError> {
        let key = if let Some(pos) = self
            .scheduled
            .iter()
            .position(|k| &*self.history[*k].number == number)
        {
            self.scheduled.remove(pos)
        } else if let Some((runway, key)) = self
            .runways
            .find_occupied(|k| &*self.history[k].number == number)
        {
            self.runways.release(runway);
            info!(flight = number, %runway, "runway released by cancellation");
            key
        } else {
            warn!(flight = number, "cancellation target not found");
            return Err(TowerError::FlightNotFound {
                number: Arc::from(number),
            });
        };

        let flight = &mut self.history[key];
        flight.status = Cancelled;
        flight.assigned_runway = None;
        self.cancelled.push(key);
        info!(flight = number, "flight cancelled");

        self.assert_invariants();
        Ok(&self.history[key])
    }

    /// Restores the most recently cancelled flight to the end of the
    /// scheduled list. It never goes straight back to a runway.
    pub fn undo_cancellation(&mut self) -> UndoOutcome {
        let Some(key) = self.cancelled.pop() else {
            return UndoOutcome::Empty;
        };
        self.history[key].status = Scheduled;
        self.scheduled.push(key);
        info!(flight = %self.history[key].number, "cancellation undone");

        self.assert_invariants();
        UndoOutcome::Restored(key)
    }

    pub fn add_route(&mut self, from: &str, to: &str, distance: Distance) -> Result<(), TowerError> {
        self.graph.add_route(Arc::from(from), Arc::from(to), distance)?;
        info!(from, to, distance, "route added");
        Ok(())
    }

    pub fn find_route(&self, from: &str, to: &str) -> Option<Route> {
        let route = self.graph.find_shortest_route(from, to);
        debug!(from, to, found = route.is_some(), "route lookup");
        route
    }

    pub fn graph(&self) -> &RouteGraph {
        &self.graph
    }

    pub fn flight(&self, key: FlightKey) -> Option<&Flight> {
        self.history.get(key)
    }

    /// Every flight ever admitted, in admission order.
    pub fn history(&self) -> &[Flight] {
        &self.history
    }

    pub fn scheduled(&self) -> impl Iterator<Item = &Flight> {
        self.scheduled.iter().map(|k| &self.history[*k])
    }

    /// Bottom of the stack first.
    pub fn cancelled(&self) -> impl DoubleEndedIterator<Item = &Flight> {
        self.cancelled.iter().map(|k| &self.history[*k])
    }

    pub fn pending(&self) -> impl Iterator<Item = &Flight> {
        self.history.iter().filter(|f| f.status == Waiting)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn runways(&self) -> &RunwayPool {
        &self.runways
    }

    pub fn summary(&self) -> Summary {
        Summary {
            pending: self.pending_len(),
            scheduled: self.scheduled.len(),
            cancelled: self.cancelled.len(),
            free_runways: self.runways.free_count(),
            total_runways: self.runways.len(),
        }
    }

    fn assert_invariants(&self) {
        let mut on_runway = HashSet::new();
        for runway in self.runways.iter() {
            if let Some(key) = runway.current_flight() {
                debug_assert!(on_runway.insert(key), "Flight held by two runways");
                debug_assert_eq!(
                    Some(runway.id),
                    self.history[key].assigned_runway,
                    "Runway <-> flight back-reference violated"
                );
                debug_assert_eq!(RunwayAssigned, self.history[key].status);
            }
        }
        debug_assert!(
            self.history
                .iter()
                .enumerate()
                .filter(|(_, f)| f.status == RunwayAssigned)
                .all(|(k, f)| {
                    f.assigned_runway
                        .and_then(|id| self.runways.get(id))
                        .and_then(|r| r.current_flight())
                        == Some(k)
                }),
            "Runway assigned flight without a runway"
        );
        debug_assert!(
            self.scheduled.iter().all(|k| self.history[*k].status == Scheduled),
            "Scheduled list status violated"
        );
        debug_assert!(
            self.cancelled.iter().all(|k| self.history[*k].status == Cancelled),
            "Cancelled stack status violated"
        );
        debug_assert_eq!(
            self.pending.len(),
            self.history.iter().filter(|f| f.status == Waiting).count(),
            "Pending queue <-> waiting status violated"
        );
    }
}

/// A tower shared between callers. Mutations take the write lock, so they
/// are serialized; snapshots and route lookups may read concurrently.
#[derive(Clone)]
pub struct SharedTower(Arc<RwLock<Tower>>);

impl SharedTower {
    pub fn new(tower: Tower) -> Self {
        SharedTower(Arc::new(RwLock::new(tower)))
    }

    pub fn write<R>(&self, f: impl FnOnce(&mut Tower) -> R) -> R {
        let mut guard = self.0.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    pub fn read<R>(&self, f: impl FnOnce(&Tower) -> R) -> R {
        let guard = self.0.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }
}

#[cfg(test)]
mod tests {
    mod admission;
    mod allocation;
    mod cancellation;
    mod proptests;
    mod routing;
    mod scheduling;
    mod shared;
    mod utils;
}
