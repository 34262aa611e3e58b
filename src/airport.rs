use crate::error::TowerError;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::fmt;
use std::fmt::Formatter;
use std::sync::Arc;
use tabled::Tabled;

pub type AirportId = Arc<str>;
pub type Distance = u64;

/// Shortest path between two airports, both ends included.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    pub path: Vec<AirportId>,
    pub distance: Distance,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} (distance: {})", self.path.join(" -> "), self.distance)
    }
}

#[derive(Tabled)]
pub struct RouteRow {
    #[tabled(rename = "From")]
    pub from: String,
    #[tabled(rename = "To")]
    pub to: String,
    #[tabled(rename = "Distance")]
    pub distance: Distance,
}

/// Undirected weighted airport network.
#[derive(Clone, Debug, Default)]
pub struct RouteGraph {
    adjacency: HashMap<AirportId, Vec<(AirportId, Distance)>>,
}

impl RouteGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connects `from` and `to` in both directions. Repeated calls add
    /// parallel edges; a self-loop is stored once.
    pub fn add_route(&mut self, from: AirportId, to: AirportId, distance: Distance) -> Result<(), TowerError> {
        if distance == 0 {
            return Err(TowerError::InvalidDistance { from, to });
        }
        self.adjacency
            .entry(from.clone())
            .or_default()
            .push((to.clone(), distance));
        if from != to {
            self.adjacency.entry(to).or_default().push((from, distance));
        }
        Ok(())
    }

    pub fn contains(&self, airport: &str) -> bool {
        self.adjacency.contains_key(airport)
    }

    pub fn neighbours(&self, airport: &str) -> &[(AirportId, Distance)] {
        self.adjacency.get(airport).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn airports(&self) -> Vec<AirportId> {
        let mut ids = self.adjacency.keys().cloned().collect::<Vec<_>>();
        ids.sort();
        ids
    }

    /// Each undirected route once, sorted by endpoints.
    pub fn rows(&self) -> Vec<RouteRow> {
        let mut rows = self
            .adjacency
            .iter()
            .flat_map(|(from, edges)| edges.iter().map(move |(to, d)| (from, to, *d)))
            .filter(|(from, to, _)| from <= to)
            .map(|(from, to, distance)| RouteRow {
                from: from.to_string(),
                to: to.to_string(),
                distance,
            })
            .collect::<Vec<_>>();
        rows.sort_by(|a, b| (&a.from, &a.to, a.distance).cmp(&(&b.from, &b.to, b.distance)));
        rows
    }

    /// Dijkstra over the adjacency lists. `None` when either airport is
    /// unknown or the two are not connected.
    pub fn find_shortest_route(&self, start: &str, destination: &str) -> Option<Route> {
        let start = self.adjacency.get_key_value(start)?.0.clone();
        let destination = self.adjacency.get_key_value(destination)?.0.clone();

        let mut distances: HashMap<AirportId, Distance> = HashMap::from([(start.clone(), 0)]);
        let mut previous: HashMap<AirportId, AirportId> = HashMap::new();
        let mut heap = BinaryHeap::from([Reverse((0, start.clone()))]);

        while let Some(Reverse((distance, airport))) = heap.pop() {
            if airport == destination {
                let mut path = vec![airport];
                while let Some(prev) = path.last().and_then(|a| previous.get(a)) {
                    path.push(prev.clone());
                }
                path.reverse();
                return Some(Route { path, distance });
            }

            // stale entry
            if distances.get(&airport).is_some_and(|best| distance > *best) {
                continue;
            }

            for (neighbour, weight) in self.neighbours(&airport) {
                // a path longer than u64::MAX can never be the shortest one
                let Some(candidate) = distance.checked_add(*weight) else {
                    continue;
                };
                if distances.get(neighbour).map_or(true, |best| candidate < *best) {
                    distances.insert(neighbour.clone(), candidate);
                    previous.insert(neighbour.clone(), airport.clone());
                    heap.push(Reverse((candidate, neighbour.clone())));
                }
            }
        }
        None
    }
}
