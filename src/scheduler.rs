use crate::flight::FlightKey;
use crate::time::Time;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Ordering key for pending flights: priority first (lower wins), then the
/// earlier departure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SchedulingKey {
    pub priority: u8,
    pub departure_time: Time,
}

/// Min-queue of admitted flights awaiting scheduling.
#[derive(Debug, Default)]
pub struct PendingQueue {
    // admission sequence breaks exact ties in arrival order
    heap: BinaryHeap<Reverse<(SchedulingKey, u64, FlightKey)>>,
    next_seq: u64,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: SchedulingKey, flight: FlightKey) {
        self.heap.push(Reverse((key, self.next_seq, flight)));
        self.next_seq += 1;
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Empties the queue, most urgent first.
    pub fn drain_sorted(&mut self) -> Vec<FlightKey> {
        let mut drained = Vec::with_capacity(self.heap.len());
        while let Some(Reverse((_, _, flight))) = self.heap.pop() {
            drained.push(flight);
        }
        drained
    }
}
