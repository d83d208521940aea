//! Riders (supply) and ride requests (demand), stored in index-addressed arenas.
//!
//! Identity is the position in the arena. Every per-zone and per-timestep view hands
//! out ids in ascending order, which is the deterministic pairing order used by matching.

use std::ops::Index;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RiderId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestId(pub usize);

/// A supply unit. Its home zone never changes during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rider {
    pub zone: usize,
    pub available: bool,
    /// First timestep at which the rider is free again.
    pub busy_until: u64,
}

impl Rider {
    /// An idle rider waiting in `zone`.
    pub fn new(zone: usize) -> Self {
        Self {
            zone,
            available: true,
            busy_until: 0,
        }
    }
}

/// A demand unit, considered only at its arrival timestep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub zone: usize,
    pub base_fare: u32,
    pub arrival: u64,
}

impl Request {
    pub fn new(zone: usize, base_fare: u32, arrival: u64) -> Self {
        Self {
            zone,
            base_fare,
            arrival,
        }
    }
}

/// Contiguous rider arena with a per-zone index.
#[derive(Debug, Clone)]
pub struct RiderPool {
    riders: Vec<Rider>,
    by_zone: Vec<Vec<RiderId>>,
}

impl RiderPool {
    /// Build the pool. Callers guarantee every rider's zone is below `num_zones`.
    pub fn new(riders: Vec<Rider>, num_zones: usize) -> Self {
        let mut by_zone = vec![Vec::new(); num_zones];
        for (idx, rider) in riders.iter().enumerate() {
            by_zone[rider.zone].push(RiderId(idx));
        }
        Self { riders, by_zone }
    }

    pub fn len(&self) -> usize {
        self.riders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.riders.is_empty()
    }

    /// Mark every rider whose ride ended at or before `now` as available.
    /// Returns how many riders changed state.
    pub fn free_riders(&mut self, now: u64) -> usize {
        let mut freed = 0;
        for rider in self.riders.iter_mut() {
            if rider.busy_until <= now && !rider.available {
                rider.available = true;
                freed += 1;
            }
        }
        freed
    }

    /// Available riders in `zone`, ascending by id.
    pub fn available_in_zone(&self, zone: usize) -> Vec<RiderId> {
        self.by_zone
            .get(zone)
            .map(|ids| {
                ids.iter()
                    .copied()
                    .filter(|id| self.riders[id.0].available)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Take the rider off the market until `busy_until`.
    pub fn assign(&mut self, id: RiderId, busy_until: u64) {
        if let Some(rider) = self.riders.get_mut(id.0) {
            rider.available = false;
            rider.busy_until = busy_until;
        }
    }

    pub fn available_count(&self) -> usize {
        self.riders.iter().filter(|r| r.available).count()
    }
}

impl Index<RiderId> for RiderPool {
    type Output = Rider;

    fn index(&self, id: RiderId) -> &Rider {
        &self.riders[id.0]
    }
}

/// Immutable request store with a per-timestep arrival index.
#[derive(Debug, Clone)]
pub struct RequestBook {
    requests: Vec<Request>,
    by_arrival: Vec<Vec<RequestId>>,
}

impl RequestBook {
    /// Build the book. Callers guarantee every arrival is below `time_steps`.
    pub fn new(requests: Vec<Request>, time_steps: u64) -> Self {
        let mut by_arrival = vec![Vec::new(); time_steps as usize];
        for (idx, request) in requests.iter().enumerate() {
            by_arrival[request.arrival as usize].push(RequestId(idx));
        }
        Self {
            requests,
            by_arrival,
        }
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Requests arriving at `timestep`, ascending by id.
    pub fn arrivals_at(&self, timestep: u64) -> &[RequestId] {
        self.by_arrival
            .get(timestep as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Requests arriving at `timestep`, partitioned by zone, each list ascending by id.
    pub fn arrivals_by_zone(&self, timestep: u64, num_zones: usize) -> Vec<Vec<RequestId>> {
        let mut per_zone = vec![Vec::new(); num_zones];
        for id in self.arrivals_at(timestep) {
            let zone = self.requests[id.0].zone;
            if let Some(bucket) = per_zone.get_mut(zone) {
                bucket.push(*id);
            }
        }
        per_zone
    }
}

impl Index<RequestId> for RequestBook {
    type Output = Request;

    fn index(&self, id: RequestId) -> &Request {
        &self.requests[id.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_riders_is_idempotent() {
        let mut pool = RiderPool::new(vec![Rider::new(0), Rider::new(0)], 1);
        pool.assign(RiderId(0), 5);

        assert_eq!(pool.free_riders(4), 0);
        assert_eq!(pool.available_in_zone(0), vec![RiderId(1)]);

        assert_eq!(pool.free_riders(5), 1);
        assert_eq!(pool.free_riders(5), 0);
        assert_eq!(pool.available_in_zone(0), vec![RiderId(0), RiderId(1)]);
    }

    #[test]
    fn zone_index_is_ascending_and_filtered() {
        let riders = vec![Rider::new(1), Rider::new(0), Rider::new(1), Rider::new(1)];
        let mut pool = RiderPool::new(riders, 2);
        pool.assign(RiderId(2), 10);

        assert_eq!(pool.available_in_zone(1), vec![RiderId(0), RiderId(3)]);
        assert_eq!(pool.available_in_zone(0), vec![RiderId(1)]);
        assert!(pool.available_in_zone(7).is_empty());
        assert_eq!(pool.available_count(), 3);
    }

    #[test]
    fn arrivals_are_partitioned_by_zone() {
        let requests = vec![
            Request::new(1, 100, 0),
            Request::new(0, 60, 2),
            Request::new(1, 70, 0),
            Request::new(0, 80, 0),
        ];
        let book = RequestBook::new(requests, 3);

        let at_zero = book.arrivals_by_zone(0, 2);
        assert_eq!(at_zero[0], vec![RequestId(3)]);
        assert_eq!(at_zero[1], vec![RequestId(0), RequestId(2)]);

        assert_eq!(book.arrivals_at(0), &[RequestId(0), RequestId(2), RequestId(3)]);
        assert!(book.arrivals_at(9).is_empty());

        let at_one = book.arrivals_by_zone(1, 2);
        assert!(at_one.iter().all(Vec::is_empty));
        assert!(book.arrivals_by_zone(9, 2).iter().all(Vec::is_empty));
    }
}
