//! Entity generation: the initial rider pool and the full request stream.
//!
//! Draws are columnar and in a fixed order (rider zones, then request zones, base
//! fares and arrival timesteps) so a seeded generator always yields the same entities.

use rand::Rng;

use crate::agents::{Request, Rider};
use crate::config::SimulationParams;

/// `num_riders` idle riders, each in a zone drawn uniformly from `[0, num_zones)`.
pub fn generate_riders<R: Rng + ?Sized>(rng: &mut R, params: &SimulationParams) -> Vec<Rider> {
    (0..params.num_riders)
        .map(|_| Rider::new(rng.gen_range(0..params.num_zones)))
        .collect()
}

/// `num_requests` requests with uniform zone, base fare and arrival timestep.
pub fn generate_requests<R: Rng + ?Sized>(
    rng: &mut R,
    params: &SimulationParams,
) -> Vec<Request> {
    let n = params.num_requests;
    let zones: Vec<usize> = (0..n).map(|_| rng.gen_range(0..params.num_zones)).collect();
    let fares: Vec<u32> = (0..n)
        .map(|_| rng.gen_range(params.fare_range.clone()))
        .collect();
    let arrivals: Vec<u64> = (0..n).map(|_| rng.gen_range(0..params.time_steps)).collect();

    zones
        .into_iter()
        .zip(fares)
        .zip(arrivals)
        .map(|((zone, base_fare), arrival)| Request::new(zone, base_fare, arrival))
        .collect()
}

/// Generate riders then requests from one generator.
pub fn generate_entities<R: Rng + ?Sized>(
    rng: &mut R,
    params: &SimulationParams,
) -> (Vec<Rider>, Vec<Request>) {
    let riders = generate_riders(rng, params);
    let requests = generate_requests(rng, params);
    (riders, requests)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn generated_entities_respect_bounds() {
        let params = SimulationParams::new(4, 200, 500, 12, false);
        let mut rng = StdRng::seed_from_u64(7);
        let (riders, requests) = generate_entities(&mut rng, &params);

        assert_eq!(riders.len(), 200);
        assert!(riders
            .iter()
            .all(|r| r.zone < 4 && r.available && r.busy_until == 0));

        assert_eq!(requests.len(), 500);
        for request in &requests {
            assert!(request.zone < 4);
            assert!((50..200).contains(&request.base_fare));
            assert!(request.arrival < 12);
        }
    }

    #[test]
    fn same_seed_same_entities() {
        let params = SimulationParams::new(5, 30, 60, 10, false);
        let a = generate_entities(&mut StdRng::seed_from_u64(99), &params);
        let b = generate_entities(&mut StdRng::seed_from_u64(99), &params);
        assert_eq!(a, b);
    }

    #[test]
    fn empty_counts_generate_nothing() {
        let params = SimulationParams::new(3, 0, 0, 4, false);
        let (riders, requests) = generate_entities(&mut StdRng::seed_from_u64(1), &params);
        assert!(riders.is_empty());
        assert!(requests.is_empty());
    }

    #[test]
    fn every_zone_gets_riders_in_a_large_pool() {
        let params = SimulationParams::new(6, 600, 0, 1, false);
        let riders = generate_riders(&mut StdRng::seed_from_u64(3), &params);
        for zone in 0..6 {
            assert!(riders.iter().any(|r| r.zone == zone), "zone {zone} empty");
        }
    }
}
