//! Simulation runner: drives the per-timestep matching loop.
//!
//! Each timestep runs, in order: free riders whose rides ended, bucket the arriving
//! requests by zone, then for every zone in ascending order price the zone, ask the
//! dispatch policy, match and emit records. Steps are advanced one at a time with
//! [Simulation::run_next_step] or to the horizon with [Simulation::run_until_complete].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, trace};

use crate::agents::{Request, RequestBook, RequestId, Rider, RiderId, RiderPool};
use crate::config::SimulationParams;
use crate::dispatch::{create_dispatch_policy, DispatchAction, DispatchPolicy};
use crate::error::ConfigError;
use crate::metrics::SimulationMetrics;
use crate::spawner::generate_entities;
use crate::telemetry::{AllocationRecord, DispatchRecord, SimTelemetry, SurgeRecord};

/// Reward fed to the policy for every skipped zone, explicit or forced by zero supply.
pub const SKIP_REWARD: f64 = -1.0;

/// Realized fares are divided by this before being fed back as allocate rewards.
pub const REWARD_FARE_SCALE: f64 = 200.0;

/// Everything a run produces: the record streams and the summary KPIs.
#[derive(Debug, Clone)]
pub struct SimulationOutput {
    pub allocation_records: Vec<AllocationRecord>,
    pub surge_records: Vec<SurgeRecord>,
    pub dispatch_records: Vec<DispatchRecord>,
    pub metrics: SimulationMetrics,
}

impl SimulationOutput {
    /// `(allocation_records, surge_records, total_revenue, fulfillment_rate, utilization)`.
    pub fn into_parts(self) -> (Vec<AllocationRecord>, Vec<SurgeRecord>, f64, f64, f64) {
        (
            self.allocation_records,
            self.surge_records,
            self.metrics.total_revenue,
            self.metrics.fulfillment_rate,
            self.metrics.utilization,
        )
    }
}

/// One simulation run. Owns its generator, entities, policy and telemetry; nothing
/// is shared with other runs.
pub struct Simulation {
    params: SimulationParams,
    rng: StdRng,
    riders: RiderPool,
    requests: RequestBook,
    policy: Box<dyn DispatchPolicy>,
    telemetry: SimTelemetry,
    next_step: u64,
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("params", &self.params)
            .field("policy", &self.policy.name())
            .field("next_step", &self.next_step)
            .finish_non_exhaustive()
    }
}

/// Generator for a run: seeded when `seed` is set, otherwise from OS entropy.
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

impl Simulation {
    /// Validate `params` and generate entities from a generator built from `params.seed`.
    pub fn new(params: SimulationParams) -> Result<Self, ConfigError> {
        let rng = seeded_rng(params.seed);
        Self::with_rng(params, rng)
    }

    /// Validate `params` and generate entities from `rng`, which then drives the run.
    pub fn with_rng(params: SimulationParams, mut rng: StdRng) -> Result<Self, ConfigError> {
        params.validate()?;
        let (riders, requests) = generate_entities(&mut rng, &params);
        Ok(Self::assemble(params, riders, requests, rng))
    }

    /// Build a run from explicit entities instead of generating them.
    ///
    /// `params.num_riders` and `params.num_requests` are overwritten with the entity counts.
    pub fn from_entities(
        mut params: SimulationParams,
        riders: Vec<Rider>,
        requests: Vec<Request>,
        rng: StdRng,
    ) -> Result<Self, ConfigError> {
        params.validate()?;
        for (idx, rider) in riders.iter().enumerate() {
            if rider.zone >= params.num_zones {
                return Err(ConfigError::RiderZoneOutOfRange {
                    rider: idx,
                    zone: rider.zone,
                    num_zones: params.num_zones,
                });
            }
        }
        for (idx, request) in requests.iter().enumerate() {
            if request.zone >= params.num_zones {
                return Err(ConfigError::RequestZoneOutOfRange {
                    request: idx,
                    zone: request.zone,
                    num_zones: params.num_zones,
                });
            }
            if request.arrival >= params.time_steps {
                return Err(ConfigError::RequestArrivalOutOfRange {
                    request: idx,
                    arrival: request.arrival,
                    time_steps: params.time_steps,
                });
            }
        }
        params.num_riders = riders.len();
        params.num_requests = requests.len();
        Ok(Self::assemble(params, riders, requests, rng))
    }

    fn assemble(
        params: SimulationParams,
        riders: Vec<Rider>,
        requests: Vec<Request>,
        rng: StdRng,
    ) -> Self {
        let policy = create_dispatch_policy(params.policy, &params.tabular);
        let telemetry =
            SimTelemetry::with_capacity(params.num_zones, params.time_steps, requests.len());
        info!(
            zones = params.num_zones,
            riders = riders.len(),
            requests = requests.len(),
            time_steps = params.time_steps,
            policy = policy.name(),
            seed = ?params.seed,
            "simulation initialised"
        );
        Self {
            riders: RiderPool::new(riders, params.num_zones),
            requests: RequestBook::new(requests, params.time_steps),
            params,
            rng,
            policy,
            telemetry,
            next_step: 0,
        }
    }

    /// Replace the policy chosen by `params.policy` with a caller-supplied one.
    /// Call before the first step; the new policy starts with no learned state.
    pub fn with_dispatch_policy(mut self, policy: Box<dyn DispatchPolicy>) -> Self {
        debug!(policy = policy.name(), "dispatch policy overridden");
        self.policy = policy;
        self
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn riders(&self) -> &RiderPool {
        &self.riders
    }

    pub fn requests(&self) -> &RequestBook {
        &self.requests
    }

    pub fn telemetry(&self) -> &SimTelemetry {
        &self.telemetry
    }

    pub fn policy(&self) -> &dyn DispatchPolicy {
        self.policy.as_ref()
    }

    /// The next timestep to be processed (equals `time_steps` once finished).
    pub fn current_step(&self) -> u64 {
        self.next_step
    }

    pub fn is_finished(&self) -> bool {
        self.next_step >= self.params.time_steps
    }

    /// Process one timestep. Returns `false` once the horizon has been reached.
    pub fn run_next_step(&mut self) -> bool {
        if self.is_finished() {
            return false;
        }
        let t = self.next_step;

        let freed = self.riders.free_riders(t);
        let arrivals = self.requests.arrivals_by_zone(t, self.params.num_zones);
        let fulfilled_before = self.telemetry.fulfilled_requests;

        for (zone, zone_requests) in arrivals.iter().enumerate() {
            self.dispatch_zone(t, zone, zone_requests);
        }

        debug!(
            timestep = t,
            freed,
            demand = arrivals.iter().map(Vec::len).sum::<usize>(),
            matches = self.telemetry.fulfilled_requests - fulfilled_before,
            idle = self.riders.available_count(),
            "timestep complete"
        );
        self.next_step += 1;
        true
    }

    /// Run every remaining timestep. Returns the number of steps executed.
    pub fn run_until_complete(&mut self) -> usize {
        self.run_until_complete_with_hook(|_, _| {})
    }

    /// Run every remaining timestep and invoke `hook` with the finished timestep after each.
    pub fn run_until_complete_with_hook<F>(&mut self, mut hook: F) -> usize
    where
        F: FnMut(&Simulation, u64),
    {
        let mut steps = 0;
        while self.run_next_step() {
            hook(self, self.next_step - 1);
            steps += 1;
        }
        steps
    }

    /// KPIs over the timesteps processed so far.
    pub fn metrics(&self) -> SimulationMetrics {
        SimulationMetrics::from_telemetry(&self.telemetry, &self.params)
    }

    /// Consume the run and hand out its records and KPIs.
    pub fn finish(self) -> SimulationOutput {
        let metrics = self.metrics();
        info!(
            revenue = metrics.total_revenue,
            gross_fares = self.telemetry.gross_fares(),
            fulfillment_rate = metrics.fulfillment_rate,
            utilization = metrics.utilization,
            fulfilled = metrics.fulfilled_requests,
            "simulation finished"
        );
        SimulationOutput {
            allocation_records: self.telemetry.allocations,
            surge_records: self.telemetry.surges,
            dispatch_records: self.telemetry.dispatches,
            metrics,
        }
    }

    fn dispatch_zone(&mut self, t: u64, zone: usize, zone_requests: &[RequestId]) {
        let demand = zone_requests.len();
        let available = self.riders.available_in_zone(zone);
        let supply = available.len();
        let surge = self.params.pricing.multiplier(demand, supply);

        let decided = self.policy.decide(zone, demand, supply, &mut self.rng);
        let (action, matches) = if decided == DispatchAction::Skip || supply == 0 {
            self.policy
                .feedback(zone, demand, supply, DispatchAction::Skip, SKIP_REWARD);
            (DispatchAction::Skip, 0)
        } else {
            let matches =
                self.match_zone(t, zone, demand, supply, surge, zone_requests, &available);
            (DispatchAction::Allocate, matches)
        };

        trace!(
            timestep = t,
            zone,
            demand,
            supply,
            surge,
            action = action.as_str(),
            matches,
            "zone dispatched"
        );
        self.telemetry.dispatches.push(DispatchRecord {
            timestep: t,
            zone,
            demand,
            supply,
            surge,
            action,
            matches,
        });
        self.telemetry.surges.push(SurgeRecord {
            timestep: t,
            zone,
            surge,
        });
    }

    /// Pair the i-th arriving request with the i-th available rider (both ascending by id).
    #[allow(clippy::too_many_arguments)]
    fn match_zone(
        &mut self,
        t: u64,
        zone: usize,
        demand: usize,
        supply: usize,
        surge: f64,
        zone_requests: &[RequestId],
        available: &[RiderId],
    ) -> usize {
        let num_matches = demand.min(supply);
        let remaining = self.params.time_steps - t;

        for (&request_id, &rider_id) in zone_requests
            .iter()
            .take(num_matches)
            .zip(available.iter().take(num_matches))
        {
            let duration = self.rng.gen_range(self.params.ride_duration_range.clone());
            // Utilization counts only the part of the ride inside the horizon, while the
            // rider stays reserved for the full duration.
            let busy_time = duration.min(remaining);
            self.riders.assign(rider_id, t.saturating_add(duration));

            let fare = f64::from(self.requests[request_id].base_fare) * surge;
            let revenue = fare * self.params.commission_rate;
            self.telemetry.record_allocation(
                AllocationRecord {
                    timestep: t,
                    zone,
                    fare,
                    surge,
                },
                busy_time,
                revenue,
            );
            self.policy.feedback(
                zone,
                demand,
                supply,
                DispatchAction::Allocate,
                fare / REWARD_FARE_SCALE,
            );
        }
        num_matches
    }
}

/// Run a full simulation from the four size scalars and the policy switch. The generator is
/// seeded from OS entropy; use [run_scenario] with a seed for reproducible runs.
pub fn run_simulation(
    num_zones: usize,
    num_riders: usize,
    num_requests: usize,
    time_steps: u64,
    use_rl: bool,
) -> Result<SimulationOutput, ConfigError> {
    run_scenario(SimulationParams::new(
        num_zones,
        num_riders,
        num_requests,
        time_steps,
        use_rl,
    ))
}

/// Run a full simulation from parameters, seeding from `params.seed`.
pub fn run_scenario(params: SimulationParams) -> Result<SimulationOutput, ConfigError> {
    let mut simulation = Simulation::new(params)?;
    simulation.run_until_complete();
    Ok(simulation.finish())
}

/// Run a full simulation driven by an explicitly supplied generator.
pub fn run_scenario_with_rng(
    params: SimulationParams,
    rng: StdRng,
) -> Result<SimulationOutput, ConfigError> {
    let mut simulation = Simulation::with_rng(params, rng)?;
    simulation.run_until_complete();
    Ok(simulation.finish())
}
