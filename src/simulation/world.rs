//! Main simulation world that ties everything together
//!
//! This is the entry point for running the intersection simulation. The
//! host calls `tick` once per frame with the elapsed time and the current
//! configuration, then reads a `snapshot`.

use anyhow::{ensure, Context, Result};
use log::{debug, trace, warn};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::Rng;
use rand::SeedableRng;
use std::time::Duration;

use super::agent::Agent;
use super::config::SimConfig;
use super::intersection::IntersectionGeometry;
use super::lane_occupancy::LaneOccupancy;
use super::phase_controller::PhaseController;
use super::snapshot::{AgentView, PhaseView, SimStats, WorldSnapshot};
use super::types::{
    AgentId, Axis, Heading, Lane, LANES_PER_HEADING, SAFE_DISTANCE, SPAWN_CLEARANCE,
    VEHICLE_LENGTH,
};

/// The main simulation world
pub struct World {
    geometry: IntersectionGeometry,

    phases: PhaseController,

    /// Live vehicles in spawn order
    agents: Vec<Agent>,

    /// Next ID to assign
    next_id: usize,

    /// Simulated time; the only clock the engine reads
    time: Duration,

    ticks: u64,

    /// Optional seeded RNG for reproducible simulations
    rng: Option<StdRng>,

    stats: SimStats,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    fn new_internal(geometry: IntersectionGeometry, rng: Option<StdRng>) -> Self {
        Self {
            geometry,
            phases: PhaseController::new(),
            agents: Vec::new(),
            next_id: 0,
            time: Duration::ZERO,
            ticks: 0,
            rng,
            stats: SimStats::default(),
        }
    }

    pub fn new() -> Self {
        Self::new_internal(IntersectionGeometry::default(), None)
    }

    /// Create a new World with a seeded RNG for reproducible simulations
    pub fn new_with_seed(seed: u64) -> Self {
        Self::new_internal(
            IntersectionGeometry::default(),
            Some(StdRng::seed_from_u64(seed)),
        )
    }

    pub fn with_geometry(geometry: IntersectionGeometry, seed: Option<u64>) -> Self {
        Self::new_internal(geometry, seed.map(StdRng::seed_from_u64))
    }

    /// Get a random value in the given range, using seeded RNG if available
    fn random_range(&mut self, range: std::ops::Range<usize>) -> usize {
        match &mut self.rng {
            Some(rng) => rng.random_range(range),
            None => rand::rng().random_range(range),
        }
    }

    fn random_bool(&mut self, probability: f64) -> bool {
        match &mut self.rng {
            Some(rng) => rng.random_bool(probability),
            None => rand::rng().random_bool(probability),
        }
    }

    /// Choose a random element from a slice, using seeded RNG if available
    fn choose_random<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        match &mut self.rng {
            Some(rng) => slice.choose(rng),
            None => slice.choose(&mut rand::rng()),
        }
    }

    fn next_agent_id(&mut self) -> AgentId {
        let id = AgentId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn geometry(&self) -> &IntersectionGeometry {
        &self.geometry
    }

    pub fn phases(&self) -> &PhaseController {
        &self.phases
    }

    /// Replace the signal state, e.g. to start a scenario mid-cycle
    pub fn set_phases(&mut self, phases: PhaseController) {
        self.phases = phases;
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.iter().find(|agent| agent.id == id)
    }

    pub fn time(&self) -> Duration {
        self.time
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn stats(&self) -> &SimStats {
        &self.stats
    }

    /// Main simulation tick
    ///
    /// `dt` is in seconds. A negative or non-finite `dt`, or an invalid
    /// config, is rejected before any state changes.
    pub fn tick(&mut self, dt: f32, config: &SimConfig) -> Result<()> {
        ensure!(
            dt.is_finite() && dt >= 0.0,
            "tick delta must be finite and non-negative, got {}",
            dt
        );
        config.validate().context("invalid simulation config")?;
        let step = Duration::try_from_secs_f32(dt).context("tick delta out of range")?;
        let time = self
            .time
            .checked_add(step)
            .context("simulated clock overflow")?;

        if config.vehicle_speed * dt >= SAFE_DISTANCE + VEHICLE_LENGTH {
            warn!(
                "a vehicle moves {:.1} units per tick, more than the following distance; followers will be held at the bumper ahead",
                config.vehicle_speed * dt
            );
        }

        self.time = time;
        self.ticks += 1;

        if let Some(axis) = self.phases.advance(step, config) {
            self.stats.cycles_completed += 1;
            debug!(
                "t={:.2}s: {} cycle complete, {} now green",
                self.time.as_secs_f32(),
                axis,
                axis.other()
            );
        }

        self.update_agents(dt, config);
        self.reap();

        if self.agents.len() < config.max_agents && self.random_bool(config.spawn_rate) {
            self.spawn_random(config);
        }

        Ok(())
    }

    /// Decide for every vehicle against where everyone stood at the start of
    /// the tick, then move them all
    fn update_agents(&mut self, dt: f32, config: &SimConfig) {
        let occupancy = LaneOccupancy::from_agents(&self.agents);

        for agent in &mut self.agents {
            agent.speed = config.vehicle_speed;
            let light = self.phases.state_of(agent.heading.axis());
            let neighbors = occupancy.nearby(agent.lane(), agent.front());
            agent.decide(light, &neighbors, &self.geometry);
        }

        // A long step must not carry a vehicle into the one ahead
        for agent in &mut self.agents {
            let room = occupancy
                .next_ahead(agent.lane(), agent.front())
                .map_or(f32::INFINITY, |ahead| agent.room_behind(&ahead));
            agent.move_within(dt, room);
            self.stats.max_wait_ticks = self.stats.max_wait_ticks.max(agent.wait_ticks);
        }
    }

    /// Remove vehicles that have driven out of the area
    fn reap(&mut self) {
        let geometry = &self.geometry;
        let gone: Vec<AgentId> = self
            .agents
            .iter()
            .filter(|agent| geometry.is_off_bounds(agent.heading, agent.front(), agent.length))
            .map(|agent| agent.id)
            .collect();

        if gone.is_empty() {
            return;
        }

        self.agents.retain(|agent| !gone.contains(&agent.id));
        self.stats.total_reaped += gone.len() as u64;
        debug!("reaped {} vehicle(s): {:?}", gone.len(), gone);
    }

    fn spawn_random(&mut self, config: &SimConfig) -> Option<AgentId> {
        let heading = *self.choose_random(&Heading::ALL)?;
        let lane = self.random_range(0..LANES_PER_HEADING);
        self.spawn(heading, lane, config)
    }

    /// Spawn a vehicle at the entry edge of `heading`'s `lane`.
    ///
    /// Returns `None` when the world is full or another vehicle in the same
    /// lane is still too close to the spawn point.
    pub fn spawn(&mut self, heading: Heading, lane: usize, config: &SimConfig) -> Option<AgentId> {
        if lane >= LANES_PER_HEADING {
            warn!("{} has no lane {}", heading, lane);
            return None;
        }

        if self.agents.len() >= config.max_agents {
            trace!("spawn on {} lane {} refused: at capacity", heading, lane);
            self.stats.spawns_rejected += 1;
            return None;
        }

        let spawn_offset = self.geometry.spawn_offset();
        let occupancy = LaneOccupancy::from_agents(&self.agents);
        if !occupancy.is_clear(Lane::new(heading, lane), spawn_offset, SPAWN_CLEARANCE) {
            trace!("spawn on {} lane {} refused: entry blocked", heading, lane);
            self.stats.spawns_rejected += 1;
            return None;
        }

        let id = self.place_agent(heading, lane, spawn_offset, config);
        debug!("spawned {:?} heading {} in lane {}", id, heading, lane);
        Some(id)
    }

    /// Insert a vehicle at `front` without spacing or capacity checks.
    ///
    /// Lane indexes past the outer lane are clamped to it.
    pub fn place_agent(
        &mut self,
        heading: Heading,
        lane: usize,
        front: f32,
        config: &SimConfig,
    ) -> AgentId {
        let lane = if lane < LANES_PER_HEADING {
            lane
        } else {
            warn!("{} has no lane {}, placing in the outer lane", heading, lane);
            LANES_PER_HEADING - 1
        };
        let id = self.next_agent_id();
        self.agents
            .push(Agent::new(id, heading, lane, front, config.vehicle_speed));
        self.stats.total_spawned += 1;
        id
    }

    /// Capture the state renderers and UIs consume
    pub fn snapshot(&self) -> WorldSnapshot {
        let mut per_heading = [0; 4];
        let mut waiting = 0;
        let mut in_intersection = 0;

        let agents = self
            .agents
            .iter()
            .map(|agent| {
                let position = agent.position(&self.geometry);
                let in_box = agent.is_in_box(&self.geometry);
                per_heading[agent.heading.index()] += 1;
                if agent.waiting {
                    waiting += 1;
                }
                if in_box {
                    in_intersection += 1;
                }
                AgentView {
                    id: agent.id,
                    heading: agent.heading,
                    lane: agent.lane_index,
                    x: position.x,
                    y: position.y,
                    waiting: agent.waiting,
                    wait_ticks: agent.wait_ticks,
                    committed_to_cross: agent.committed_to_cross(),
                    in_intersection: in_box,
                }
            })
            .collect();

        WorldSnapshot {
            time: self.time,
            ticks: self.ticks,
            agents,
            north_south: PhaseView {
                axis: Axis::NorthSouth,
                phase: self.phases.phase(Axis::NorthSouth),
            },
            east_west: PhaseView {
                axis: Axis::EastWest,
                phase: self.phases.phase(Axis::EastWest),
            },
            per_heading,
            waiting,
            in_intersection,
            stats: self.stats.clone(),
        }
    }

    /// Print a summary of the world state
    pub fn print_summary(&self) {
        let snapshot = self.snapshot();
        println!("=== Intersection Simulation Summary ===");
        println!(
            "Time: {:.2}s ({} ticks)",
            snapshot.time.as_secs_f32(),
            snapshot.ticks
        );
        for view in [&snapshot.north_south, &snapshot.east_west] {
            println!(
                "  {} light: {} ({:.0} ms)",
                view.axis,
                view.phase.state,
                view.elapsed_ms()
            );
        }
        println!(
            "Vehicles: {} (north={}, south={}, east={}, west={})",
            snapshot.total_agents(),
            snapshot.count(Heading::North),
            snapshot.count(Heading::South),
            snapshot.count(Heading::East),
            snapshot.count(Heading::West)
        );
        println!(
            "Waiting: {}, in intersection: {}",
            snapshot.waiting, snapshot.in_intersection
        );
        println!(
            "Spawned: {}, exited: {}, rejected spawns: {}, cycles: {}, longest wait: {} ticks",
            snapshot.stats.total_spawned,
            snapshot.stats.total_reaped,
            snapshot.stats.spawns_rejected,
            snapshot.stats.cycles_completed,
            snapshot.stats.max_wait_ticks
        );
    }
}
