//! Read-only view of the world handed to renderers and UIs

use std::time::Duration;

use super::phase_controller::Phase;
use super::types::{AgentId, Axis, Heading};

/// Cumulative counters since the world was created
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimStats {
    pub total_spawned: u64,
    pub total_reaped: u64,
    /// Spawn attempts refused for capacity or spacing
    pub spawns_rejected: u64,
    pub cycles_completed: u64,
    /// Longest wait any vehicle has had, in ticks
    pub max_wait_ticks: u32,
}

/// One vehicle as seen from outside the engine
#[derive(Debug, Clone, PartialEq)]
pub struct AgentView {
    pub id: AgentId,
    pub heading: Heading,
    pub lane: usize,
    /// Center of the vehicle
    pub x: f32,
    pub y: f32,
    pub waiting: bool,
    pub wait_ticks: u32,
    pub committed_to_cross: bool,
    pub in_intersection: bool,
}

/// Light state of one axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseView {
    pub axis: Axis,
    pub phase: Phase,
}

impl PhaseView {
    pub fn elapsed_ms(&self) -> f64 {
        self.phase.elapsed_ms()
    }
}

/// Everything a renderer or UI may read after a tick
#[derive(Debug, Clone, PartialEq)]
pub struct WorldSnapshot {
    pub time: Duration,
    pub ticks: u64,
    pub agents: Vec<AgentView>,
    pub north_south: PhaseView,
    pub east_west: PhaseView,
    /// Live vehicles per heading, indexed by `Heading::index`
    pub per_heading: [usize; 4],
    pub waiting: usize,
    pub in_intersection: usize,
    pub stats: SimStats,
}

impl WorldSnapshot {
    pub fn count(&self, heading: Heading) -> usize {
        self.per_heading[heading.index()]
    }

    pub fn phase(&self, axis: Axis) -> &PhaseView {
        match axis {
            Axis::NorthSouth => &self.north_south,
            Axis::EastWest => &self.east_west,
        }
    }

    pub fn total_agents(&self) -> usize {
        self.agents.len()
    }
}
