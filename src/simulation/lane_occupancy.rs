//! Per-lane index of vehicles ordered by track offset
//!
//! Rebuilt from the live agents whenever the world needs to ask "who is near
//! this point in this lane", so it never goes stale between ticks.

use ordered_float::OrderedFloat;
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::ops::Bound;

use super::agent::{Agent, Neighbor};
use super::types::{AgentId, Lane, SAFE_DISTANCE};

type OffsetKey = (OrderedFloat<f32>, AgentId);

/// Vehicles in each lane keyed by front offset
#[derive(Debug, Default)]
pub struct LaneOccupancy {
    lanes: HashMap<Lane, BTreeMap<OffsetKey, Neighbor>>,
    longest: f32,
}

impl LaneOccupancy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_agents(agents: &[Agent]) -> Self {
        let mut occupancy = Self::new();
        for agent in agents {
            occupancy.insert(agent.as_neighbor());
        }
        occupancy
    }

    pub fn insert(&mut self, neighbor: Neighbor) {
        self.longest = self.longest.max(neighbor.length);
        self.lanes
            .entry(neighbor.lane)
            .or_default()
            .insert((OrderedFloat(neighbor.front), neighbor.id), neighbor);
    }

    /// The nearest vehicle in `lane` whose front is strictly past `front`
    pub fn next_ahead(&self, lane: Lane, front: f32) -> Option<Neighbor> {
        let vehicles = self.lanes.get(&lane)?;
        let lower = Bound::Excluded((OrderedFloat(front), AgentId(usize::MAX)));
        vehicles
            .range((lower, Bound::Unbounded))
            .map(|(_, neighbor)| *neighbor)
            .next()
    }

    /// Vehicles in `lane` whose front lies within `[from, to]`, nearest first
    pub fn in_range(&self, lane: Lane, from: f32, to: f32) -> Vec<Neighbor> {
        let Some(vehicles) = self.lanes.get(&lane) else {
            return Vec::new();
        };
        // BTreeMap::range panics on an inverted range
        if from > to {
            return Vec::new();
        }

        let lower = Bound::Included((OrderedFloat(from), AgentId(usize::MIN)));
        let upper = Bound::Included((OrderedFloat(to), AgentId(usize::MAX)));
        vehicles
            .range((lower, upper))
            .map(|(_, neighbor)| *neighbor)
            .collect()
    }

    /// Same-lane vehicles close enough to matter for following at `front`
    pub fn nearby(&self, lane: Lane, front: f32) -> Vec<Neighbor> {
        self.in_range(
            lane,
            front - self.longest,
            front + SAFE_DISTANCE + self.longest,
        )
    }

    /// Whether no vehicle in `lane` has its front within `clearance` of `point`
    pub fn is_clear(&self, lane: Lane, point: f32, clearance: f32) -> bool {
        self.in_range(lane, point - clearance, point + clearance)
            .iter()
            .all(|neighbor| (neighbor.front - point).abs() >= clearance)
    }
}
