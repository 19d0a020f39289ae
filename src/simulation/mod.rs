//! Standalone intersection simulation module
//!
//! This module contains the signal controller, the vehicle decision model and
//! the world that steps them. It has no rendering or host dependencies and
//! can be driven from tests or a headless loop.

mod agent;
mod config;
mod intersection;
mod lane_occupancy;
mod phase_controller;
mod snapshot;
mod types;
mod world;

pub use agent::{Agent, Crossing, Decision, Neighbor, StopCause};
pub use config::{
    SimConfig, DEFAULT_GREEN_MS, DEFAULT_MAX_AGENTS, DEFAULT_SPAWN_RATE, DEFAULT_VEHICLE_SPEED,
    DEFAULT_YELLOW_MS,
};
pub use intersection::{IntersectionGeometry, DEFAULT_AREA_HEIGHT, DEFAULT_AREA_WIDTH};
pub use lane_occupancy::LaneOccupancy;
pub use phase_controller::{Phase, PhaseController};
pub use snapshot::{AgentView, PhaseView, SimStats, WorldSnapshot};
pub use types::{
    AgentId, Axis, Heading, Lane, LightState, Position, APPROACH_DISTANCE, COMMIT_LENGTHS,
    LANES_PER_HEADING, LANE_WIDTH, OFF_BOUNDS_MARGIN, ROAD_WIDTH, SAFE_DISTANCE, SPAWN_CLEARANCE,
    STOP_LINE_OFFSET, VEHICLE_LENGTH, VEHICLE_WIDTH,
};
pub use world::World;
