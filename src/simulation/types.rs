//! Core types for the intersection simulation
//!
//! Closed enumerations for axes, headings and light colors, plus the
//! shared dimensions every other module measures against.

use std::fmt;

/// A unique identifier for a vehicle agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgentId(pub usize);

/// One of the two perpendicular traffic streams sharing a coupled light phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    NorthSouth,
    EastWest,
}

impl Axis {
    pub const ALL: [Axis; 2] = [Axis::NorthSouth, Axis::EastWest];

    /// The perpendicular axis
    pub fn other(self) -> Axis {
        match self {
            Axis::NorthSouth => Axis::EastWest,
            Axis::EastWest => Axis::NorthSouth,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::NorthSouth => write!(f, "NS"),
            Axis::EastWest => write!(f, "EW"),
        }
    }
}

/// Direction of travel of a vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Heading {
    North,
    South,
    East,
    West,
}

impl Heading {
    pub const ALL: [Heading; 4] = [Heading::North, Heading::South, Heading::East, Heading::West];

    /// The axis whose light controls this heading
    pub fn axis(self) -> Axis {
        match self {
            Heading::North | Heading::South => Axis::NorthSouth,
            Heading::East | Heading::West => Axis::EastWest,
        }
    }

    /// Unit vector of travel in screen coordinates (y grows downward)
    pub fn direction(self) -> (f32, f32) {
        match self {
            Heading::North => (0.0, -1.0),
            Heading::South => (0.0, 1.0),
            Heading::East => (1.0, 0.0),
            Heading::West => (-1.0, 0.0),
        }
    }

    /// Unit vector pointing to the driver's right
    pub fn right_hand(self) -> (f32, f32) {
        let (dx, dy) = self.direction();
        (-dy, dx)
    }

    pub fn index(self) -> usize {
        match self {
            Heading::North => 0,
            Heading::South => 1,
            Heading::East => 2,
            Heading::West => 3,
        }
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Heading::North => "north",
            Heading::South => "south",
            Heading::East => "east",
            Heading::West => "west",
        };
        f.write_str(name)
    }
}

/// Color shown by one axis's signal heads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightState {
    Green,
    Yellow,
    Red,
}

impl fmt::Display for LightState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LightState::Green => "green",
            LightState::Yellow => "yellow",
            LightState::Red => "red",
        };
        f.write_str(name)
    }
}

/// A lane on one approach: which way traffic flows and which of its lanes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Lane {
    pub heading: Heading,
    /// 0 is the inner lane next to the centerline, 1 the outer lane
    pub index: usize,
}

impl Lane {
    pub fn new(heading: Heading, index: usize) -> Self {
        Self { heading, index }
    }
}

/// A 2D position in the simulated area
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Width of each road, both directions together
pub const ROAD_WIDTH: f32 = 200.0;

/// Four lanes per road, two each way
pub const LANE_WIDTH: f32 = ROAD_WIDTH / 4.0;

/// Lanes available to each heading
pub const LANES_PER_HEADING: usize = 2;

/// Gap between the edge of the intersection box and the stop line
pub const STOP_LINE_OFFSET: f32 = 20.0;

/// Length of a vehicle along its heading
pub const VEHICLE_LENGTH: f32 = 30.0;

/// Width of a vehicle across its heading
pub const VEHICLE_WIDTH: f32 = 20.0;

/// Minimum bumper gap a follower keeps to the vehicle ahead
pub const SAFE_DISTANCE: f32 = VEHICLE_LENGTH * 3.0;

/// Spawns are rejected when a same-lane vehicle is closer than this
pub const SPAWN_CLEARANCE: f32 = SAFE_DISTANCE * 2.0;

/// Light rule only applies within this distance of the stop line
pub const APPROACH_DISTANCE: f32 = ROAD_WIDTH * 1.5;

/// On yellow, a vehicle closer than this many lengths to the stop line commits
pub const COMMIT_LENGTHS: f32 = 1.5;

/// How far past the exit edge a vehicle travels before it is removed
pub const OFF_BOUNDS_MARGIN: f32 = VEHICLE_LENGTH;
