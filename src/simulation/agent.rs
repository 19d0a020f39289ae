//! Vehicle agents and their stop/proceed rule
//!
//! An agent only knows its own track offset; the caller hands it the light
//! for its axis and the same-lane vehicles around it each tick.

use super::intersection::IntersectionGeometry;
use super::types::{
    AgentId, Heading, Lane, LightState, Position, COMMIT_LENGTHS, SAFE_DISTANCE, VEHICLE_LENGTH,
    VEHICLE_WIDTH,
};

/// Where an agent stands relative to the stop line and the box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crossing {
    /// Before the stop line with no obligation to cross
    Approaching,
    /// Decided on yellow to cross; the light rule no longer stops it
    Committed,
    /// Past the stop line and still clearing the box
    InBox { committed: bool },
    /// Center has left the box; nothing left to cross
    Cleared,
}

/// Why an agent is held this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopCause {
    /// Too close to the vehicle ahead in the same lane
    Following,
    /// Red, or yellow too far from the stop line to commit
    Signal,
}

/// Outcome of `Agent::decide`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Proceed,
    Stop(StopCause),
}

impl Decision {
    pub fn is_stop(&self) -> bool {
        matches!(self, Decision::Stop(_))
    }
}

/// What an agent needs to know about another vehicle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub id: AgentId,
    pub lane: Lane,
    pub front: f32,
    pub length: f32,
}

/// A vehicle in the simulation
#[derive(Debug, Clone)]
pub struct Agent {
    pub id: AgentId,
    pub heading: Heading,
    pub lane_index: usize,
    /// Offset of the front bumper from the entry edge
    front: f32,
    pub length: f32,
    pub width: f32,
    /// Units per simulated second
    pub speed: f32,
    pub waiting: bool,
    /// Consecutive ticks spent waiting
    pub wait_ticks: u32,
    crossing: Crossing,
}

impl Agent {
    pub fn new(id: AgentId, heading: Heading, lane_index: usize, front: f32, speed: f32) -> Self {
        Self {
            id,
            heading,
            lane_index,
            front,
            length: VEHICLE_LENGTH,
            width: VEHICLE_WIDTH,
            speed,
            waiting: false,
            wait_ticks: 0,
            crossing: Crossing::Approaching,
        }
    }

    pub fn lane(&self) -> Lane {
        Lane::new(self.heading, self.lane_index)
    }

    pub fn front(&self) -> f32 {
        self.front
    }

    /// Offset of the geometric center along the track
    pub fn center_offset(&self) -> f32 {
        self.front - self.length / 2.0
    }

    pub fn crossing(&self) -> Crossing {
        self.crossing
    }

    pub fn committed_to_cross(&self) -> bool {
        matches!(
            self.crossing,
            Crossing::Committed | Crossing::InBox { committed: true }
        )
    }

    pub fn has_entered_box(&self) -> bool {
        matches!(self.crossing, Crossing::InBox { .. })
    }

    pub fn as_neighbor(&self) -> Neighbor {
        Neighbor {
            id: self.id,
            lane: self.lane(),
            front: self.front,
            length: self.length,
        }
    }

    /// Screen position of the vehicle's center
    pub fn position(&self, geometry: &IntersectionGeometry) -> Position {
        geometry.point_on_lane(self.lane(), self.center_offset())
    }

    /// Remaining distance from the front bumper to the stop line
    pub fn distance_to_stop_line(&self, geometry: &IntersectionGeometry) -> f32 {
        geometry.stop_line(self.heading) - self.front
    }

    pub fn has_passed_stop_line(&self, geometry: &IntersectionGeometry) -> bool {
        self.front > geometry.stop_line(self.heading)
    }

    pub fn is_approaching(&self, geometry: &IntersectionGeometry) -> bool {
        let distance = self.distance_to_stop_line(geometry);
        (0.0..=geometry.approach_distance()).contains(&distance)
    }

    /// Whether the vehicle's center lies inside the intersection box
    pub fn is_in_box(&self, geometry: &IntersectionGeometry) -> bool {
        let (start, end) = geometry.box_span(self.heading);
        let center = self.center_offset();
        center > start && center < end
    }

    /// Smallest bumper gap to a same-lane vehicle ahead, if any.
    ///
    /// Gaps down to `-length` still count as "ahead" so that overlapping
    /// vehicles hold the follower back instead of being ignored.
    pub fn gap_ahead(&self, neighbors: &[Neighbor]) -> Option<f32> {
        let lane = self.lane();
        neighbors
            .iter()
            .filter(|other| other.id != self.id && other.lane == lane)
            .map(|other| (other.front - other.length) - self.front)
            .filter(|gap| *gap > -self.length)
            .min_by(|a, b| a.total_cmp(b))
    }

    /// Decide whether to stop this tick and record the result in `waiting`
    pub fn decide(
        &mut self,
        light: LightState,
        neighbors: &[Neighbor],
        geometry: &IntersectionGeometry,
    ) -> Decision {
        let decision = self.evaluate(light, neighbors, geometry);
        self.waiting = decision.is_stop();
        decision
    }

    fn evaluate(
        &mut self,
        light: LightState,
        neighbors: &[Neighbor],
        geometry: &IntersectionGeometry,
    ) -> Decision {
        if let Crossing::InBox { .. } = self.crossing {
            let (_, box_end) = geometry.box_span(self.heading);
            if self.center_offset() >= box_end {
                self.crossing = Crossing::Cleared;
            }
        }

        if self.has_passed_stop_line(geometry) {
            if self.crossing != Crossing::Cleared {
                self.crossing = Crossing::InBox {
                    committed: self.committed_to_cross(),
                };
            }
            return Decision::Proceed;
        }

        if let Some(gap) = self.gap_ahead(neighbors) {
            if gap < SAFE_DISTANCE {
                return Decision::Stop(StopCause::Following);
            }
        }

        if self.is_approaching(geometry) {
            match light {
                LightState::Red => {
                    if !self.committed_to_cross() {
                        return Decision::Stop(StopCause::Signal);
                    }
                }
                LightState::Yellow => {
                    let distance = self.distance_to_stop_line(geometry);
                    if self.committed_to_cross() || distance < self.length * COMMIT_LENGTHS {
                        self.crossing = Crossing::Committed;
                    } else {
                        return Decision::Stop(StopCause::Signal);
                    }
                }
                LightState::Green => {}
            }
        }

        Decision::Proceed
    }

    /// Advance along the heading unless waiting
    pub fn move_by(&mut self, dt: f32) {
        self.move_within(dt, f32::INFINITY);
    }

    /// Like `move_by`, but never travel further than `room`
    pub fn move_within(&mut self, dt: f32, room: f32) {
        if self.waiting {
            self.wait_ticks = self.wait_ticks.saturating_add(1);
            return;
        }

        self.wait_ticks = 0;
        self.front += (self.speed * dt).min(room.max(0.0));
    }

    /// Bumper gap to the closest vehicle whose front is ahead of ours
    pub fn room_behind(&self, ahead: &Neighbor) -> f32 {
        (ahead.front - ahead.length) - self.front
    }
}
