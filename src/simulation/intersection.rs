//! Geometry of the simulated intersection
//!
//! Vehicles travel along straight tracks that cross the whole area. A track
//! is measured by the 1-D offset of a vehicle's front bumper from the edge it
//! entered through, so every stop line and box edge is a single number per
//! heading.

use anyhow::{ensure, Result};

use super::types::{
    Heading, Lane, Position, APPROACH_DISTANCE, LANE_WIDTH, OFF_BOUNDS_MARGIN, ROAD_WIDTH,
    STOP_LINE_OFFSET, VEHICLE_LENGTH,
};

/// Default simulated area, matching an 800x600 canvas
pub const DEFAULT_AREA_WIDTH: f32 = 800.0;
pub const DEFAULT_AREA_HEIGHT: f32 = 600.0;

/// A single four-way crossing in the middle of a rectangular area
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionGeometry {
    width: f32,
    height: f32,
}

impl Default for IntersectionGeometry {
    fn default() -> Self {
        Self {
            width: DEFAULT_AREA_WIDTH,
            height: DEFAULT_AREA_HEIGHT,
        }
    }
}

impl IntersectionGeometry {
    /// An area of `width` x `height` with the intersection at its center
    pub fn new(width: f32, height: f32) -> Result<Self> {
        // Each approach needs room for one vehicle before the stop line
        let min_extent = ROAD_WIDTH / 2.0 + STOP_LINE_OFFSET + VEHICLE_LENGTH;
        ensure!(
            width.is_finite() && height.is_finite(),
            "area dimensions must be finite"
        );
        ensure!(
            width / 2.0 >= min_extent && height / 2.0 >= min_extent,
            "area {}x{} is too small, each side must be at least {}",
            width,
            height,
            min_extent * 2.0
        );
        Ok(Self { width, height })
    }

    /// Center of the intersection box
    pub fn center(&self) -> Position {
        Position::new(self.width / 2.0, self.height / 2.0)
    }

    /// Distance from the entry edge to the center for `heading`
    pub fn extent(&self, heading: Heading) -> f32 {
        match heading {
            Heading::North | Heading::South => self.height / 2.0,
            Heading::East | Heading::West => self.width / 2.0,
        }
    }

    /// Length of the track from entry edge to exit edge
    pub fn track_length(&self, heading: Heading) -> f32 {
        self.extent(heading) * 2.0
    }

    /// Offset of the stop line on the approach of `heading`
    pub fn stop_line(&self, heading: Heading) -> f32 {
        self.extent(heading) - ROAD_WIDTH / 2.0 - STOP_LINE_OFFSET
    }

    /// Offsets where the intersection box begins and ends along `heading`
    pub fn box_span(&self, heading: Heading) -> (f32, f32) {
        let extent = self.extent(heading);
        (extent - ROAD_WIDTH / 2.0, extent + ROAD_WIDTH / 2.0)
    }

    /// The light rule applies only this far ahead of the stop line
    pub fn approach_distance(&self) -> f32 {
        APPROACH_DISTANCE
    }

    /// Offset at which new vehicles appear, front bumper on the entry edge
    pub fn spawn_offset(&self) -> f32 {
        0.0
    }

    /// Whether a vehicle whose front is at `front` has left the area for good
    pub fn is_off_bounds(&self, heading: Heading, front: f32, length: f32) -> bool {
        front - length > self.track_length(heading) + OFF_BOUNDS_MARGIN
    }

    /// Screen position of a point `offset` along the center of `lane`
    pub fn point_on_lane(&self, lane: Lane, offset: f32) -> Position {
        let center = self.center();
        let (dx, dy) = lane.heading.direction();
        let (rx, ry) = lane.heading.right_hand();
        let lateral = LANE_WIDTH * (0.5 + lane.index as f32);
        let along = offset - self.extent(lane.heading);

        Position::new(
            center.x + dx * along + rx * lateral,
            center.y + dy * along + ry * lateral,
        )
    }
}
