//! Signal phase controller for the intersection
//!
//! Both axes share one state machine: exactly one axis is "active" and shows
//! green or yellow while the other shows red. Handing the right of way to the
//! other axis is a single assignment, so no tick can observe both axes red or
//! both axes non-red.

use anyhow::{bail, Result};
use log::debug;
use std::time::Duration;

use super::config::SimConfig;
use super::types::{Axis, LightState};

/// Light color and timer of one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Phase {
    pub state: LightState,
    /// Time spent in `state`; always zero for a red axis
    pub elapsed: Duration,
}

impl Phase {
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }
}

/// The color of the axis that currently holds the right of way
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActiveLight {
    Green,
    Yellow,
}

impl From<ActiveLight> for LightState {
    fn from(light: ActiveLight) -> Self {
        match light {
            ActiveLight::Green => LightState::Green,
            ActiveLight::Yellow => LightState::Yellow,
        }
    }
}

/// Owns the north-south and east-west signal phases
#[derive(Debug, Clone)]
pub struct PhaseController {
    active: Axis,
    light: ActiveLight,
    elapsed: Duration,
    cycles_completed: u64,
}

impl Default for PhaseController {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseController {
    /// North-south starts green, east-west red
    pub fn new() -> Self {
        Self {
            active: Axis::NorthSouth,
            light: ActiveLight::Green,
            elapsed: Duration::ZERO,
            cycles_completed: 0,
        }
    }

    /// Build a controller with `axis` showing `state`; the other axis is red
    pub fn from_parts(axis: Axis, state: LightState, elapsed: Duration) -> Result<Self> {
        let light = match state {
            LightState::Green => ActiveLight::Green,
            LightState::Yellow => ActiveLight::Yellow,
            LightState::Red => bail!("the active axis {} cannot be red", axis),
        };
        Ok(Self {
            active: axis,
            light,
            elapsed,
            cycles_completed: 0,
        })
    }

    /// Advance the non-red axis by `dt`.
    ///
    /// Returns `Some(axis)` when `axis` finished its yellow and turned red; the
    /// other axis is green with a zero timer by the time this returns.
    pub fn advance(&mut self, dt: Duration, config: &SimConfig) -> Option<Axis> {
        self.elapsed = self.elapsed.saturating_add(dt);

        let completed = match self.light {
            ActiveLight::Green => {
                if self.elapsed >= config.green_duration {
                    debug!("{} green -> yellow after {:?}", self.active, self.elapsed);
                    self.light = ActiveLight::Yellow;
                    self.elapsed = Duration::ZERO;
                }
                None
            }
            ActiveLight::Yellow => {
                if self.elapsed >= config.yellow_duration {
                    let finished = self.active;
                    debug!(
                        "{} yellow -> red after {:?}, {} -> green",
                        finished,
                        self.elapsed,
                        finished.other()
                    );
                    self.active = finished.other();
                    self.light = ActiveLight::Green;
                    self.elapsed = Duration::ZERO;
                    self.cycles_completed += 1;
                    Some(finished)
                } else {
                    None
                }
            }
        };

        debug_assert!(
            Axis::ALL
                .iter()
                .filter(|axis| self.state_of(**axis) != LightState::Red)
                .count()
                == 1,
            "exactly one axis must hold the right of way"
        );

        completed
    }

    pub fn state_of(&self, axis: Axis) -> LightState {
        if axis == self.active {
            self.light.into()
        } else {
            LightState::Red
        }
    }

    pub fn phase(&self, axis: Axis) -> Phase {
        if axis == self.active {
            Phase {
                state: self.light.into(),
                elapsed: self.elapsed,
            }
        } else {
            Phase {
                state: LightState::Red,
                elapsed: Duration::ZERO,
            }
        }
    }

    /// The axis currently showing green or yellow
    pub fn active_axis(&self) -> Axis {
        self.active
    }

    /// Number of yellow -> red hand-overs so far
    pub fn cycles_completed(&self) -> u64 {
        self.cycles_completed
    }
}
