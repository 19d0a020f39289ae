//! Runtime tuning parameters
//!
//! The host owns a `SimConfig` and may change it between ticks; the engine
//! only reads it at the start of each `tick`.

use anyhow::{ensure, Result};
use std::time::Duration;

/// Default green time per axis
pub const DEFAULT_GREEN_MS: u64 = 5000;

/// Default yellow time per axis
pub const DEFAULT_YELLOW_MS: u64 = 3000;

/// Default vehicle speed in units per second (2 units per 60 Hz frame)
pub const DEFAULT_VEHICLE_SPEED: f32 = 120.0;

/// Default spawn probability per tick (one attempt every 60 frames on average)
pub const DEFAULT_SPAWN_RATE: f64 = 1.0 / 60.0;

/// Default cap on live vehicles
pub const DEFAULT_MAX_AGENTS: usize = 30;

/// Externally tunable simulation parameters
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub green_duration: Duration,
    pub yellow_duration: Duration,
    /// Units per simulated second
    pub vehicle_speed: f32,
    /// Probability in `0..=1` that a spawn is attempted on a given tick
    pub spawn_rate: f64,
    pub max_agents: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            green_duration: Duration::from_millis(DEFAULT_GREEN_MS),
            yellow_duration: Duration::from_millis(DEFAULT_YELLOW_MS),
            vehicle_speed: DEFAULT_VEHICLE_SPEED,
            spawn_rate: DEFAULT_SPAWN_RATE,
            max_agents: DEFAULT_MAX_AGENTS,
        }
    }
}

impl SimConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_green_ms(mut self, millis: u64) -> Self {
        self.green_duration = Duration::from_millis(millis);
        self
    }

    pub fn with_yellow_ms(mut self, millis: u64) -> Self {
        self.yellow_duration = Duration::from_millis(millis);
        self
    }

    pub fn with_vehicle_speed(mut self, speed: f32) -> Self {
        self.vehicle_speed = speed;
        self
    }

    pub fn with_spawn_rate(mut self, rate: f64) -> Self {
        self.spawn_rate = rate;
        self
    }

    pub fn with_max_agents(mut self, max_agents: usize) -> Self {
        self.max_agents = max_agents;
        self
    }

    /// Red time is implied by the other axis's green plus yellow
    pub fn red_duration(&self) -> Duration {
        self.green_duration + self.yellow_duration
    }

    /// Check that the parameters describe a runnable simulation
    pub fn validate(&self) -> Result<()> {
        ensure!(
            !self.green_duration.is_zero(),
            "green duration must be greater than zero"
        );
        ensure!(
            !self.yellow_duration.is_zero(),
            "yellow duration must be greater than zero"
        );
        ensure!(
            self.vehicle_speed.is_finite() && self.vehicle_speed >= 0.0,
            "vehicle speed must be finite and non-negative, got {}",
            self.vehicle_speed
        );
        ensure!(
            (0.0..=1.0).contains(&self.spawn_rate),
            "spawn rate must be a probability in 0..=1, got {}",
            self.spawn_rate
        );
        Ok(())
    }
}
