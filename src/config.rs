use crate::error::ConfigError;
use crate::util::Interval;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The parameters of an intersection simulation.
///
/// All distances are in arena units and speeds in arena units per tick.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Side length of the square arena.
    pub arena_size: f64,
    /// Width of each of the two roads. Each direction drives in its own half.
    pub road_width: f64,
    /// How far the conflict zone extends beyond the edges of the road square.
    pub zone_margin: f64,
    /// Vehicles strictly closer than this are considered for conflict.
    pub proximity_radius: f64,
    /// The range vehicle speeds are drawn from, `[min, max)`.
    pub speed: Interval<f64>,
    /// Distance outside the arena edge at which vehicles are spawned.
    pub spawn_offset: f64,
    /// Distance outside the arena edge beyond which vehicles are retired.
    pub retire_margin: f64,
    /// The default population for [Simulation::initialize_default](crate::Simulation::initialize_default).
    pub population: usize,
    /// The length of a statistics reporting window.
    pub stats_interval: Duration,
    /// Seed for the spawn RNG, or `None` to seed from entropy.
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            arena_size: 400.0,
            road_width: 60.0,
            zone_margin: 30.0,
            proximity_radius: 40.0,
            speed: Interval::new(2.0, 3.5),
            spawn_offset: 20.0,
            retire_margin: 30.0,
            population: 8,
            stats_interval: Duration::from_secs(1),
            seed: None,
        }
    }
}

impl SimConfig {
    /// Half the road width.
    pub fn lane_width(&self) -> f64 {
        0.5 * self.road_width
    }

    /// The coordinate of the centre of the arena along either axis.
    pub fn centre(&self) -> f64 {
        0.5 * self.arena_size
    }

    /// Checks every parameter, returning the first one that is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        let non_negative = |v: f64| v.is_finite() && v >= 0.0;

        if !positive(self.arena_size) {
            return Err(ConfigError::ArenaSize(self.arena_size));
        }
        if !positive(self.road_width) || self.road_width > self.arena_size {
            return Err(ConfigError::RoadWidth(self.road_width));
        }
        if !non_negative(self.zone_margin) {
            return Err(ConfigError::ZoneMargin(self.zone_margin));
        }
        if !positive(self.proximity_radius) {
            return Err(ConfigError::ProximityRadius(self.proximity_radius));
        }
        if !self.speed.is_proper() || self.speed.min <= 0.0 {
            return Err(ConfigError::SpeedRange {
                min: self.speed.min,
                max: self.speed.max,
            });
        }
        if !non_negative(self.spawn_offset) {
            return Err(ConfigError::SpawnOffset(self.spawn_offset));
        }
        if !(self.retire_margin.is_finite() && self.retire_margin > self.spawn_offset) {
            return Err(ConfigError::RetireMargin {
                retire: self.retire_margin,
                spawn: self.spawn_offset,
            });
        }
        if self.stats_interval.is_zero() {
            return Err(ConfigError::StatsInterval(self.stats_interval));
        }
        Ok(())
    }
}
