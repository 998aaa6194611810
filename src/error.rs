use std::time::Duration;
use thiserror::Error;

/// A rejected simulation parameter.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("arena size must be positive and finite, got {0}")]
    ArenaSize(f64),
    #[error("road width must be positive, finite and no wider than the arena, got {0}")]
    RoadWidth(f64),
    #[error("zone margin must be non-negative and finite, got {0}")]
    ZoneMargin(f64),
    #[error("proximity radius must be positive and finite, got {0}")]
    ProximityRadius(f64),
    #[error("speed range must be finite, positive and non-empty, got [{min}, {max})")]
    SpeedRange { min: f64, max: f64 },
    #[error("spawn offset must be non-negative and finite, got {0}")]
    SpawnOffset(f64),
    #[error("retire margin ({retire}) must exceed the spawn offset ({spawn})")]
    RetireMargin { retire: f64, spawn: f64 },
    #[error("stats interval must be non-zero, got {0:?}")]
    StatsInterval(Duration),
    #[error("vehicle population must be at least one")]
    EmptyPopulation,
}
