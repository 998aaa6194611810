pub use arena::{Arena, IntersectionZone};
pub use cgmath;
pub use config::SimConfig;
pub use error::ConfigError;
pub use simulation::{Simulation, TickReport};
use slotmap::{new_key_type, SlotMap};
pub use slotmap::{Key, KeyData};
pub use stats::{Snapshot, StatsAggregator};
pub use util::Interval;
pub use vehicle::{Direction, Vehicle, VehicleAttributes, VehicleView, VisualTag};

mod arena;
mod config;
mod conflict;
mod debug;
mod error;
pub mod math;
mod simulation;
mod stats;
mod util;
mod vehicle;

new_key_type! {
    /// Unique ID of a [Vehicle].
    pub struct VehicleId;
}

type VehicleSet = SlotMap<VehicleId, Vehicle>;
