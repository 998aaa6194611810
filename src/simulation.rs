use crate::arena::Arena;
use crate::config::SimConfig;
use crate::conflict::find_blockers;
use crate::debug::{debug_line, debug_polygon};
#[cfg(feature = "debug")]
use crate::debug::take_debug_frame;
use crate::error::ConfigError;
use crate::stats::{Snapshot, StatsAggregator};
use crate::vehicle::{Direction, Vehicle, VehicleAttributes, VehicleView, VisualTag};
use crate::{VehicleId, VehicleSet};
use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Uniform};
use smallvec::SmallVec;
use std::time::Instant;

/// A simulation of a fixed population of vehicles crossing a single,
/// unsignalised four-way intersection.
///
/// The simulation does nothing until [initialize](Self::initialize) is called.
/// Calling [tick](Self::tick), [snapshot](Self::snapshot) or any other method
/// which needs vehicles before then is a programming error and panics.
pub struct Simulation {
    /// The parameters, validated on initialization.
    config: SimConfig,
    /// The running state, if initialized.
    state: Option<State>,
    /// The current frame of simulation.
    frame: usize,
    /// Debugging information from the previously simulated frame.
    #[cfg(feature = "debug")]
    debug: serde_json::Value,
}

/// Everything created by [Simulation::initialize].
struct State {
    /// The fixed geometry.
    arena: Arena,
    /// The vehicles being simulated.
    vehicles: VehicleSet,
    /// The number of vehicles, constant between initializations.
    population: usize,
    /// The spawn RNG.
    rng: StdRng,
    /// The distribution vehicle speeds are drawn from.
    speed: Uniform<f64>,
    /// Throughput and waiting statistics.
    stats: StatsAggregator,
}

/// What happened during a single [Simulation::tick].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    /// Each retired vehicle paired with the vehicle that replaced it.
    pub respawned: SmallVec<[(VehicleId, VehicleId); 2]>,
    /// The number of vehicles held back this tick.
    pub waiting: usize,
}

impl Simulation {
    /// Creates an uninitialized simulation with the given parameters.
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            state: None,
            frame: 0,
            #[cfg(feature = "debug")]
            debug: serde_json::Value::Null,
        }
    }

    /// Validates the configuration and populates the simulation with `count`
    /// freshly spawned vehicles, replacing any previous state.
    ///
    /// On error any previous state is discarded and the simulation is left
    /// uninitialized.
    pub fn initialize(&mut self, count: usize) -> Result<(), ConfigError> {
        self.state = None;
        self.frame = 0;
        self.config.validate()?;
        if count == 0 {
            return Err(ConfigError::EmptyPopulation);
        }

        let arena = Arena::new(&self.config);
        let rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let speed = Uniform::new(self.config.speed.min, self.config.speed.max);
        debug!(
            "initializing {} vehicles (seed {:?}), zone {:?} x {:?}",
            count,
            self.config.seed,
            arena.zone().x,
            arena.zone().y
        );

        let mut state = State {
            arena,
            vehicles: VehicleSet::with_capacity_and_key(count),
            population: count,
            rng,
            speed,
            stats: StatsAggregator::new(self.config.stats_interval, Instant::now()),
        };
        for _ in 0..count {
            state.spawn();
        }

        self.state = Some(state);
        Ok(())
    }

    /// Initializes the simulation with the configured default population.
    pub fn initialize_default(&mut self) -> Result<(), ConfigError> {
        self.initialize(self.config.population)
    }

    /// Whether [initialize](Self::initialize) has succeeded.
    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    /// Advances the simulation by one tick.
    ///
    /// Vehicles are visited in slot order. Each one in turn is checked for
    /// conflicts, moves unless it is waiting, and is replaced by a fresh
    /// vehicle if it has left the arena.
    pub fn tick(&mut self) -> TickReport {
        let state = self
            .state
            .as_mut()
            .expect("Simulation::tick called before Simulation::initialize");

        let report = state.step(self.config.proximity_radius);
        self.frame += 1;

        #[cfg(feature = "debug")]
        {
            self.debug = take_debug_frame();
        }

        report
    }

    /// Gets the current simulation frame index.
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Gets the parameters of the simulation.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Gets the geometry of the arena.
    pub fn arena(&self) -> &Arena {
        &self.state().arena
    }

    /// The number of vehicles, which never changes between initializations.
    pub fn population(&self) -> usize {
        self.state().population
    }

    /// Returns the renderable state of every vehicle, in slot order.
    pub fn snapshot(&self) -> Vec<VehicleView> {
        self.iter_vehicles().map(Vehicle::view).collect()
    }

    /// Returns an iterator over all the vehicles in the simulation.
    pub fn iter_vehicles(&self) -> impl Iterator<Item = &Vehicle> {
        self.state().vehicles.values()
    }

    /// Gets a reference to the vehicle with the given ID.
    pub fn get_vehicle(&self, vehicle_id: VehicleId) -> &Vehicle {
        &self.state().vehicles[vehicle_id]
    }

    /// Gets a reference to the vehicle with the given ID, if it still exists.
    pub fn try_get_vehicle(&self, vehicle_id: VehicleId) -> Option<&Vehicle> {
        self.state().vehicles.get(vehicle_id)
    }

    /// The number of vehicles held back on the last tick.
    pub fn waiting_count(&self) -> usize {
        self.iter_vehicles().filter(|veh| veh.waiting()).count()
    }

    /// Replaces a vehicle with one of the given attributes, returning the new ID.
    ///
    /// This does not count as a retirement.
    pub fn replace_vehicle(
        &mut self,
        vehicle_id: VehicleId,
        attributes: &VehicleAttributes,
    ) -> VehicleId {
        assert!(
            attributes.speed > 0.0 && attributes.speed.is_finite(),
            "vehicle speed must be positive"
        );
        let state = self
            .state
            .as_mut()
            .expect("Simulation::replace_vehicle called before Simulation::initialize");
        if state.vehicles.remove(vehicle_id).is_none() {
            panic!("no vehicle with ID {:?}", vehicle_id);
        }
        state
            .vehicles
            .insert_with_key(|id| Vehicle::new(id, attributes))
    }

    /// Gets the throughput and waiting statistics.
    pub fn stats(&self) -> &StatsAggregator {
        &self.state().stats
    }

    /// Closes the current statistics window if it has run its length.
    /// [Read more](StatsAggregator::maybe_flush).
    pub fn maybe_flush(&mut self, now: Instant) -> Option<Snapshot> {
        self.state
            .as_mut()
            .expect("Simulation::maybe_flush called before Simulation::initialize")
            .stats
            .maybe_flush(now)
    }

    /// Gets the debugging information for the previously simulated frame as JSON array.
    #[cfg(feature = "debug")]
    pub fn debug(&mut self) -> serde_json::Value {
        self.debug.clone()
    }

    fn state(&self) -> &State {
        self.state
            .as_ref()
            .expect("Simulation used before Simulation::initialize")
    }
}

impl State {
    /// Draws the attributes of a new vehicle at a random entry point.
    fn random_attributes(&mut self) -> VehicleAttributes {
        let direction = Direction::ALL[self.rng.gen_range(0..Direction::ALL.len())];
        let speed = self.speed.sample(&mut self.rng);
        let tag = VisualTag::ALL[self.rng.gen_range(0..VisualTag::ALL.len())];
        VehicleAttributes {
            direction,
            position: self.arena.entry_point(direction),
            speed,
            tag,
        }
    }

    /// Adds a randomly generated vehicle.
    fn spawn(&mut self) -> VehicleId {
        let attributes = self.random_attributes();
        self.vehicles
            .insert_with_key(|id| Vehicle::new(id, &attributes))
    }

    /// Runs a single pass over the vehicles in slot order. Each vehicle checks
    /// for conflicts against the current positions, so it sees vehicles earlier
    /// in the pass as already moved, then moves, then retires if it has left.
    ///
    /// A retired vehicle's slot is freed and immediately reused by its
    /// replacement, with the slot version bumped so the old ID stops resolving.
    /// The replacement is not visited again until the next tick.
    fn step(&mut self, radius: f64) -> TickReport {
        debug_polygon("zone", &self.arena.zone().corners());

        let mut report = TickReport::default();
        let ids: Vec<VehicleId> = self.vehicles.keys().collect();
        for vehicle_id in ids {
            let blockers = find_blockers(&self.vehicles, vehicle_id, self.arena.zone(), radius);
            let pos = self.vehicles[vehicle_id].position();
            for blocker in &blockers {
                debug_line("yield", pos, self.vehicles[*blocker].position());
            }

            let vehicle = &mut self.vehicles[vehicle_id];
            vehicle.set_blockers(blockers);
            vehicle.advance();
            if !self.arena.has_exited(vehicle.position(), vehicle.direction()) {
                continue;
            }

            self.vehicles.remove(vehicle_id);
            let new_id = self.spawn();
            trace!(
                "{:?} left the arena, replaced by {:?} heading {:?}",
                vehicle_id,
                new_id,
                self.vehicles[new_id].direction()
            );
            self.stats.record_retirement();
            report.respawned.push((vehicle_id, new_id));
        }

        report.waiting = self.vehicles.values().filter(|veh| veh.waiting()).count();
        self.stats.sample_waiting(report.waiting);
        report
    }
}
