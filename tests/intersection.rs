//! Tests that drive a whole simulation through its public API.

use assert_approx_eq::assert_approx_eq;
use intersection_sim::{
    math::Point2d, ConfigError, Direction, SimConfig, Simulation, VehicleAttributes, VehicleId,
    VisualTag,
};
use std::collections::HashMap;
use std::time::{Duration, Instant};

fn seeded(seed: u64) -> Simulation {
    Simulation::new(SimConfig {
        seed: Some(seed),
        ..Default::default()
    })
}

/// A simulation with `count` vehicles whose IDs are returned in slot order.
fn with_vehicles(count: usize) -> (Simulation, Vec<VehicleId>) {
    let mut sim = seeded(7);
    sim.initialize(count).unwrap();
    let ids = sim.iter_vehicles().map(|veh| veh.id()).collect();
    (sim, ids)
}

fn place(
    sim: &mut Simulation,
    id: VehicleId,
    direction: Direction,
    x: f64,
    y: f64,
    speed: f64,
) -> VehicleId {
    sim.replace_vehicle(
        id,
        &VehicleAttributes {
            direction,
            position: Point2d::new(x, y),
            speed,
            tag: VisualTag::Cyan,
        },
    )
}

/// Test that the number of vehicles never changes.
#[test]
fn population_is_constant() {
    let mut sim = seeded(1);
    sim.initialize(8).unwrap();
    for _ in 0..2000 {
        sim.tick();
        assert_eq!(sim.snapshot().len(), 8);
        assert_eq!(sim.population(), 8);
    }
    assert!(sim.stats().total_retired() > 0);
}

/// Test that a vehicle keeps its heading until it is retired.
#[test]
fn directions_never_change() {
    let mut sim = seeded(2);
    sim.initialize(12).unwrap();
    let mut seen: HashMap<VehicleId, Direction> = HashMap::new();
    for _ in 0..1500 {
        sim.tick();
        for view in sim.snapshot() {
            let dir = *seen.entry(view.id).or_insert(view.direction);
            assert_eq!(dir, view.direction);
        }
    }
}

/// Test that each retirement is paired with a spawn at an entry point.
#[test]
fn retired_vehicles_are_replaced_at_entry_points() {
    let mut sim = seeded(3);
    sim.initialize(8).unwrap();
    let mut retirements = 0;
    for _ in 0..2000 {
        let report = sim.tick();
        for (old, new) in report.respawned {
            retirements += 1;
            assert!(sim.try_get_vehicle(old).is_none());
            let veh = sim.get_vehicle(new);
            assert_eq!(veh.position(), sim.arena().entry_point(veh.direction()));
            assert!(!veh.waiting());
            let speed = sim.config().speed;
            assert!(veh.speed() >= speed.min && veh.speed() < speed.max);
        }
    }
    assert!(retirements > 0);
    assert_eq!(sim.stats().total_retired(), retirements);
}

/// Test that a waiting vehicle does not move on the tick it waits.
#[test]
fn waiting_vehicles_do_not_move() {
    let mut sim = seeded(4);
    sim.initialize(16).unwrap();
    let mut waits = 0;
    for _ in 0..2000 {
        let before: HashMap<_, _> = sim
            .iter_vehicles()
            .map(|veh| (veh.id(), veh.position()))
            .collect();
        let report = sim.tick();
        assert_eq!(report.waiting, sim.waiting_count());
        for veh in sim.iter_vehicles().filter(|veh| veh.waiting()) {
            waits += 1;
            assert_eq!(Some(&veh.position()), before.get(&veh.id()));
            assert!(!veh.blockers().is_empty());
        }
    }
    assert!(waits > 0);
}

/// Test that the lower priority of two conflicting vehicles waits.
#[test]
fn lower_priority_vehicle_waits() {
    let pairs = [
        (Direction::North, Direction::East),
        (Direction::North, Direction::West),
        (Direction::East, Direction::South),
        (Direction::South, Direction::West),
    ];
    for (high, low) in pairs {
        let (mut sim, ids) = with_vehicles(2);
        let a = place(&mut sim, ids[0], high, 200.0, 200.0, 2.0);
        let b = place(&mut sim, ids[1], low, 210.0, 210.0, 2.0);
        sim.tick();
        assert!(!sim.get_vehicle(a).waiting(), "{:?} should not wait", high);
        assert!(sim.get_vehicle(b).waiting(), "{:?} should wait", low);
        assert_eq!(sim.get_vehicle(b).blockers(), &[a]);
    }
}

/// Test the crossing of a northbound and a westbound vehicle.
#[test]
fn westbound_yields_to_northbound() {
    let (mut sim, ids) = with_vehicles(2);
    let north = place(&mut sim, ids[0], Direction::North, 215.0, 220.0, 2.5);
    let west = place(&mut sim, ids[1], Direction::West, 240.0, 190.0, 3.0);

    let report = sim.tick();
    assert_eq!(report.waiting, 1);
    assert!(report.respawned.is_empty());

    let north = sim.get_vehicle(north);
    assert!(!north.waiting());
    assert_approx_eq!(north.position().x, 215.0);
    assert_approx_eq!(north.position().y, 217.5);

    let west = sim.get_vehicle(west);
    assert!(west.waiting());
    assert_eq!(west.position(), Point2d::new(240.0, 190.0));
}

/// Test that a vehicle sees earlier slots as already moved this tick.
#[test]
fn vehicle_entering_zone_blocks_later_slot() {
    let (mut sim, ids) = with_vehicles(2);
    // Moves from just outside the zone to y = 259 this tick.
    let north = place(&mut sim, ids[0], Direction::North, 215.0, 261.0, 2.0);
    let west = place(&mut sim, ids[1], Direction::West, 230.0, 250.0, 2.0);

    let report = sim.tick();
    assert_eq!(report.waiting, 1);
    assert_approx_eq!(sim.get_vehicle(north).position().y, 259.0);
    let west = sim.get_vehicle(west);
    assert!(west.waiting());
    assert_eq!(west.blockers(), &[north]);
    assert_eq!(west.position(), Point2d::new(230.0, 250.0));
}

/// Test that a vehicle in a later slot has not yet moved when an earlier one is checked.
#[test]
fn vehicle_entering_zone_does_not_block_earlier_slot() {
    let (mut sim, ids) = with_vehicles(2);
    let west = place(&mut sim, ids[0], Direction::West, 230.0, 250.0, 2.0);
    let _north = place(&mut sim, ids[1], Direction::North, 215.0, 261.0, 2.0);

    let report = sim.tick();
    assert_eq!(report.waiting, 0);
    let west = sim.get_vehicle(west);
    assert!(!west.waiting());
    assert_approx_eq!(west.position().x, 228.0);
}

/// Test that a replacement takes over the retired vehicle's slot.
#[test]
fn replacement_reuses_slot() {
    let (mut sim, ids) = with_vehicles(3);
    let margin = sim.config().retire_margin;
    let leaving = place(&mut sim, ids[1], Direction::West, -margin, 185.0, 2.0);
    let order: Vec<_> = sim.snapshot().iter().map(|view| view.id).collect();
    let slot = order.iter().position(|id| *id == leaving).unwrap();

    let report = sim.tick();
    assert_eq!(report.respawned.len(), 1);
    let (old, new) = report.respawned[0];
    assert_eq!(old, leaving);
    assert_ne!(old, new);
    assert_eq!(sim.snapshot()[slot].id, new);
}

/// Test that a vehicle outside the zone does not hold anyone back.
#[test]
fn approaching_vehicle_does_not_block() {
    let (mut sim, ids) = with_vehicles(2);
    let _north = place(&mut sim, ids[0], Direction::North, 215.0, 290.0, 2.0);
    let west = place(&mut sim, ids[1], Direction::West, 230.0, 265.0, 2.0);
    sim.tick();
    let west = sim.get_vehicle(west);
    assert!(!west.waiting());
    assert_approx_eq!(west.position().x, 228.0);
}

/// Test that a vehicle leaving the arena is replaced and counted.
#[test]
fn vehicle_leaving_arena_is_retired() {
    let (mut sim, ids) = with_vehicles(2);
    let margin = sim.config().retire_margin;
    let leaving = place(&mut sim, ids[0], Direction::North, 215.0, -margin, 2.0);

    let report = sim.tick();
    assert_eq!(report.respawned.len(), 1);
    assert_eq!(report.respawned[0].0, leaving);
    assert!(sim.try_get_vehicle(leaving).is_none());
    assert_eq!(sim.snapshot().len(), 2);
    assert_eq!(sim.stats().pending_retirements(), 1);

    let snapshot = sim
        .maybe_flush(Instant::now() + Duration::from_secs(2))
        .unwrap();
    assert!(snapshot.throughput >= 1);
    assert_eq!(sim.stats().pending_retirements(), 0);
}

/// Test that snapshots are only produced once per window.
#[test]
fn stats_flush_once_per_window() {
    let (mut sim, _) = with_vehicles(4);
    assert_eq!(sim.maybe_flush(Instant::now()), None);
    let later = Instant::now() + Duration::from_secs(1);
    assert!(sim.maybe_flush(later).is_some());
    assert_eq!(sim.maybe_flush(later + Duration::from_millis(400)), None);
    assert!(sim.maybe_flush(later + Duration::from_secs(1)).is_some());
}

/// Test that the waiting count reported matches the last tick.
#[test]
fn stats_report_waiting_count() {
    let (mut sim, ids) = with_vehicles(2);
    place(&mut sim, ids[0], Direction::North, 215.0, 220.0, 2.5);
    place(&mut sim, ids[1], Direction::West, 240.0, 190.0, 3.0);
    sim.tick();
    let snapshot = sim
        .maybe_flush(Instant::now() + Duration::from_secs(1))
        .unwrap();
    assert_eq!(snapshot.waiting_count, 1);
    assert_eq!(snapshot.throughput, 0);
}

/// Test that the same seed gives the same run.
#[test]
fn seeded_runs_are_reproducible() {
    let mut a = seeded(42);
    let mut b = seeded(42);
    a.initialize(10).unwrap();
    b.initialize(10).unwrap();
    for _ in 0..500 {
        assert_eq!(a.tick(), b.tick());
        assert_eq!(a.snapshot(), b.snapshot());
    }
}

/// Test that re-initializing starts afresh.
#[test]
fn reinitialize_resets_state() {
    let mut sim = seeded(5);
    sim.initialize(8).unwrap();
    for _ in 0..300 {
        sim.tick();
    }
    sim.initialize(3).unwrap();
    assert_eq!(sim.frame(), 0);
    assert_eq!(sim.population(), 3);
    assert_eq!(sim.stats().total_retired(), 0);
    for view in sim.snapshot() {
        assert_eq!(view.position, sim.arena().entry_point(view.direction));
        assert!(!view.waiting);
    }
}

/// Test that bad parameters are rejected when initializing.
#[test]
fn initialize_rejects_bad_config() {
    let mut sim = Simulation::new(SimConfig::default());
    assert_eq!(sim.initialize(0), Err(ConfigError::EmptyPopulation));
    assert!(!sim.is_initialized());

    let mut sim = Simulation::new(SimConfig {
        proximity_radius: 0.0,
        ..Default::default()
    });
    assert_eq!(sim.initialize(8), Err(ConfigError::ProximityRadius(0.0)));
    assert!(!sim.is_initialized());
}

/// Test that a failed re-initialization does not keep the old vehicles.
#[test]
fn failed_reinitialize_clears_state() {
    let mut sim = seeded(6);
    sim.initialize(8).unwrap();
    sim.tick();
    assert_eq!(sim.initialize(0), Err(ConfigError::EmptyPopulation));
    assert!(!sim.is_initialized());
    assert_eq!(sim.frame(), 0);
}

#[test]
#[should_panic(expected = "before Simulation::initialize")]
fn tick_before_initialize_panics() {
    let mut sim = Simulation::new(SimConfig::default());
    sim.tick();
}

#[test]
#[should_panic(expected = "before Simulation::initialize")]
fn snapshot_before_initialize_panics() {
    let sim = Simulation::new(SimConfig::default());
    sim.snapshot();
}
