//! Fixed geometry derived from a [SimConfig].

use crate::config::SimConfig;
use crate::math::Point2d;
use crate::util::Interval;
use crate::vehicle::Direction;

/// The square region around the centre of the arena in which
/// vehicles are considered to be crossing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntersectionZone {
    /// The horizontal extents of the zone.
    pub x: Interval<f64>,
    /// The vertical extents of the zone.
    pub y: Interval<f64>,
}

impl IntersectionZone {
    /// Creates the zone for the given configuration.
    pub fn new(config: &SimConfig) -> Self {
        let half = 0.5 * config.road_width + config.zone_margin;
        let extents = Interval::disc(config.centre(), half);
        Self {
            x: extents,
            y: extents,
        }
    }

    /// Whether the point lies strictly inside the zone.
    pub fn contains(&self, point: Point2d) -> bool {
        self.x.interior_contains(point.x) && self.y.interior_contains(point.y)
    }

    /// The corners of the zone, clockwise from the top left.
    pub fn corners(&self) -> [Point2d; 4] {
        [
            Point2d::new(self.x.min, self.y.min),
            Point2d::new(self.x.max, self.y.min),
            Point2d::new(self.x.max, self.y.max),
            Point2d::new(self.x.min, self.y.max),
        ]
    }
}

/// The arena a simulation runs in: its conflict zone, entry points and exit bounds.
///
/// Coordinates follow screen conventions, with `y` increasing southward.
#[derive(Clone, Debug)]
pub struct Arena {
    size: f64,
    zone: IntersectionZone,
    entries: [Point2d; 4],
    retire_margin: f64,
}

impl Arena {
    pub fn new(config: &SimConfig) -> Self {
        let size = config.arena_size;
        let c = config.centre();
        let half_lane = 0.5 * config.lane_width();
        let off = config.spawn_offset;
        let entries = Direction::ALL.map(|dir| match dir {
            Direction::North => Point2d::new(c + half_lane, size + off),
            Direction::East => Point2d::new(-off, c + half_lane),
            Direction::South => Point2d::new(c - half_lane, -off),
            Direction::West => Point2d::new(size + off, c - half_lane),
        });
        Self {
            size,
            zone: IntersectionZone::new(config),
            entries,
            retire_margin: config.retire_margin,
        }
    }

    /// The side length of the arena.
    pub fn size(&self) -> f64 {
        self.size
    }

    /// The intersection zone.
    pub fn zone(&self) -> &IntersectionZone {
        &self.zone
    }

    /// The point at which vehicles heading in `dir` are spawned.
    pub fn entry_point(&self, dir: Direction) -> Point2d {
        self.entries[dir.index()]
    }

    /// All four entry points, indexed in [Direction::ALL] order.
    pub fn entry_points(&self) -> &[Point2d; 4] {
        &self.entries
    }

    /// Whether a vehicle at `pos` heading in `dir` has passed beyond
    /// the arena edge plus the retire margin.
    pub fn has_exited(&self, pos: Point2d, dir: Direction) -> bool {
        let m = self.retire_margin;
        match dir {
            Direction::North => pos.y < -m,
            Direction::East => pos.x > self.size + m,
            Direction::South => pos.y > self.size + m,
            Direction::West => pos.x < -m,
        }
    }
}
