use crate::math::{Point2d, Vector2d};
use crate::VehicleId;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// The heading of a vehicle. Vehicles never turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// All directions, from highest to lowest priority.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub(crate) fn index(self) -> usize {
        self as usize
    }

    /// The priority rank of the direction; 0 is the highest.
    pub fn rank(self) -> u8 {
        self as u8
    }

    /// Whether a vehicle heading this way gives way to one heading `other`.
    ///
    /// The order is total and static: North > East > South > West.
    pub fn yields_to(self, other: Direction) -> bool {
        self.rank() > other.rank()
    }

    /// A unit vector along the heading, with `y` increasing southward.
    pub fn unit(self) -> Vector2d {
        match self {
            Direction::North => Vector2d::new(0.0, -1.0),
            Direction::East => Vector2d::new(1.0, 0.0),
            Direction::South => Vector2d::new(0.0, 1.0),
            Direction::West => Vector2d::new(-1.0, 0.0),
        }
    }
}

/// The colour class a renderer paints a vehicle with. Has no effect on behaviour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum VisualTag {
    Cyan,
    Green,
    Amber,
    Violet,
}

impl VisualTag {
    pub const ALL: [VisualTag; 4] = [
        VisualTag::Cyan,
        VisualTag::Green,
        VisualTag::Amber,
        VisualTag::Violet,
    ];

    /// The tag's colour as a CSS hex string.
    pub fn hex(self) -> &'static str {
        match self {
            VisualTag::Cyan => "#00d4ff",
            VisualTag::Green => "#22c55e",
            VisualTag::Amber => "#f59e0b",
            VisualTag::Violet => "#8b5cf6",
        }
    }
}

/// A simulated vehicle.
#[derive(Clone, Debug)]
pub struct Vehicle {
    /// The vehicle's ID
    id: VehicleId,
    /// The world space coordinates of the centre of the vehicle.
    pos: Point2d,
    /// The fixed heading.
    dir: Direction,
    /// Distance travelled per tick when not waiting.
    speed: f64,
    /// Whether motion was suppressed on the last tick.
    waiting: bool,
    /// The vehicles that caused it to wait on the last tick.
    blockers: SmallVec<[VehicleId; 4]>,
    /// Cosmetic colour class.
    tag: VisualTag,
}

/// The attributes of a vehicle at spawn time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VehicleAttributes {
    /// The vehicle's heading for its whole lifetime.
    pub direction: Direction,
    /// The initial position.
    pub position: Point2d,
    /// Distance travelled per tick, must be positive.
    pub speed: f64,
    /// Cosmetic colour class.
    pub tag: VisualTag,
}

/// A read-only, point-in-time view of a vehicle for renderers.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VehicleView {
    pub id: VehicleId,
    pub position: Point2d,
    pub direction: Direction,
    pub waiting: bool,
    pub tag: VisualTag,
}

impl Vehicle {
    /// Creates a new vehicle.
    pub(crate) fn new(id: VehicleId, attributes: &VehicleAttributes) -> Self {
        Self {
            id,
            pos: attributes.position,
            dir: attributes.direction,
            speed: attributes.speed,
            waiting: false,
            blockers: SmallVec::new(),
            tag: attributes.tag,
        }
    }

    /// Gets the vehicle's ID.
    pub fn id(&self) -> VehicleId {
        self.id
    }

    /// The coordinates in world space of the centre of the vehicle.
    pub fn position(&self) -> Point2d {
        self.pos
    }

    /// The vehicle's heading.
    pub fn direction(&self) -> Direction {
        self.dir
    }

    /// The speed drawn at spawn, in units per tick.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Whether the vehicle was held back on the last tick.
    pub fn waiting(&self) -> bool {
        self.waiting
    }

    /// The vehicles which held this one back on the last tick.
    pub fn blockers(&self) -> &[VehicleId] {
        &self.blockers
    }

    /// The vehicle's colour class.
    pub fn tag(&self) -> VisualTag {
        self.tag
    }

    /// The distance the vehicle will cover this tick.
    pub fn effective_speed(&self) -> f64 {
        if self.waiting {
            0.0
        } else {
            self.speed
        }
    }

    /// A snapshot of the vehicle's renderable state.
    pub fn view(&self) -> VehicleView {
        VehicleView {
            id: self.id,
            position: self.pos,
            direction: self.dir,
            waiting: self.waiting,
            tag: self.tag,
        }
    }

    /// Sets the outcome of this tick's conflict scan.
    pub(crate) fn set_blockers(&mut self, blockers: SmallVec<[VehicleId; 4]>) {
        self.waiting = !blockers.is_empty();
        self.blockers = blockers;
    }

    /// Moves the vehicle along its heading, unless it is waiting.
    pub(crate) fn advance(&mut self) {
        self.pos = self.pos + self.dir.unit() * self.effective_speed();
    }
}
