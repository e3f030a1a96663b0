//! Scene records: the flat, serializable result of one run.
//!
//! Field names match what the playback client reads (`pos`, `size`, `rad`,
//! `speed`, `time`, and a `type` tag on every object). Nothing here holds a
//! back-reference, so a `Scene` can cross a process boundary as-is.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// A 2-D vector in scene millimeters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Vector of the given length pointing along `angle` radians.
    pub fn from_angle(angle: f64, length: f64) -> Self {
        Self::new(angle.cos() * length, angle.sin() * length)
    }

    /// Euclidean length.
    pub fn norm(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// 2-D cross product (z component of the 3-D cross product).
    pub fn cross(self, other: Vec2) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn scale(self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    pub fn distance_to(self, other: Vec2) -> f64 {
        (other - self).norm()
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f64) -> Vec2 {
        self.scale(rhs)
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Entities
// ══════════════════════════════════════════════════════════════════════════════

/// Kind of static obstacle.
///
/// Both kinds are line segments whose endpoints are `pos` and `size`; the
/// playback client draws them that way, so sensing matches what is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Wall,
    Block,
}

/// A static obstacle. Immutable for the whole run.
///
/// `size` is the segment's far endpoint, not an extent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "type")]
    pub kind: EntityKind,
    pub pos: Vec2,
    pub size: Vec2,
}

impl Entity {
    pub fn wall(from: Vec2, to: Vec2) -> Self {
        Self {
            kind: EntityKind::Wall,
            pos: from,
            size: to,
        }
    }

    pub fn block(from: Vec2, to: Vec2) -> Self {
        Self {
            kind: EntityKind::Block,
            pos: from,
            size: to,
        }
    }

    /// Endpoints of the obstacle segment.
    pub fn segment(&self) -> (Vec2, Vec2) {
        (self.pos, self.size)
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Robot snapshots
// ══════════════════════════════════════════════════════════════════════════════

/// Type tag carried by robot records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RobotTag {
    #[default]
    Robot,
}

/// Final robot state as serialized in a scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RobotState {
    #[serde(rename = "type", default)]
    pub tag: RobotTag,
    pub pos: Vec2,
    pub size: Vec2,
    /// Heading in radians. Not normalized.
    pub rad: f64,
    /// Speed in mm/s.
    pub speed: f64,
}

/// One recorded pose at a point of simulation time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timestamp {
    #[serde(rename = "type", default)]
    pub tag: RobotTag,
    pub pos: Vec2,
    pub size: Vec2,
    pub rad: f64,
    pub speed: f64,
    /// Milliseconds since the start of the run.
    pub time: f64,
}

impl Timestamp {
    pub fn new(time: f64, robot: RobotState) -> Self {
        Self {
            tag: RobotTag::Robot,
            pos: robot.pos,
            size: robot.size,
            rad: robot.rad,
            speed: robot.speed,
            time,
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Scene
// ══════════════════════════════════════════════════════════════════════════════

/// The serialized output of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub size: Vec2,
    pub entities: Vec<Entity>,
    pub robot: RobotState,
    /// Total elapsed simulation time in milliseconds.
    pub time: f64,
    pub timestamps: Vec<Timestamp>,
}
