//! Distance sensing: ray casting against static entities.
//!
//! The ray is a half-line from the robot along its heading, so obstacles are
//! seen at any range, including from outside the scene. Each entity is a
//! segment tested with the parametric intersection; the hit closest to the
//! ray origin wins. Nothing is cached, since the robot moves between reads.

use roboml_types::scene::{Entity, Vec2};

/// Denominators below this are treated as parallel.
const PARALLEL_EPSILON: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec2,
    /// Unit direction.
    pub direction: Vec2,
}

impl Ray {
    /// A ray from `origin` along `angle` radians.
    pub fn from_angle(origin: Vec2, angle: f64) -> Self {
        Self {
            origin,
            direction: Vec2::from_angle(angle, 1.0),
        }
    }

    /// Intersection point with the segment `a`–`b`, if any.
    ///
    /// Parallel and collinear segments never intersect.
    pub fn intersect_segment(&self, a: Vec2, b: Vec2) -> Option<Vec2> {
        let edge = b - a;
        let denom = self.direction.cross(edge);
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }
        let offset = a - self.origin;
        let t = offset.cross(edge) / denom;
        let u = offset.cross(self.direction) / denom;
        if t >= 0.0 && (0.0..=1.0).contains(&u) {
            Some(self.origin + self.direction * t)
        } else {
            None
        }
    }

    pub fn intersect_entity(&self, entity: &Entity) -> Option<Vec2> {
        let (a, b) = entity.segment();
        self.intersect_segment(a, b)
    }

    /// Nearest intersection over all entities.
    pub fn cast(&self, entities: &[Entity]) -> Option<Vec2> {
        entities
            .iter()
            .filter_map(|e| self.intersect_entity(e))
            .min_by(|a, b| {
                self.origin
                    .distance_to(*a)
                    .total_cmp(&self.origin.distance_to(*b))
            })
    }

    /// Distance from the origin to the nearest entity, or `None` when the
    /// ray hits nothing.
    pub fn nearest_distance(&self, entities: &[Entity]) -> Option<f64> {
        self.cast(entities).map(|hit| self.origin.distance_to(hit))
    }
}
