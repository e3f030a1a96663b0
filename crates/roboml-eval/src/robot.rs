//! Robot kinematics.

use crate::ray::Ray;
use roboml_types::scene::{RobotState, RobotTag, Vec2};
use std::f64::consts::FRAC_PI_2;

/// The simulated robot. Mutated only by movement, rotation and speed
/// instructions; lives for the whole run.
#[derive(Debug, Clone, PartialEq)]
pub struct Robot {
    pub position: Vec2,
    /// Heading in radians. Grows without normalization.
    pub heading: f64,
    pub size: Vec2,
    /// Speed in mm/s.
    pub speed: f64,
}

impl Robot {
    pub fn new(position: Vec2, heading: f64, size: Vec2, speed: f64) -> Self {
        Self {
            position,
            heading,
            size,
            speed,
        }
    }

    /// Translate along the heading; positive is forward.
    pub fn advance(&mut self, distance: f64) {
        self.position = self.position + Vec2::from_angle(self.heading, distance);
    }

    /// Translate perpendicular to the heading; positive is to the right.
    pub fn strafe(&mut self, distance: f64) {
        self.position = self.position + Vec2::from_angle(self.heading + FRAC_PI_2, distance);
    }

    /// Add `delta` radians to the heading.
    pub fn turn(&mut self, delta: f64) {
        self.heading += delta;
    }

    /// A ray from the robot's position along its heading.
    pub fn sensing_ray(&self) -> Ray {
        Ray::from_angle(self.position, self.heading)
    }

    pub fn state(&self) -> RobotState {
        RobotState {
            tag: RobotTag::Robot,
            pos: self.position,
            size: self.size,
            rad: self.heading,
            speed: self.speed,
        }
    }
}
