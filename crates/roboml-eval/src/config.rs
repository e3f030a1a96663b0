//! Simulation configuration.
//!
//! Every field has a default, so a host only supplies what it changes:
//!
//! ```json
//! { "entities": [ { "type": "Wall", "pos": { "x": 0, "y": 0 }, "size": { "x": 10000, "y": 0 } } ],
//!   "robot": { "speed": 50 } }
//! ```

use crate::error::ConfigError;
use crate::robot::Robot;
use roboml_types::scene::{Entity, Vec2};
use serde::{Deserialize, Serialize};

/// Name of the function a run starts from.
pub const DEFAULT_ENTRY_POINT: &str = "entry";
/// Loop iterations allowed before a loop is truncated.
pub const DEFAULT_MAX_LOOP_ITERATIONS: u64 = 100_000;
/// Distance reported by `getDistance` when the ray hits nothing.
pub const DEFAULT_NO_OBSTACLE_DISTANCE: f64 = 10_000.0;
/// Nested function calls allowed before the run aborts.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 200;

/// Initial robot pose and speed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotConfig {
    pub position: Vec2,
    pub size: Vec2,
    /// Radians.
    pub heading: f64,
    /// mm/s.
    pub speed: f64,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            position: Vec2::new(5000.0, 5000.0),
            size: Vec2::new(250.0, 250.0),
            heading: 0.0,
            speed: 30.0,
        }
    }
}

/// Everything a run needs besides the program itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub scene_size: Vec2,
    pub entities: Vec<Entity>,
    pub robot: RobotConfig,
    pub entry_point: String,
    pub max_loop_iterations: u64,
    pub no_obstacle_distance: f64,
    pub max_call_depth: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            scene_size: Vec2::new(10000.0, 10000.0),
            entities: Vec::new(),
            robot: RobotConfig::default(),
            entry_point: DEFAULT_ENTRY_POINT.to_string(),
            max_loop_iterations: DEFAULT_MAX_LOOP_ITERATIONS,
            no_obstacle_distance: DEFAULT_NO_OBSTACLE_DISTANCE,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}

impl SimulationConfig {
    /// Decode and validate a configuration document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations no run could use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.scene_size.x > 0.0 && self.scene_size.y > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "scene size must be positive, got {} x {}",
                self.scene_size.x, self.scene_size.y
            )));
        }
        if !(self.robot.speed > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "initial robot speed must be positive, got {}",
                self.robot.speed
            )));
        }
        if self.max_loop_iterations == 0 {
            return Err(ConfigError::Invalid(
                "max_loop_iterations must be at least 1".into(),
            ));
        }
        if self.max_call_depth == 0 {
            return Err(ConfigError::Invalid(
                "max_call_depth must be at least 1".into(),
            ));
        }
        if self.entry_point.is_empty() {
            return Err(ConfigError::Invalid("entry point name is empty".into()));
        }
        Ok(())
    }

    /// The robot as it stands before the first instruction.
    pub fn initial_robot(&self) -> Robot {
        Robot::new(
            self.robot.position,
            self.robot.heading,
            self.robot.size,
            self.robot.speed,
        )
    }
}
