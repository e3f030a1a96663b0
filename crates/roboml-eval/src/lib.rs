//! RoboML tree-walking interpreter.
//!
//! Executes a validated RoboML program directly from its AST and records the
//! robot's trajectory as a [`Scene`](roboml_types::Scene): a time-stamped list
//! of poses plus the static obstacle layout, ready for playback.
//!
//! ```text
//! Program → Interpreter → Evaluator ⇄ (Environment, FunctionRegistry)
//!                              ↓
//!                    Robot / Ray → Recorder → Scene
//! ```

pub mod config;
pub mod env;
pub mod error;
pub mod evaluator;
pub mod host;
pub mod interpreter;
pub mod ray;
pub mod recorder;
pub mod registry;
pub mod robot;
pub mod value;

pub use config::SimulationConfig;
pub use error::{ConfigError, EvalError, EvalResult};
pub use evaluator::{Evaluator, Flow, Sensor};
pub use interpreter::Interpreter;
pub use value::Value;
