//! Interpreter: runs a validated program into a scene.
//!
//! Each call to [`Interpreter::interpret`] builds fresh per-run state
//! (environment, function table, robot, clock, trajectory), so one instance
//! can run any number of programs independently. Results are returned as
//! values; nothing is published through shared state.

use crate::config::SimulationConfig;
use crate::error::EvalResult;
use crate::evaluator::Evaluator;
use roboml_types::ast::Program;
use roboml_types::{RunReport, Scene};
use tracing::{info, warn};

/// The orchestrator around [`Evaluator`].
#[derive(Debug, Clone, Default)]
pub struct Interpreter {
    config: SimulationConfig,
    /// Warnings from the most recent run.
    warnings: Vec<String>,
}

impl Interpreter {
    /// Create an interpreter with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an interpreter with a custom configuration.
    pub fn with_config(config: SimulationConfig) -> Self {
        Self {
            config,
            warnings: Vec::new(),
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Warnings recorded by the most recent run.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Run `program` from its entry function and return the final scene.
    ///
    /// A program without an entry function yields the initial scene (no
    /// timestamps, time 0) and a warning. Any [`crate::EvalError`] aborts
    /// the run; no partial scene is returned.
    pub fn interpret(&mut self, program: &Program) -> EvalResult<Scene> {
        self.warnings.clear();
        let mut eval = Evaluator::new(program, &self.config);
        info!(
            functions = eval.functions().len(),
            entities = self.config.entities.len(),
            "starting interpretation"
        );

        let Some(entry) = eval.functions().get(&self.config.entry_point) else {
            let message = format!(
                "no '{}' function found; nothing to execute",
                self.config.entry_point
            );
            let defined: Vec<&str> = eval.functions().names().collect();
            warn!(?defined, "{message}");
            self.warnings.push(message);
            return Ok(eval.into_scene());
        };

        let outcome = eval.call_function(entry, Vec::new());
        self.warnings = std::mem::take(&mut eval.warnings);
        outcome?;

        let scene = eval.into_scene();
        info!(
            timestamps = scene.timestamps.len(),
            time = scene.time,
            x = scene.robot.pos.x,
            y = scene.robot.pos.y,
            rad = scene.robot.rad,
            "interpretation complete"
        );
        Ok(scene)
    }

    /// Run `program` and fold the outcome into a host-facing report.
    pub fn report(&mut self, program: &Program) -> RunReport {
        match self.interpret(program) {
            Ok(scene) => RunReport::completed(scene, self.warnings.clone()),
            Err(err) => {
                warn!(error = %err, "interpretation failed");
                RunReport::failed(vec![err.to_string()], self.warnings.clone())
            }
        }
    }
}
