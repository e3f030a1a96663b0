//! Runtime error types for the RoboML interpreter.

use thiserror::Error;

/// Evaluation error. Every variant is fatal: the run aborts and no scene is
/// produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// Read of, or assignment to, a name with no binding in any frame
    #[error("undefined variable: {0}")]
    UndefinedVariable(String),
    /// A variable or function link the linker left dangling
    #[error("unresolved reference: {0}")]
    UnresolvedReference(String),
    /// Sensor name other than `getDistance` / `getTimestamp`
    #[error("unknown sensor: {0}")]
    UnknownSensor(String),
    /// Division by zero, non-finite result, movement at zero speed
    #[error("arithmetic error: {0}")]
    Arithmetic(String),
    /// Operand of the wrong type, or a void result used as a value
    #[error("type mismatch: {0}")]
    TypeMismatch(String),
    /// Function calls nested deeper than the configured limit
    #[error("call depth exceeded: more than {0} nested calls")]
    CallDepthExceeded(usize),
}

/// Result alias for evaluator operations.
pub type EvalResult<T> = Result<T, EvalError>;

/// Simulation configuration rejected before a run.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Decode(#[from] roboml_types::DecodeError),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.into())
    }
}
