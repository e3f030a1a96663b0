//! Runtime values.

use crate::error::{EvalError, EvalResult};
use std::fmt;

/// A value produced by an expression.
///
/// `Void` is the "no value" result of a call to a function that did not
/// execute a `return`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Number(f64),
    Boolean(bool),
    Void,
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Boolean(_) => "boolean",
            Value::Void => "void",
        }
    }

    /// The numeric payload, or a type mismatch naming `context`.
    pub fn as_number(&self, context: &str) -> EvalResult<f64> {
        match self {
            Value::Number(n) => Ok(*n),
            other => Err(EvalError::TypeMismatch(format!(
                "{context} requires number, got {}",
                other.type_name()
            ))),
        }
    }

    /// The boolean payload, or a type mismatch naming `context`.
    pub fn as_bool(&self, context: &str) -> EvalResult<bool> {
        match self {
            Value::Boolean(b) => Ok(*b),
            other => Err(EvalError::TypeMismatch(format!(
                "{context} requires boolean, got {}",
                other.type_name()
            ))),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) if n.fract() == 0.0 && n.is_finite() => write!(f, "{}", *n as i64),
            Value::Number(n) => write!(f, "{n}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Void => write!(f, "void"),
        }
    }
}
