//! Frame-stacked variable environment for the RoboML interpreter.

use crate::error::{EvalError, EvalResult};
use crate::value::Value;
use std::collections::BTreeMap;

/// A single frame: the bindings of one active function call.
#[derive(Debug, Clone, Default)]
struct Frame {
    bindings: BTreeMap<String, Value>,
}

/// Variable environment with push/pop semantics.
///
/// Frames are pushed on function entry and popped on function exit, never
/// around conditionals or loops, so a declaration inside an `if` or `loop`
/// body stays visible to later instructions of the same call.
///
/// Lookups search from the innermost frame outward. `declare` always writes
/// the innermost frame; `update` mutates the first frame that already binds
/// the name and never creates a binding.
#[derive(Debug, Clone)]
pub struct Environment {
    frames: Vec<Frame>,
}

impl Environment {
    /// Create a new environment with one base frame.
    pub fn new() -> Self {
        Self {
            frames: vec![Frame::default()],
        }
    }

    /// Push a fresh frame for a function call.
    pub fn push_frame(&mut self) {
        self.frames.push(Frame::default());
    }

    /// Pop the innermost frame. The base frame is never popped.
    pub fn pop_frame(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Number of frames, base frame included.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Bind `name` in the innermost frame, shadowing any outer binding.
    pub fn declare(&mut self, name: &str, value: Value) {
        if let Some(frame) = self.frames.last_mut() {
            frame.bindings.insert(name.to_string(), value);
        }
    }

    /// Read a variable, searching from innermost to outermost frame.
    pub fn read(&self, name: &str) -> EvalResult<Value> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.bindings.get(name))
            .copied()
            .ok_or_else(|| EvalError::UndefinedVariable(name.to_string()))
    }

    /// Overwrite an existing binding in the first frame where it exists.
    pub fn update(&mut self, name: &str, value: Value) -> EvalResult<()> {
        match self
            .frames
            .iter_mut()
            .rev()
            .find_map(|frame| frame.bindings.get_mut(name))
        {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(EvalError::UndefinedVariable(name.to_string())),
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
