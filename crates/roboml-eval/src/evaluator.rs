//! Core expression evaluator and instruction executor.
//!
//! Expressions and instructions are evaluated by direct recursion over the
//! AST. Function calls recurse back into the executor, which is where the
//! only frame push/pop happens. Early `return` travels back up as
//! [`Flow::Returning`] until it reaches the call boundary.

use crate::config::SimulationConfig;
use crate::env::Environment;
use crate::error::{EvalError, EvalResult};
use crate::recorder::Recorder;
use crate::registry::FunctionRegistry;
use crate::robot::Robot;
use crate::value::Value;
use roboml_types::ast::*;
use roboml_types::{Scene, Span};
use tracing::{debug, trace, warn};

/// Milliseconds of simulation time per degree of rotation.
const ROTATION_MS_PER_DEGREE: f64 = 5.0;

/// Outcome of executing an instruction or a block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Flow {
    /// Fell through; continue with the next instruction.
    Completed,
    /// A `return` was executed; unwind to the enclosing call.
    Returning(Value),
}

/// Built-in sensors readable from expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sensor {
    /// Distance in mm to the nearest obstacle ahead.
    Distance,
    /// Current simulation time in ms.
    Timestamp,
}

impl Sensor {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "getDistance" => Some(Sensor::Distance),
            "getTimestamp" => Some(Sensor::Timestamp),
            _ => None,
        }
    }
}

/// The core evaluator: per-run state plus the tree walker.
pub struct Evaluator<'a> {
    /// Variable environment (one frame per active call).
    pub env: Environment,
    /// The simulated robot.
    pub robot: Robot,
    /// Clock and trajectory.
    pub recorder: Recorder,
    /// Non-fatal conditions met during the run.
    pub warnings: Vec<String>,
    functions: FunctionRegistry<'a>,
    config: &'a SimulationConfig,
    call_depth: usize,
}

impl<'a> Evaluator<'a> {
    /// Fresh state for one run of `program`.
    pub fn new(program: &'a Program, config: &'a SimulationConfig) -> Self {
        Self {
            env: Environment::new(),
            robot: config.initial_robot(),
            recorder: Recorder::new(),
            warnings: Vec::new(),
            functions: FunctionRegistry::new(program),
            config,
            call_depth: 0,
        }
    }

    pub fn functions(&self) -> &FunctionRegistry<'a> {
        &self.functions
    }

    /// Consume the evaluator into its final scene.
    pub fn into_scene(self) -> Scene {
        Scene {
            size: self.config.scene_size,
            entities: self.config.entities.clone(),
            robot: self.robot.state(),
            time: self.recorder.now(),
            timestamps: self.recorder.into_timestamps(),
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Function calls
    // ══════════════════════════════════════════════════════════════════════

    /// Call `function` with already-evaluated arguments.
    ///
    /// Parameters are bound positionally in a new frame. Returns the value
    /// carried by the first `return` executed, or [`Value::Void`] if the body
    /// runs to completion.
    pub fn call_function(&mut self, function: &FunctionDef, args: Vec<Value>) -> EvalResult<Value> {
        if self.call_depth >= self.config.max_call_depth {
            return Err(EvalError::CallDepthExceeded(self.config.max_call_depth));
        }
        self.call_depth += 1;
        self.env.push_frame();
        debug!(
            function = %function.name,
            args = args.len(),
            frames = self.env.depth(),
            "call"
        );
        for (param, arg) in function.parameters.iter().zip(args) {
            self.env.declare(&param.name, arg);
        }
        let flow = self.exec_block(&function.instructions);
        self.env.pop_frame();
        self.call_depth -= 1;

        match flow? {
            Flow::Returning(value) => Ok(value),
            Flow::Completed => Ok(Value::Void),
        }
    }

    fn eval_call(&mut self, call: &CallExpr, span: Span) -> EvalResult<Value> {
        let function = call
            .function
            .target()
            .and_then(|name| self.functions.get(name))
            .ok_or_else(|| {
                EvalError::UnresolvedReference(located(
                    format!("function '{}'", call.function.text),
                    span,
                ))
            })?;

        let mut args = Vec::with_capacity(call.arguments.len());
        for arg in &call.arguments {
            args.push(self.eval_expr(arg)?);
        }
        self.call_function(function, args)
    }

    // ══════════════════════════════════════════════════════════════════════
    // Expression evaluation
    // ══════════════════════════════════════════════════════════════════════

    /// Evaluate an expression to a Value.
    pub fn eval_expr(&mut self, expr: &Expr) -> EvalResult<Value> {
        match &expr.kind {
            ExprKind::NumberLiteral { value } => Ok(Value::Number(*value)),
            ExprKind::BooleanLiteral { value } => Ok(Value::Boolean(*value)),
            ExprKind::BinaryExpression {
                left,
                operator,
                right,
            } => self.eval_binary(left, *operator, right),
            ExprKind::VariableRef { variable } => {
                let name = variable.target().ok_or_else(|| {
                    EvalError::UnresolvedReference(located(
                        format!("variable '{}'", variable.text),
                        expr.span,
                    ))
                })?;
                self.env.read(name)
            }
            ExprKind::FunctionCall(call) => self.eval_call(call, expr.span),
            ExprKind::SensorAccess { sensor } => self.read_sensor(sensor),
        }
    }

    // ── Sensors ──────────────────────────────────────────────────────────

    fn read_sensor(&self, name: &str) -> EvalResult<Value> {
        let sensor =
            Sensor::from_name(name).ok_or_else(|| EvalError::UnknownSensor(name.to_string()))?;
        let reading = match sensor {
            Sensor::Distance => self.distance_to_obstacle(),
            Sensor::Timestamp => self.recorder.now(),
        };
        trace!(sensor = name, reading, "sensor read");
        Ok(Value::Number(reading))
    }

    /// Distance in mm from the robot to the nearest obstacle ahead, or the
    /// configured fallback when nothing is hit.
    pub fn distance_to_obstacle(&self) -> f64 {
        self.robot
            .sensing_ray()
            .nearest_distance(&self.config.entities)
            .unwrap_or(self.config.no_obstacle_distance)
    }

    // ── Operators ────────────────────────────────────────────────────────

    fn eval_binary(&mut self, left: &Expr, op: BinOp, right: &Expr) -> EvalResult<Value> {
        let lv = self.eval_expr(left)?;
        let rv = self.eval_expr(right)?;

        match op {
            BinOp::Add => eval_arith(lv, rv, op, |a, b| a + b),
            BinOp::Sub => eval_arith(lv, rv, op, |a, b| a - b),
            BinOp::Mul => eval_arith(lv, rv, op, |a, b| a * b),
            BinOp::Div => {
                if let (Value::Number(_), Value::Number(b)) = (lv, rv) {
                    if b == 0.0 {
                        return Err(EvalError::Arithmetic("division by zero".into()));
                    }
                }
                eval_arith(lv, rv, op, |a, b| a / b)
            }
            BinOp::Less => eval_comparison(lv, rv, op, |a, b| a < b),
            BinOp::Greater => eval_comparison(lv, rv, op, |a, b| a > b),
            BinOp::Eq => values_equal(lv, rv).map(Value::Boolean),
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Block & Instruction execution
    // ══════════════════════════════════════════════════════════════════════

    /// Execute instructions in order, stopping at the first `return`.
    pub fn exec_block(&mut self, instructions: &[Instruction]) -> EvalResult<Flow> {
        for instruction in instructions {
            if let Flow::Returning(value) = self.exec_instruction(instruction)? {
                return Ok(Flow::Returning(value));
            }
        }
        Ok(Flow::Completed)
    }

    /// Execute a single instruction.
    pub fn exec_instruction(&mut self, instruction: &Instruction) -> EvalResult<Flow> {
        match &instruction.kind {
            InstructionKind::VariableDeclaration {
                name, value, unit, ..
            } => self.exec_declaration(name, value, *unit),
            InstructionKind::Assignment { assignee, value } => {
                let value = self.eval_expr(value)?;
                let name = assignee.target().ok_or_else(|| {
                    EvalError::UnresolvedReference(located(
                        format!("variable '{}'", assignee.text),
                        instruction.span,
                    ))
                })?;
                self.env.update(name, value)?;
                Ok(Flow::Completed)
            }
            InstructionKind::Condition {
                condition,
                then_body,
                else_body,
            } => {
                if self.eval_expr(condition)?.as_bool("condition")? {
                    self.exec_block(then_body)
                } else if let Some(else_body) = else_body {
                    self.exec_block(else_body)
                } else {
                    Ok(Flow::Completed)
                }
            }
            InstructionKind::Loop { condition, body } => {
                self.exec_loop(condition, body, instruction.span)
            }
            InstructionKind::Movement {
                direction,
                distance,
                unit,
            } => {
                let raw = self.eval_expr(distance)?.as_number("movement distance")?;
                let millimeters = unit.unwrap_or_default().to_millimeters(raw);
                self.exec_movement(*direction, millimeters)?;
                Ok(Flow::Completed)
            }
            InstructionKind::Rotate { direction, angle } => {
                let degrees = self.eval_expr(angle)?.as_number("rotation angle")?;
                self.exec_rotation(*direction, degrees)?;
                Ok(Flow::Completed)
            }
            InstructionKind::SetSpeed { value, unit } => {
                let raw = self.eval_expr(value)?.as_number("speed")?;
                self.robot.speed = unit.unwrap_or_default().to_millimeters(raw);
                debug!(speed = self.robot.speed, "speed set");
                Ok(Flow::Completed)
            }
            InstructionKind::Return { value } => Ok(Flow::Returning(self.eval_expr(value)?)),
            InstructionKind::FunctionCall(call) => {
                self.eval_call(call, instruction.span)?;
                Ok(Flow::Completed)
            }
        }
    }

    /// Declare a variable in the current frame.
    ///
    /// A declared unit only labels the literal: the value is kept in that
    /// unit, so reading it back yields what was written.
    fn exec_declaration(&mut self, name: &str, value: &Expr, unit: Option<Unit>) -> EvalResult<Flow> {
        let value = self.eval_expr(value)?;
        if let Some(unit) = unit {
            let magnitude = value.as_number("declaration with a unit")?;
            trace!(name, value = magnitude, unit = unit.as_str(), "declare");
        } else {
            trace!(name, %value, "declare");
        }
        self.env.declare(name, value);
        Ok(Flow::Completed)
    }

    /// `loop cond { body }` with while-semantics, truncated after the
    /// configured number of iterations.
    fn exec_loop(&mut self, condition: &Expr, body: &[Instruction], span: Span) -> EvalResult<Flow> {
        let limit = self.config.max_loop_iterations;
        let mut iterations: u64 = 0;
        while self.eval_expr(condition)?.as_bool("loop condition")? {
            if iterations >= limit {
                let message = located(
                    format!("loop truncated after {iterations} iterations"),
                    span,
                );
                warn!("{message}");
                self.warnings.push(message);
                break;
            }
            if let Flow::Returning(value) = self.exec_block(body)? {
                return Ok(Flow::Returning(value));
            }
            iterations += 1;
        }
        Ok(Flow::Completed)
    }

    // ── Robot primitives ─────────────────────────────────────────────────

    /// Move by `millimeters` and charge the time it takes at current speed.
    fn exec_movement(&mut self, direction: MoveDirection, millimeters: f64) -> EvalResult<()> {
        let speed = self.robot.speed;
        if !(speed > 0.0) {
            return Err(EvalError::Arithmetic(format!(
                "cannot move at speed {speed} mm/s"
            )));
        }
        let duration = self.checked_duration(millimeters.abs() / speed * 1000.0, "movement")?;
        match direction {
            MoveDirection::Forward => self.robot.advance(millimeters),
            MoveDirection::Backward => self.robot.advance(-millimeters),
            MoveDirection::Left => self.robot.strafe(-millimeters),
            MoveDirection::Right => self.robot.strafe(millimeters),
        }
        if !self.robot.position.is_finite() {
            return Err(EvalError::Arithmetic(format!(
                "movement of {millimeters} mm leaves the representable plane"
            )));
        }
        self.recorder.advance(duration, self.robot.state());
        debug!(
            ?direction,
            millimeters,
            x = self.robot.position.x,
            y = self.robot.position.y,
            time = self.recorder.now(),
            "move"
        );
        Ok(())
    }

    /// Turn by `degrees`; `Clock` adds to the heading, `Counter` subtracts.
    fn exec_rotation(&mut self, direction: RotateDirection, degrees: f64) -> EvalResult<()> {
        let duration = self.checked_duration(degrees.abs() * ROTATION_MS_PER_DEGREE, "rotation")?;
        let radians = degrees.to_radians();
        match direction {
            RotateDirection::Clock => self.robot.turn(radians),
            RotateDirection::Counter => self.robot.turn(-radians),
        }
        if !self.robot.heading.is_finite() {
            return Err(EvalError::Arithmetic(format!(
                "rotation by {degrees} degrees overflows the heading"
            )));
        }
        self.recorder.advance(duration, self.robot.state());
        debug!(
            ?direction,
            degrees,
            heading = self.robot.heading,
            time = self.recorder.now(),
            "rotate"
        );
        Ok(())
    }

    /// `duration` in ms, rejected when it or the clock after it is not finite.
    fn checked_duration(&self, duration: f64, action: &str) -> EvalResult<f64> {
        if duration.is_finite() && (self.recorder.now() + duration).is_finite() {
            Ok(duration)
        } else {
            Err(EvalError::Arithmetic(format!(
                "{action} duration overflows the clock"
            )))
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Operator helpers
// ══════════════════════════════════════════════════════════════════════════

fn eval_arith(lv: Value, rv: Value, op: BinOp, f: fn(f64, f64) -> f64) -> EvalResult<Value> {
    if let (Value::Number(a), Value::Number(b)) = (lv, rv) {
        let result = f(a, b);
        if result.is_nan() || result.is_infinite() {
            Err(EvalError::Arithmetic(format!(
                "'{}' produced NaN/Infinity",
                op.as_str()
            )))
        } else {
            Ok(Value::Number(result))
        }
    } else {
        Err(EvalError::TypeMismatch(format!(
            "cannot apply '{}' to {} and {}",
            op.as_str(),
            lv.type_name(),
            rv.type_name()
        )))
    }
}

fn eval_comparison(lv: Value, rv: Value, op: BinOp, f: fn(f64, f64) -> bool) -> EvalResult<Value> {
    match (lv, rv) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Boolean(f(a, b))),
        _ => Err(EvalError::TypeMismatch(format!(
            "cannot compare {} and {} with '{}'",
            lv.type_name(),
            rv.type_name(),
            op.as_str()
        ))),
    }
}

/// `==`: value equality on same-typed operands, `false` across types.
fn values_equal(lv: Value, rv: Value) -> EvalResult<bool> {
    match (lv, rv) {
        (Value::Number(a), Value::Number(b)) => Ok(a == b),
        (Value::Boolean(a), Value::Boolean(b)) => Ok(a == b),
        (Value::Void, _) | (_, Value::Void) => Err(EvalError::TypeMismatch(
            "cannot compare a void value with '=='".into(),
        )),
        _ => Ok(false),
    }
}

/// Append the source location to a message when there is one.
fn located(message: String, span: Span) -> String {
    if span.is_known() {
        format!("{message} at {span}")
    } else {
        message
    }
}
