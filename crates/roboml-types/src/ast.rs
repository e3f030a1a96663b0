//! AST node types for validated RoboML programs.
//!
//! The engine never parses source text: it receives this tree from the
//! validation pipeline, either built in-process or decoded from JSON.
//! Variant tags follow the Langium `$type` names so a serialized document
//! from the editor side can be decoded directly.
//!
//! Every node carries a [`Span`]; it defaults to an unknown location when the
//! producer does not supply one. Recursive expression nodes are boxed.

use crate::error::DecodeError;
use crate::Span;
use serde::{Deserialize, Serialize};

// ══════════════════════════════════════════════════════════════════════════════
// Top Level
// ══════════════════════════════════════════════════════════════════════════════

/// A complete program: its function definitions in source order.
///
/// Name uniqueness is guaranteed upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub functions: Vec<FunctionDef>,
    #[serde(default)]
    pub span: Span,
}

impl Program {
    pub fn new(functions: Vec<FunctionDef>) -> Self {
        Self {
            functions,
            span: Span::default(),
        }
    }

    /// Decode a validated program from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, DecodeError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Find a function definition by name.
    pub fn function(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.iter().find(|f| f.name == name)
    }
}

/// `let <type> name(params) { instructions }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionDef {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<Param>,
    #[serde(default)]
    pub return_type: ReturnType,
    #[serde(default)]
    pub instructions: Vec<Instruction>,
    #[serde(default)]
    pub span: Span,
}

impl FunctionDef {
    pub fn new(
        name: impl Into<String>,
        parameters: Vec<Param>,
        return_type: ReturnType,
        instructions: Vec<Instruction>,
    ) -> Self {
        Self {
            name: name.into(),
            parameters,
            return_type,
            instructions,
            span: Span::default(),
        }
    }
}

/// A parameter: `<type> name`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ValueType,
    #[serde(default)]
    pub span: Span,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: ValueType) -> Self {
        Self {
            name: name.into(),
            ty,
            span: Span::default(),
        }
    }
}

/// Types a variable or parameter can be declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Number,
    Boolean,
}

/// Declared function return type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnType {
    #[default]
    Void,
    Number,
    Boolean,
}

/// A link to a declaration, resolved by the linker.
///
/// `text` is what the source wrote; `target` is the name of the declaration
/// it resolved to. A `None` target is a dangling link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(rename = "$refText")]
    pub text: String,
    #[serde(default)]
    pub target: Option<String>,
}

impl Reference {
    /// A link resolved to the declaration of the same name.
    pub fn resolved(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            text: name.clone(),
            target: Some(name),
        }
    }

    /// A link the linker could not resolve.
    pub fn unresolved(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            target: None,
        }
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Units & Directions
// ══════════════════════════════════════════════════════════════════════════════

/// Length unit attached to declarations, movements and speeds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    #[default]
    #[serde(rename = "mm")]
    Millimeters,
    #[serde(rename = "cm")]
    Centimeters,
}

impl Unit {
    /// Convert a value expressed in this unit to millimeters.
    pub fn to_millimeters(self, value: f64) -> f64 {
        match self {
            Unit::Millimeters => value,
            Unit::Centimeters => value * 10.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Millimeters => "mm",
            Unit::Centimeters => "cm",
        }
    }
}

/// Direction of a translation, relative to the robot's heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveDirection {
    Forward,
    Backward,
    Left,
    Right,
}

/// Direction of a rotation. `Clock` increases the heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RotateDirection {
    Clock,
    Counter,
}

// ══════════════════════════════════════════════════════════════════════════════
// Instructions
// ══════════════════════════════════════════════════════════════════════════════

/// An instruction node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    #[serde(flatten)]
    pub kind: InstructionKind,
    #[serde(default)]
    pub span: Span,
}

/// The kind of instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "$type")]
pub enum InstructionKind {
    /// `var <type> name = expr [unit]`
    VariableDeclaration {
        name: String,
        #[serde(rename = "type")]
        ty: ValueType,
        value: Expr,
        #[serde(default)]
        unit: Option<Unit>,
    },
    /// `name = expr`
    Assignment { assignee: Reference, value: Expr },
    /// `if cond { ... } [else { ... }]`
    Condition {
        condition: Expr,
        #[serde(rename = "thenBody")]
        then_body: Vec<Instruction>,
        #[serde(rename = "elseBody", default)]
        else_body: Option<Vec<Instruction>>,
    },
    /// `loop cond { ... }`
    Loop {
        condition: Expr,
        body: Vec<Instruction>,
    },
    /// `Forward expr [unit]`
    Movement {
        direction: MoveDirection,
        distance: Expr,
        #[serde(default)]
        unit: Option<Unit>,
    },
    /// `Clock expr`, angle in degrees
    Rotate {
        direction: RotateDirection,
        angle: Expr,
    },
    /// `setSpeed(expr [unit])`, per second
    SetSpeed {
        value: Expr,
        #[serde(default)]
        unit: Option<Unit>,
    },
    /// `return expr`
    Return { value: Expr },
    /// A bare call; its result is discarded.
    FunctionCall(CallExpr),
}

impl Instruction {
    pub fn new(kind: InstructionKind, span: Span) -> Self {
        Self { kind, span }
    }

    fn unspanned(kind: InstructionKind) -> Self {
        Self::new(kind, Span::default())
    }

    pub fn declare(name: impl Into<String>, ty: ValueType, value: Expr, unit: Option<Unit>) -> Self {
        Self::unspanned(InstructionKind::VariableDeclaration {
            name: name.into(),
            ty,
            value,
            unit,
        })
    }

    pub fn assign(name: impl Into<String>, value: Expr) -> Self {
        Self::unspanned(InstructionKind::Assignment {
            assignee: Reference::resolved(name),
            value,
        })
    }

    pub fn condition(
        condition: Expr,
        then_body: Vec<Instruction>,
        else_body: Option<Vec<Instruction>>,
    ) -> Self {
        Self::unspanned(InstructionKind::Condition {
            condition,
            then_body,
            else_body,
        })
    }

    pub fn repeat_while(condition: Expr, body: Vec<Instruction>) -> Self {
        Self::unspanned(InstructionKind::Loop { condition, body })
    }

    pub fn movement(direction: MoveDirection, distance: Expr, unit: Option<Unit>) -> Self {
        Self::unspanned(InstructionKind::Movement {
            direction,
            distance,
            unit,
        })
    }

    pub fn rotate(direction: RotateDirection, angle: Expr) -> Self {
        Self::unspanned(InstructionKind::Rotate { direction, angle })
    }

    pub fn set_speed(value: Expr, unit: Option<Unit>) -> Self {
        Self::unspanned(InstructionKind::SetSpeed { value, unit })
    }

    pub fn return_value(value: Expr) -> Self {
        Self::unspanned(InstructionKind::Return { value })
    }

    pub fn call(function: impl Into<String>, arguments: Vec<Expr>) -> Self {
        Self::unspanned(InstructionKind::FunctionCall(CallExpr::new(function, arguments)))
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Expressions
// ══════════════════════════════════════════════════════════════════════════════

/// An expression node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    #[serde(flatten)]
    pub kind: ExprKind,
    #[serde(default)]
    pub span: Span,
}

/// The kind of expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "$type")]
pub enum ExprKind {
    /// `42`, `3.5`
    NumberLiteral { value: f64 },
    /// `true` / `false`
    BooleanLiteral { value: bool },
    /// `a + b`, `a < b`, ...
    BinaryExpression {
        left: Box<Expr>,
        operator: BinOp,
        right: Box<Expr>,
    },
    /// `name`
    VariableRef { variable: Reference },
    /// `f(args...)`
    FunctionCall(CallExpr),
    /// `getDistance()`, `getTimestamp()`
    ///
    /// Kept as a name so unknown sensors surface at run time.
    SensorAccess { sensor: String },
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    fn unspanned(kind: ExprKind) -> Self {
        Self::new(kind, Span::default())
    }

    pub fn number(value: f64) -> Self {
        Self::unspanned(ExprKind::NumberLiteral { value })
    }

    pub fn boolean(value: bool) -> Self {
        Self::unspanned(ExprKind::BooleanLiteral { value })
    }

    pub fn binary(left: Expr, operator: BinOp, right: Expr) -> Self {
        Self::unspanned(ExprKind::BinaryExpression {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        })
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Self::unspanned(ExprKind::VariableRef {
            variable: Reference::resolved(name),
        })
    }

    pub fn call(function: impl Into<String>, arguments: Vec<Expr>) -> Self {
        Self::unspanned(ExprKind::FunctionCall(CallExpr::new(function, arguments)))
    }

    pub fn sensor(name: impl Into<String>) -> Self {
        Self::unspanned(ExprKind::SensorAccess {
            sensor: name.into(),
        })
    }
}

/// `f(args...)`, as an expression or a bare instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallExpr {
    pub function: Reference,
    #[serde(default)]
    pub arguments: Vec<Expr>,
}

impl CallExpr {
    pub fn new(function: impl Into<String>, arguments: Vec<Expr>) -> Self {
        Self {
            function: Reference::resolved(function),
            arguments,
        }
    }
}

// ── Binary Operators ──────────────────────────────────────────────────────────

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "*")]
    Mul,
    #[serde(rename = "/")]
    Div,
    #[serde(rename = "<")]
    Less,
    #[serde(rename = ">")]
    Greater,
    #[serde(rename = "==")]
    Eq,
}

impl BinOp {
    /// Returns the operator symbol for error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Less => "<",
            BinOp::Greater => ">",
            BinOp::Eq => "==",
        }
    }
}
