//! Shared types for the RoboML engine.
//!
//! This crate defines the validated AST the interpreter consumes, source
//! spans, the serializable Scene records it produces, and the report shape
//! handed back to the host.

mod error;
mod span;
pub mod ast;
pub mod scene;

pub use error::{DecodeError, RunReport};
pub use scene::{Entity, EntityKind, RobotState, Scene, Timestamp, Vec2};
pub use span::Span;
