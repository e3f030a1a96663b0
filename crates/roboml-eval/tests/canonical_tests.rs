//! Canonical programs, run end to end from their JSON form.
//!
//! Tests verify:
//! - Programs decoded from linker output execute correctly
//! - Final poses and clocks match hand-computed trajectories
//! - Sensing against walls and blocks steers control flow
//! - The JSON host boundary reports scenes and failures
//! - Determinism (100-iteration)

use pretty_assertions::assert_eq;
use roboml_eval::host::{run, run_json};
use roboml_eval::SimulationConfig;
use roboml_types::ast::Program;
use roboml_types::{RunReport, Scene};
use std::f64::consts::PI;

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

const EPS: f64 = 1e-6;

fn program(json: &str) -> Program {
    Program::from_json(json).expect("program fixture should decode")
}

fn config(json: &str) -> SimulationConfig {
    SimulationConfig::from_json(json).expect("config fixture should decode")
}

fn scene_of(report: RunReport) -> Scene {
    assert!(report.success, "run failed: {:?}", report.errors);
    report.scene.expect("successful run without a scene")
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPS,
        "expected {expected}, got {actual}"
    );
}

// ══════════════════════════════════════════════════════════════════════════════
// Canonical Example 1: Square
// ══════════════════════════════════════════════════════════════════════════════

/// ```text
/// let void entry() {
///     var number side = 50 in cm
///     var number i = 0
///     loop i < 4 {
///         Forward side in cm
///         Clock 90
///         i = i + 1
///     }
/// }
/// ```
const SQUARE: &str = r#"{
  "functions": [{
    "name": "entry", "returnType": "void", "parameters": [],
    "instructions": [
      { "$type": "VariableDeclaration", "name": "side", "type": "number", "unit": "cm",
        "value": { "$type": "NumberLiteral", "value": 50 } },
      { "$type": "VariableDeclaration", "name": "i", "type": "number",
        "value": { "$type": "NumberLiteral", "value": 0 } },
      { "$type": "Loop",
        "condition": { "$type": "BinaryExpression", "operator": "<",
          "left": { "$type": "VariableRef", "variable": { "$refText": "i", "target": "i" } },
          "right": { "$type": "NumberLiteral", "value": 4 } },
        "body": [
          { "$type": "Movement", "direction": "Forward", "unit": "cm",
            "distance": { "$type": "VariableRef", "variable": { "$refText": "side", "target": "side" } } },
          { "$type": "Rotate", "direction": "Clock",
            "angle": { "$type": "NumberLiteral", "value": 90 } },
          { "$type": "Assignment", "assignee": { "$refText": "i", "target": "i" },
            "value": { "$type": "BinaryExpression", "operator": "+",
              "left": { "$type": "VariableRef", "variable": { "$refText": "i", "target": "i" } },
              "right": { "$type": "NumberLiteral", "value": 1 } } }
        ] }
    ]
  }]
}"#;

#[test]
fn square_returns_to_start() {
    let scene = scene_of(run(&program(SQUARE), &SimulationConfig::default()));

    assert_close(scene.robot.pos.x, 5000.0);
    assert_close(scene.robot.pos.y, 5000.0);
    assert_close(scene.robot.rad, 2.0 * PI);
    assert_eq!(scene.timestamps.len(), 8);
    // four 500 mm legs at 30 mm/s plus four 90° turns
    assert_close(scene.time, 4.0 * (500.0 / 30.0 * 1000.0 + 450.0));
}

#[test]
fn square_corners_in_order() {
    let scene = scene_of(run(&program(SQUARE), &SimulationConfig::default()));
    let corners: Vec<(f64, f64)> = scene
        .timestamps
        .iter()
        .step_by(2)
        .map(|t| (t.pos.x.round(), t.pos.y.round()))
        .collect();
    assert_eq!(
        corners,
        vec![(5500.0, 5000.0), (5500.0, 5500.0), (5000.0, 5500.0), (5000.0, 5000.0)]
    );
}

// ══════════════════════════════════════════════════════════════════════════════
// Canonical Example 2: Wall approach
// ══════════════════════════════════════════════════════════════════════════════

/// ```text
/// let void entry() {
///     loop getDistance() > 350 {
///         Forward 10 in cm
///     }
/// }
/// ```
const WALL_APPROACH: &str = r#"{
  "functions": [{
    "name": "entry",
    "instructions": [
      { "$type": "Loop",
        "condition": { "$type": "BinaryExpression", "operator": ">",
          "left": { "$type": "SensorAccess", "sensor": "getDistance" },
          "right": { "$type": "NumberLiteral", "value": 350 } },
        "body": [
          { "$type": "Movement", "direction": "Forward", "unit": "cm",
            "distance": { "$type": "NumberLiteral", "value": 10 } }
        ] }
    ]
  }]
}"#;

const WALL_AT_6000: &str = r#"{
  "entities": [
    { "type": "Wall", "pos": { "x": 6000, "y": 0 }, "size": { "x": 6000, "y": 10000 } }
  ]
}"#;

#[test]
fn wall_approach_stops_short_of_the_wall() {
    let scene = scene_of(run(&program(WALL_APPROACH), &config(WALL_AT_6000)));

    assert_eq!(scene.timestamps.len(), 7);
    assert_close(scene.robot.pos.x, 5700.0);
    assert_close(scene.robot.pos.y, 5000.0);
    assert_eq!(scene.entities.len(), 1);
}

#[test]
fn wall_approach_without_obstacles_hits_the_loop_cap() {
    let cfg = config(r#"{ "max_loop_iterations": 25 }"#);
    let report = run(&program(WALL_APPROACH), &cfg);

    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].starts_with("loop truncated after 25 iterations"));
    let scene = scene_of(report);
    assert_close(scene.robot.pos.x, 5000.0 + 25.0 * 100.0);
}

// ══════════════════════════════════════════════════════════════════════════════
// Canonical Example 3: Dodge a block
// ══════════════════════════════════════════════════════════════════════════════

/// ```text
/// let boolean clear() {
///     return getDistance() > 500
/// }
///
/// let void entry() {
///     if clear() {
///         Forward 100 in cm
///     } else {
///         Right 60 in cm
///         Forward 100 in cm
///     }
/// }
/// ```
const DODGE: &str = r#"{
  "functions": [
    { "name": "clear", "returnType": "boolean",
      "instructions": [
        { "$type": "Return",
          "value": { "$type": "BinaryExpression", "operator": ">",
            "left": { "$type": "SensorAccess", "sensor": "getDistance" },
            "right": { "$type": "NumberLiteral", "value": 500 } } }
      ] },
    { "name": "entry",
      "instructions": [
        { "$type": "Condition",
          "condition": { "$type": "FunctionCall",
            "function": { "$refText": "clear", "target": "clear" }, "arguments": [] },
          "thenBody": [
            { "$type": "Movement", "direction": "Forward", "unit": "cm",
              "distance": { "$type": "NumberLiteral", "value": 100 } }
          ],
          "elseBody": [
            { "$type": "Movement", "direction": "Right", "unit": "cm",
              "distance": { "$type": "NumberLiteral", "value": 60 } },
            { "$type": "Movement", "direction": "Forward", "unit": "cm",
              "distance": { "$type": "NumberLiteral", "value": 100 } }
          ] }
      ] }
  ]
}"#;

#[test]
fn dodge_steps_aside_when_blocked() {
    let cfg = config(
        r#"{ "entities": [
            { "type": "Block", "pos": { "x": 5300, "y": 4800 }, "size": { "x": 5300, "y": 5200 } }
        ] }"#,
    );
    let scene = scene_of(run(&program(DODGE), &cfg));

    assert_eq!(scene.timestamps.len(), 2);
    assert_close(scene.robot.pos.x, 6000.0);
    assert_close(scene.robot.pos.y, 5600.0);
}

#[test]
fn dodge_goes_straight_when_clear() {
    let scene = scene_of(run(&program(DODGE), &SimulationConfig::default()));

    assert_eq!(scene.timestamps.len(), 1);
    assert_close(scene.robot.pos.x, 6000.0);
    assert_close(scene.robot.pos.y, 5000.0);
}

// ══════════════════════════════════════════════════════════════════════════════
// Canonical Example 4: Spiral with parameters
// ══════════════════════════════════════════════════════════════════════════════

/// ```text
/// let void leg(number len) {
///     Forward len in cm
///     Counter 90
/// }
///
/// let void entry() {
///     var number n = 1
///     loop n < 5 {
///         leg(n * 10)
///         n = n + 1
///     }
/// }
/// ```
const SPIRAL: &str = r#"{
  "functions": [
    { "name": "leg", "returnType": "void",
      "parameters": [ { "name": "len", "type": "number" } ],
      "instructions": [
        { "$type": "Movement", "direction": "Forward", "unit": "cm",
          "distance": { "$type": "VariableRef", "variable": { "$refText": "len", "target": "len" } } },
        { "$type": "Rotate", "direction": "Counter",
          "angle": { "$type": "NumberLiteral", "value": 90 } }
      ] },
    { "name": "entry",
      "instructions": [
        { "$type": "VariableDeclaration", "name": "n", "type": "number",
          "value": { "$type": "NumberLiteral", "value": 1 } },
        { "$type": "Loop",
          "condition": { "$type": "BinaryExpression", "operator": "<",
            "left": { "$type": "VariableRef", "variable": { "$refText": "n", "target": "n" } },
            "right": { "$type": "NumberLiteral", "value": 5 } },
          "body": [
            { "$type": "FunctionCall",
              "function": { "$refText": "leg", "target": "leg" },
              "arguments": [
                { "$type": "BinaryExpression", "operator": "*",
                  "left": { "$type": "VariableRef", "variable": { "$refText": "n", "target": "n" } },
                  "right": { "$type": "NumberLiteral", "value": 10 } } ] },
            { "$type": "Assignment", "assignee": { "$refText": "n", "target": "n" },
              "value": { "$type": "BinaryExpression", "operator": "+",
                "left": { "$type": "VariableRef", "variable": { "$refText": "n", "target": "n" } },
                "right": { "$type": "NumberLiteral", "value": 1 } } }
          ] }
      ] }
  ]
}"#;

#[test]
fn spiral_legs_grow() {
    let scene = scene_of(run(&program(SPIRAL), &SimulationConfig::default()));

    assert_eq!(scene.timestamps.len(), 8);
    assert_close(scene.robot.pos.x, 5000.0 + 100.0 - 300.0);
    assert_close(scene.robot.pos.y, 5000.0 - 200.0 + 400.0);
    assert_close(scene.robot.rad, -2.0 * PI);
    assert_close(scene.time, 1000.0 / 30.0 * 1000.0 + 4.0 * 450.0);
}

// ══════════════════════════════════════════════════════════════════════════════
// Host boundary
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn run_json_reports_timestamps_in_scene_shape() {
    let out: serde_json::Value = serde_json::from_str(&run_json(SQUARE, None)).unwrap();

    assert_eq!(out["success"], true);
    let first = &out["scene"]["timestamps"][0];
    assert_eq!(first["type"], "Robot");
    assert_eq!(first["pos"]["x"], 5500.0);
    assert_eq!(first["size"]["x"], 250.0);
    assert_eq!(out["scene"]["size"]["x"], 10000.0);
}

#[test]
fn run_json_missing_entry_is_a_warning() {
    let out: serde_json::Value =
        serde_json::from_str(&run_json(r#"{ "functions": [] }"#, None)).unwrap();

    assert_eq!(out["success"], true);
    assert_eq!(out["scene"]["time"], 0.0);
    assert_eq!(out["scene"]["timestamps"].as_array().unwrap().len(), 0);
    assert_eq!(
        out["warnings"][0],
        "no 'entry' function found; nothing to execute"
    );
}

#[test]
fn run_json_rejects_unknown_instruction_kind() {
    let json = r#"{ "functions": [{ "name": "entry",
        "instructions": [ { "$type": "Teleport", "to": 3 } ] }] }"#;
    let out: serde_json::Value = serde_json::from_str(&run_json(json, None)).unwrap();

    assert_eq!(out["success"], false);
    assert!(out["scene"].is_null());
    assert!(out["errors"][0].as_str().unwrap().starts_with("program: "));
}

// ══════════════════════════════════════════════════════════════════════════════
// Determinism
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn determinism_square_100_iterations() {
    let reference = run_json(SQUARE, None);
    for _ in 0..100 {
        assert_eq!(run_json(SQUARE, None), reference);
    }
}

#[test]
fn determinism_all_canonical_100_iterations() {
    let wall = config(WALL_AT_6000);
    let square = program(SQUARE);
    let approach = program(WALL_APPROACH);
    let spiral = program(SPIRAL);
    let expected = (
        scene_of(run(&square, &SimulationConfig::default())),
        scene_of(run(&approach, &wall)),
        scene_of(run(&spiral, &SimulationConfig::default())),
    );
    for _ in 0..100 {
        let actual = (
            scene_of(run(&square, &SimulationConfig::default())),
            scene_of(run(&approach, &wall)),
            scene_of(run(&spiral, &SimulationConfig::default())),
        );
        assert_eq!(actual, expected);
    }
}
