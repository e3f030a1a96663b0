//! JSON boundary for hosts that talk to the engine across a process or
//! worker boundary.
//!
//! ```text
//! program JSON + config JSON → run_json → { success, scene, errors, warnings }
//! ```

use crate::config::SimulationConfig;
use crate::interpreter::Interpreter;
use roboml_types::ast::Program;
use roboml_types::RunReport;

/// Run a program under `config` and return the report.
pub fn run(program: &Program, config: &SimulationConfig) -> RunReport {
    Interpreter::with_config(config.clone()).report(program)
}

/// Decode, run and encode in one step.
///
/// `config_json` may be `None` for the default configuration. Returns a JSON
/// string containing a [`RunReport`]:
/// ```json
/// { "success": true, "scene": { "size": {...}, "timestamps": [...] }, "errors": [], "warnings": [] }
/// ```
/// Decoding problems are reported in `errors` like any other failure.
pub fn run_json(program_json: &str, config_json: Option<&str>) -> String {
    let report = match decode(program_json, config_json) {
        Ok((program, config)) => run(&program, &config),
        Err(message) => RunReport::failed(vec![message], Vec::new()),
    };
    serde_json::to_string(&report).unwrap_or_else(|e| {
        format!(
            r#"{{"success":false,"scene":null,"errors":["serialization error: {}"],"warnings":[]}}"#,
            e
        )
    })
}

fn decode(
    program_json: &str,
    config_json: Option<&str>,
) -> Result<(Program, SimulationConfig), String> {
    let program = Program::from_json(program_json).map_err(|e| format!("program: {e}"))?;
    let config = match config_json {
        Some(json) => SimulationConfig::from_json(json).map_err(|e| format!("config: {e}"))?,
        None => SimulationConfig::default(),
    };
    Ok((program, config))
}
