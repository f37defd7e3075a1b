//! WASM bindings for browser-side instance checking and solving.

use wasm_bindgen::prelude::*;

use crate::parser::{FormatError, Parser};
use mdkp_solver::{ConstructionStrategy, RepairPolicy, Solver, SolverOptions, Summary};

/// Parse an instance file and return the instances as JSON
#[wasm_bindgen]
pub fn parse(source: &str) -> Result<JsValue, JsValue> {
    let instances = Parser::parse(source).map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_wasm_bindgen::to_value(&instances).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Validate an instance file and return diagnostics
#[wasm_bindgen]
pub fn validate(source: &str) -> JsValue {
    let diagnostics = get_diagnostics(source);
    serde_wasm_bindgen::to_value(&diagnostics).unwrap_or(JsValue::NULL)
}

#[derive(serde::Serialize)]
struct Diagnostic {
    line: usize,
    severity: String,
    message: String,
}

fn get_diagnostics(source: &str) -> Vec<Diagnostic> {
    match Parser::parse(source) {
        Err(e) => vec![Diagnostic {
            line: error_line(&e),
            severity: "error".to_string(),
            message: e.to_string(),
        }],
        Ok(instances) => instances
            .iter()
            .enumerate()
            .flat_map(|(index, instance)| {
                instance.zero_footprint_projects().into_iter().map(move |project| Diagnostic {
                    line: 0,
                    severity: "warning".to_string(),
                    message: format!(
                        "Instance {}: project {} consumes no resources and will be ranked last",
                        index, project
                    ),
                })
            })
            .collect(),
    }
}

fn error_line(error: &FormatError) -> usize {
    match error {
        FormatError::UnexpectedEof { line, .. }
        | FormatError::InvalidNumber { line, .. }
        | FormatError::TokenCount { line, .. }
        | FormatError::CountMismatch { line, .. }
        | FormatError::TrailingInput { line }
        | FormatError::Instance { line, .. } => *line,
    }
}

/// Solve every instance in a file and return the results as JSON
#[wasm_bindgen]
pub fn solve(source: &str, construction: &str, repair: &str, seed: u64) -> Result<JsValue, JsValue> {
    let instances = Parser::parse(source).map_err(|e| JsValue::from_str(&e.to_string()))?;

    let construction: ConstructionStrategy = construction.parse().map_err(|e: String| JsValue::from_str(&e))?;
    let repair: RepairPolicy = repair.parse().map_err(|e: String| JsValue::from_str(&e))?;
    let options = SolverOptions {
        construction,
        repair,
        seed,
    };

    let results = Solver::with_options(options).solve_all(&instances);
    let summary = Summary::from_results(&results);

    let result = SolveOutput {
        options,
        instances: results
            .into_iter()
            .map(|r| InstanceOutput {
                selection: r.selection.to_bits(),
                majorant_value: r.majorant_value,
                gap: r.gap,
                resolution_time_ms: r.resolution_time.as_secs_f64() * 1000.0,
                removed: r.removed,
            })
            .collect(),
        summary,
    };

    serde_wasm_bindgen::to_value(&result).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[derive(serde::Serialize)]
struct SolveOutput {
    options: SolverOptions,
    instances: Vec<InstanceOutput>,
    summary: Summary,
}

#[derive(serde::Serialize)]
struct InstanceOutput {
    selection: Vec<u8>,
    majorant_value: f64,
    gap: f64,
    resolution_time_ms: f64,
    removed: usize,
}
