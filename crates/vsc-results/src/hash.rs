//! Content-based hashing for run IDs.

use crate::types::RunType;
use serde::Serialize;
use sha2::{Digest, Sha256};
use vsc_core::{AlgebraicVector, Params, Scenario, StateVector};

/// Everything that determines a run's output.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RunInputs<'a> {
    pub params: &'a Params,
    pub scenario: &'a Scenario,
    pub x0: &'a StateVector,
    pub y0: &'a AlgebraicVector,
    pub run_type: &'a RunType,
    pub integrator: &'a str,
}

pub fn compute_run_id(inputs: &RunInputs<'_>, solver_version: &str) -> String {
    let mut hasher = Sha256::new();

    let inputs_json = serde_json::to_string(inputs).unwrap_or_default();
    hasher.update(inputs_json.as_bytes());

    hasher.update(solver_version.as_bytes());

    let result = hasher.finalize();
    format!("{:x}", result)
}
