//! Per-step inputs to the DAE.

use crate::Scenario;

/// Voltages seen by the DAE during one step: the saturated converter
/// voltage and the PCC voltage. Built fresh every step, never persisted.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Inputs {
    pub v_conv_d: f64,
    pub v_conv_q: f64,
    pub v_pcc_d: f64,
    pub v_pcc_q: f64,
}

impl Inputs {
    /// Combine saturated converter voltages with the scenario's PCC voltages.
    pub fn from_scenario(scenario: &Scenario, v_conv_d: f64, v_conv_q: f64) -> Self {
        Self {
            v_conv_d,
            v_conv_q,
            v_pcc_d: scenario.v_pcc_d,
            v_pcc_q: scenario.v_pcc_q,
        }
    }
}
