//! Inner current loop.

use std::collections::BTreeMap;
use vsc_core::{Params, StateVector};

/// Converter voltage references before saturation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VoltageReferences {
    pub v_conv_d_ref: f64,
    pub v_conv_q_ref: f64,
}

/// Opaque controller memory threaded through consecutive steps.
///
/// The proportional loop does not accumulate anything, so the state is
/// returned as received. Integral terms would live here.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ControllerState {
    values: BTreeMap<String, f64>,
}

impl ControllerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: f64) -> Option<f64> {
        self.values.insert(key.into(), value)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Proportional law on the dq current error:
///
/// ```text
/// v_conv_d* = Kp_id (id_ref - id)
/// v_conv_q* = Kp_iq (iq_ref - iq)
/// ```
///
/// Returns the references together with the (unchanged) controller state.
pub fn compute_converter_voltage_references(
    id_ref: f64,
    iq_ref: f64,
    x: &StateVector,
    params: &Params,
    state: Option<&ControllerState>,
) -> (VoltageReferences, Option<ControllerState>) {
    let refs = VoltageReferences {
        v_conv_d_ref: params.kp_id * (id_ref - x.id),
        v_conv_q_ref: params.kp_iq * (iq_ref - x.iq),
    };
    (refs, state.cloned())
}
