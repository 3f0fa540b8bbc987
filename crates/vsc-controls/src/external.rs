//! External (outer) control: dq current references.

use vsc_core::{AlgebraicVector, ControlMode, Params, Scenario, StateVector};
use vsc_model::POWER_FACTOR;

/// dq current references produced by the outer loop.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CurrentReferences {
    pub id_ref: f64,
    pub iq_ref: f64,
}

/// Source of current references for stage 1 of a simulation step.
///
/// Implemented by [`ScenarioReferences`] and by any closure with the matching
/// signature, so callers can substitute their own outer loop.
pub trait CurrentReferenceSource {
    fn current_references(
        &self,
        t: f64,
        x: &StateVector,
        y: &AlgebraicVector,
        scenario: &Scenario,
        params: &Params,
    ) -> CurrentReferences;
}

impl<F> CurrentReferenceSource for F
where
    F: Fn(f64, &StateVector, &AlgebraicVector, &Scenario, &Params) -> CurrentReferences,
{
    fn current_references(
        &self,
        t: f64,
        x: &StateVector,
        y: &AlgebraicVector,
        scenario: &Scenario,
        params: &Params,
    ) -> CurrentReferences {
        self(t, x, y, scenario, params)
    }
}

/// Default outer loop driven by the scenario's control mode.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScenarioReferences;

impl CurrentReferenceSource for ScenarioReferences {
    fn current_references(
        &self,
        t: f64,
        x: &StateVector,
        y: &AlgebraicVector,
        scenario: &Scenario,
        params: &Params,
    ) -> CurrentReferences {
        compute_current_references(t, x, y, scenario, params)
    }
}

/// Invert the PCC power equations for `(id, iq)`.
///
/// Solves
///
/// ```text
/// P / 1.5 = vd id + vq iq
/// Q / 1.5 = vq id - vd iq
/// ```
///
/// A zero PCC voltage makes the system singular; zero currents are returned.
pub fn currents_from_pq(p_ref: f64, q_ref: f64, v_pcc_d: f64, v_pcc_q: f64) -> CurrentReferences {
    let sp = p_ref / POWER_FACTOR;
    let sq = q_ref / POWER_FACTOR;
    let vd = v_pcc_d;
    let vq = v_pcc_q;

    let det = -(vd * vd + vq * vq);
    if det == 0.0 {
        return CurrentReferences::default();
    }
    let inv_det = 1.0 / det;

    CurrentReferences {
        id_ref: inv_det * (-vd * sp - vq * sq),
        iq_ref: inv_det * (-vq * sp + vd * sq),
    }
}

/// Current references for the scenario's control mode.
///
/// `PQ` derives currents from the power references and PCC voltage; `VdcQ`
/// takes the currents the scenario already carries.
pub fn compute_current_references(
    _t: f64,
    _x: &StateVector,
    _y: &AlgebraicVector,
    scenario: &Scenario,
    _params: &Params,
) -> CurrentReferences {
    match scenario.mode {
        ControlMode::Pq { p_ref, q_ref } => {
            currents_from_pq(p_ref, q_ref, scenario.v_pcc_d, scenario.v_pcc_q)
        }
        ControlMode::VdcQ { id_ref, iq_ref } => CurrentReferences { id_ref, iq_ref },
    }
}
